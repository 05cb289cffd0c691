//! Orchestration: settings, the single-level pipeline, level folder output
//! and the batch worker.

pub mod batch;
pub mod output;
pub mod pipeline;
pub mod settings;

pub use batch::{
    BatchHost, BatchJob, BatchPlan, BatchReport, BatchWorker, FsHost, HostRequest, HostResponse, ImageOutcome,
    pair_batch_files, run_batch, run_batch_with,
};
pub use output::write_level_folder;
pub use pipeline::{LevelCreator, LevelOutput};
pub use settings::{ImagePair, LevelSettings};
