// src/worker/batch.rs

//! Batch processing of a folder of image pairs.
//!
//! The worker runs on its own thread and never touches the filesystem. For
//! every image it asks the host to load the pair, runs the pipeline, and asks
//! the host to write the result. Requests and responses travel over two
//! channels; the worker blocks on each response before going on.
//!
//! A failure of one image (unreadable file, size mismatch, region too large,
//! write error) is recorded in the report and the batch moves on. Only
//! cancellation or a vanished host stops it early.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use super::output::write_level_folder;
use super::pipeline::{LevelCreator, LevelOutput};
use super::settings::{ImagePair, LevelSettings, asset_path};
use crate::image::image_formats::Pixmap;
use crate::utils::error::{LevelError, Result};
use crate::utils::progress::{Progress, ProgressHandle, ProgressStep};

/// Suffix that marks the line image of a pair (`cat.png` + `cat-lines.png`).
pub const LINES_SUFFIX: &str = "-lines";

// ─── Pairing ────────────────────────────────────────────────────────────────

/// One colored/line image pair found in the input folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    /// Colored file stem, also the level folder name.
    pub name: String,
    pub colored: PathBuf,
    pub lines: PathBuf,
}

/// Pairs found in a folder plus the colored images lacking a line image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchPlan {
    pub jobs: Vec<BatchJob>,
    pub missing_lines: Vec<String>,
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// Scans `dir` for `<name>.png` / `<name>-lines.png` pairs, sorted by name.
pub fn pair_batch_files(dir: &Path) -> Result<BatchPlan> {
    let mut colored = Vec::new();
    let mut lines = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !is_png(&path) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };
        if stem.ends_with(LINES_SUFFIX) {
            lines.push((stem, path));
        } else {
            colored.push((stem, path));
        }
    }
    colored.sort();

    let mut plan = BatchPlan::default();
    for (name, colored_path) in colored {
        let wanted = format!("{name}{LINES_SUFFIX}");
        match lines.iter().find(|(stem, _)| *stem == wanted) {
            Some((_, lines_path)) => plan.jobs.push(BatchJob {
                name,
                colored: colored_path,
                lines: lines_path.clone(),
            }),
            None => plan.missing_lines.push(name),
        }
    }

    Ok(plan)
}

// ─── Messages ───────────────────────────────────────────────────────────────

/// Work the worker needs the host to do.
#[derive(Debug)]
pub enum HostRequest {
    LoadImages {
        index: usize,
        name: String,
        colored: PathBuf,
        lines: PathBuf,
    },
    WriteLevel {
        index: usize,
        name: String,
        output: Box<LevelOutput>,
    },
    /// Last message; the worker thread exits after sending it.
    Finished(BatchReport),
}

/// The host's answer to the pending request. Host errors are recorded as the
/// image's failure unchanged; a `Cancelled` or `HostDisconnected` answer
/// stops the worker.
#[derive(Debug)]
pub enum HostResponse {
    Images(Result<ImagePair>),
    Written(Result<()>),
}

/// Result of one image: the level id or the reason it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOutcome {
    pub name: String,
    pub result: std::result::Result<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<ImageOutcome>,
    pub cancelled: bool,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &ImageOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ImageOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn all_succeeded(&self) -> bool {
        !self.cancelled && self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(id) => writeln!(f, "ok     {} ({id})", outcome.name)?,
                Err(reason) => writeln!(f, "failed {}: {reason}", outcome.name)?,
            }
        }
        write!(
            f,
            "{} succeeded, {} failed{}",
            self.succeeded().count(),
            self.failed().count(),
            if self.cancelled { ", cancelled" } else { "" }
        )
    }
}

// ─── Worker ─────────────────────────────────────────────────────────────────

/// Host-side handle of a running batch.
pub struct BatchWorker {
    requests: Receiver<HostRequest>,
    responses: Sender<HostResponse>,
    cancel: Arc<AtomicBool>,
    progress: ProgressHandle,
    handle: Option<JoinHandle<()>>,
}

impl BatchWorker {
    /// Starts the worker thread for `jobs`.
    pub fn spawn(jobs: Vec<BatchJob>, settings: LevelSettings) -> BatchWorker {
        let (request_tx, request_rx) = mpsc::channel();
        let (response_tx, response_rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let progress = ProgressHandle::new();

        let state = WorkerState {
            jobs,
            creator: LevelCreator::new(settings).with_progress(progress.clone()),
            requests: request_tx,
            responses: response_rx,
            cancel: Arc::clone(&cancel),
            progress: progress.clone(),
        };
        let handle = thread::spawn(move || state.run());

        BatchWorker {
            requests: request_rx,
            responses: response_tx,
            cancel,
            progress,
            handle: Some(handle),
        }
    }

    /// Blocks until the worker needs something. `None` once the worker has
    /// exited without a `Finished` message.
    pub fn next_request(&self) -> Option<HostRequest> {
        self.requests.recv().ok()
    }

    pub fn respond(&self, response: HostResponse) -> Result<()> {
        self.responses.send(response).map_err(|_| LevelError::HostDisconnected)
    }

    /// Asks the worker to stop before its next image.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn progress(&self) -> Progress {
        self.progress.snapshot()
    }

    /// Waits for the worker thread to exit.
    pub fn join(mut self) -> Result<()> {
        self.join_thread()
    }

    fn join_thread(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| LevelError::InvalidArg("batch worker thread panicked".to_string())),
            None => Ok(()),
        }
    }
}

impl Drop for BatchWorker {
    fn drop(&mut self) {
        // Unblock a worker waiting for a response; it sees the closed channel and exits.
        self.cancel.store(true, Ordering::SeqCst);
        let (closed_tx, _) = mpsc::channel();
        drop(std::mem::replace(&mut self.responses, closed_tx));
        let _ = self.join_thread();
    }
}

struct WorkerState {
    jobs: Vec<BatchJob>,
    creator: LevelCreator,
    requests: Sender<HostRequest>,
    responses: Receiver<HostResponse>,
    cancel: Arc<AtomicBool>,
    progress: ProgressHandle,
}

impl WorkerState {
    fn run(self) {
        let mut report = BatchReport::default();
        let count = self.jobs.len();

        for (index, job) in self.jobs.iter().enumerate() {
            if self.cancel.load(Ordering::SeqCst) {
                report.cancelled = true;
                for rest in &self.jobs[index..] {
                    report.outcomes.push(ImageOutcome {
                        name: rest.name.clone(),
                        result: Err(LevelError::Cancelled.to_string()),
                    });
                }
                break;
            }

            self.progress.set_file(index, count, &job.name);
            match self.process_job(index, job) {
                Ok(id) => {
                    info!(name = %job.name, id = %id, "batch image done");
                    report.outcomes.push(ImageOutcome {
                        name: job.name.clone(),
                        result: Ok(id),
                    });
                }
                Err(err) if err.is_batch_fatal() => {
                    debug!(name = %job.name, error = %err, "batch worker stopping");
                    return;
                }
                Err(err) => {
                    warn!(name = %job.name, error = %err, "skipping batch image");
                    report.outcomes.push(ImageOutcome {
                        name: job.name.clone(),
                        result: Err(err.to_string()),
                    });
                }
            }
        }

        self.progress.set_step(ProgressStep::Done);
        let _ = self.requests.send(HostRequest::Finished(report));
    }

    fn process_job(&self, index: usize, job: &BatchJob) -> Result<String> {
        self.progress.set_step(ProgressStep::LoadingTextures);
        self.send(HostRequest::LoadImages {
            index,
            name: job.name.clone(),
            colored: job.colored.clone(),
            lines: job.lines.clone(),
        })?;
        let pair = match self.recv()? {
            HostResponse::Images(result) => result?,
            HostResponse::Written(_) => {
                return Err(LevelError::InvalidArg("host answered LoadImages with Written".to_string()));
            }
        };

        let output = self.creator.process(&pair)?;
        let id = output.id.clone();

        self.send(HostRequest::WriteLevel {
            index,
            name: job.name.clone(),
            output: Box::new(output),
        })?;
        match self.recv()? {
            HostResponse::Written(result) => result.map(|()| id),
            HostResponse::Images(_) => Err(LevelError::InvalidArg("host answered WriteLevel with Images".to_string())),
        }
    }

    fn send(&self, request: HostRequest) -> Result<()> {
        self.requests.send(request).map_err(|_| LevelError::HostDisconnected)
    }

    fn recv(&self) -> Result<HostResponse> {
        self.responses.recv().map_err(|_| LevelError::HostDisconnected)
    }
}

// ─── Host ───────────────────────────────────────────────────────────────────

/// The I/O side of a batch.
pub trait BatchHost {
    fn load_images(&mut self, name: &str, colored: &Path, lines: &Path) -> Result<ImagePair>;
    fn write_level(&mut self, name: &str, output: &LevelOutput) -> Result<()>;
}

/// Reads PNGs from disk and writes one level folder per image under `out_dir`.
#[derive(Debug, Clone)]
pub struct FsHost {
    pub out_dir: PathBuf,
    pub asset_prefix: String,
}

impl FsHost {
    pub fn new(out_dir: impl Into<PathBuf>, asset_prefix: impl Into<String>) -> Self {
        FsHost {
            out_dir: out_dir.into(),
            asset_prefix: asset_prefix.into(),
        }
    }
}

impl BatchHost for FsHost {
    fn load_images(&mut self, _name: &str, colored: &Path, lines: &Path) -> Result<ImagePair> {
        Ok(ImagePair::new(Pixmap::open(colored)?, Pixmap::open(lines)?))
    }

    fn write_level(&mut self, name: &str, output: &LevelOutput) -> Result<()> {
        let asset_path = asset_path(&self.asset_prefix, name);
        write_level_folder(&self.out_dir.join(name), output, &asset_path)?;
        Ok(())
    }
}

/// Serves `worker`'s requests with `host` until the batch finishes.
pub fn run_batch_with<H: BatchHost>(worker: BatchWorker, host: &mut H) -> Result<BatchReport> {
    loop {
        let Some(request) = worker.next_request() else {
            return Err(LevelError::HostDisconnected);
        };
        match request {
            HostRequest::LoadImages {
                name, colored, lines, ..
            } => {
                let result = host.load_images(&name, &colored, &lines);
                worker.respond(HostResponse::Images(result))?;
            }
            HostRequest::WriteLevel { name, output, .. } => {
                let result = host.write_level(&name, &output);
                worker.respond(HostResponse::Written(result))?;
            }
            HostRequest::Finished(report) => {
                worker.join()?;
                return Ok(report);
            }
        }
    }
}

/// Pairs the images in `input_dir` and writes every level under `out_dir`.
pub fn run_batch(input_dir: &Path, out_dir: &Path, settings: LevelSettings) -> Result<BatchReport> {
    let plan = pair_batch_files(input_dir)?;
    for name in &plan.missing_lines {
        warn!(name = %name, "no {name}{LINES_SUFFIX}.png line image, skipping");
    }
    info!(images = plan.jobs.len(), input = %input_dir.display(), "starting batch");

    let mut host = FsHost::new(out_dir, settings.asset_prefix.clone());
    let worker = BatchWorker::spawn(plan.jobs, settings);
    run_batch_with(worker, &mut host)
}
