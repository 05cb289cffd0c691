//! General-purpose utility modules.

pub mod error;
pub mod log;
pub mod progress;

// Re-export commonly used items
pub use error::{LevelError, Result};
pub use progress::{Progress, ProgressHandle, ProgressStep};
