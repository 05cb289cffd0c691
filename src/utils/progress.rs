use std::fmt;
use std::sync::{Arc, Mutex};

/// The pipeline stage currently running for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressStep {
    #[default]
    Idle,
    LoadingTextures,
    GatheringRegions,
    PackingRegions,
    CreateFiles,
    Done,
}

impl fmt::Display for ProgressStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProgressStep::Idle => "Idle",
            ProgressStep::LoadingTextures => "Loading textures",
            ProgressStep::GatheringRegions => "Gathering regions",
            ProgressStep::PackingRegions => "Packing regions",
            ProgressStep::CreateFiles => "Creating files",
            ProgressStep::Done => "Done",
        };
        f.write_str(label)
    }
}

/// Progress of a single run or a batch, observable by the host.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    pub step: ProgressStep,
    /// Zero-based index of the batch file being processed.
    pub file_index: usize,
    pub file_count: usize,
    pub file_name: String,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file_count > 0 {
            write!(
                f,
                "[{}/{}] {}: {}",
                self.file_index + 1,
                self.file_count,
                self.file_name,
                self.step
            )
        } else {
            write!(f, "{}", self.step)
        }
    }
}

/// Shared progress handle. Cloning shares the same state.
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle(Arc<Mutex<Progress>>);

impl ProgressHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> Progress {
        match self.0.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_step(&self, step: ProgressStep) {
        self.update(|p| p.step = step);
    }

    pub fn set_file(&self, index: usize, count: usize, name: &str) {
        self.update(|p| {
            p.file_index = index;
            p.file_count = count;
            p.file_name = name.to_string();
        });
    }

    fn update(&self, f: impl FnOnce(&mut Progress)) {
        let mut guard = match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
    }
}
