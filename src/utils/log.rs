// src/utils/log.rs

//! Structured logging for the level creator, built on `tracing`.
//!
//! Library code only emits events (`debug!` per pipeline stage, `info!` per
//! finished level, `warn!` for skipped batch images). Binaries install a
//! subscriber once at startup:
//!
//! ```no_run
//! level_creator::utils::log::init_subscriber(tracing::Level::DEBUG);
//! ```

pub use tracing::{Level, debug, error, info, instrument, trace, warn};
use tracing_subscriber::FmtSubscriber;

/// Initializes a global logging subscriber writing to standard error.
///
/// Calling it a second time is a no-op; the first subscriber stays installed.
pub fn init_subscriber(max_level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_thread_ids(true)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        debug!("tracing subscriber already installed");
    }
}

/// Maps a `-v` count to a level: 0 = INFO, 1 = DEBUG, 2+ = TRACE.
pub fn level_for_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), Level::INFO);
        assert_eq!(level_for_verbosity(1), Level::DEBUG);
        assert_eq!(level_for_verbosity(7), Level::TRACE);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_subscriber(Level::WARN);
        init_subscriber(Level::WARN);
    }
}
