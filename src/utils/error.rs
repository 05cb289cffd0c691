// src/utils/error.rs

use thiserror::Error;

/// The primary error type for all operations in the level creator.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The colored and line images do not share the same dimensions.
    #[error("input mismatch: colored image is {}x{}, line image is {}x{}", colored.0, colored.1, lines.0, lines.1)]
    InputMismatch {
        colored: (u32, u32),
        lines: (u32, u32),
    },

    /// The host could not decode an image into pixels.
    #[error("unreadable pixel source {path}: {reason}")]
    UnreadablePixelSource { path: String, reason: String },

    /// A region's padded box does not fit the largest allowed atlas.
    #[error(
        "region {region} ({width}x{height}) does not fit in a {max_size}x{max_size} atlas; \
         raise the max pack size or the region size threshold"
    )]
    RegionTooLargeForAtlas {
        region: usize,
        width: u32,
        height: u32,
        max_size: u32,
    },

    /// A level byte file is truncated or structurally invalid.
    #[error("level file format error: {0}")]
    Format(String),

    /// An invalid argument was provided to a function.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image codec error: {0}")]
    Image(#[from] ::image::ImageError),

    /// The batch was cancelled before this image was started.
    #[error("cancelled")]
    Cancelled,

    /// The other end of the worker/host channel went away.
    #[error("host disconnected")]
    HostDisconnected,
}

impl LevelError {
    /// True for errors that abort the whole batch instead of a single image.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, LevelError::Cancelled | LevelError::HostDisconnected)
    }
}

/// A specialized `Result` type for level creation.
pub type Result<T> = std::result::Result<T, LevelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = LevelError::InputMismatch {
            colored: (10, 20),
            lines: (10, 21),
        };
        assert_eq!(
            err.to_string(),
            "input mismatch: colored image is 10x20, line image is 10x21"
        );

        let err = LevelError::RegionTooLargeForAtlas {
            region: 3,
            width: 4000,
            height: 10,
            max_size: 2048,
        };
        assert!(err.to_string().contains("region 3 (4000x10)"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short");
        let err: LevelError = io.into();
        assert!(matches!(err, LevelError::Io(_)));
        assert!(!err.is_batch_fatal());
        assert!(LevelError::Cancelled.is_batch_fatal());
    }
}
