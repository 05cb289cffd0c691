//! Level creation for a "color by number" picture game.
//!
//! A level is made from two images of the same size: the finished colored
//! picture and its line art. The line art is split into paintable regions,
//! every region gets a number position and a palette color sampled from the
//! colored picture, and all region masks are packed into power-of-two atlas
//! textures. The result is a little-endian byte file (`bytes.bytes`), a
//! `level.txt` holding the MD5 level id and asset path, and `atlas_<i>.png`.
//!
//! # Quick Start
//!
//! ```no_run
//! use level_creator::{ImagePair, LevelCreator, LevelSettings, Pixmap};
//! use std::path::Path;
//!
//! # fn main() -> level_creator::Result<()> {
//! let pair = ImagePair::new(
//!     Pixmap::open(Path::new("mandala.png"))?,
//!     Pixmap::open(Path::new("mandala-lines.png"))?,
//! );
//! let creator = LevelCreator::new(LevelSettings::default().with_region_size_threshold(32.0));
//! let level = creator.process(&pair)?;
//! level_creator::write_level_folder(Path::new("out/mandala"), &level, "Assets/Levels/mandala")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Coordinates
//!
//! All pixel buffers use a bottom-left origin: row 0 is the bottom row.
//! Images decoded through the `image` crate are flipped on load and flipped
//! back when atlases are encoded.

pub mod format;
pub mod image;
pub mod level;
pub mod utils;
pub mod worker;

// Pipeline API
pub use worker::{
    BatchReport, BatchWorker, FsHost, ImagePair, LevelCreator, LevelOutput, LevelSettings, run_batch,
    write_level_folder,
};

// Stage types
pub use level::{PackSettings, Palette, Region, TextureAtlasInfo};

// Image types
pub use image::image_formats::{Pixmap, Rgb, Rgba};

// File formats
pub use format::{LevelFileData, decode_level, encode_level, level_id};

// Error types
pub use utils::error::{LevelError, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_roundtrip() -> Result<()> {
        let colored = Pixmap::from_fn(20, 20, |x, _| {
            if x < 10 {
                Rgba::opaque(255, 0, 0)
            } else {
                Rgba::opaque(0, 0, 255)
            }
        });
        // A vertical line at x = 10 splits the picture in two.
        let lines = Pixmap::from_fn(20, 20, |x, _| {
            if x == 10 {
                Rgba::opaque(0, 0, 0)
            } else {
                Rgba::transparent()
            }
        });

        let level = LevelCreator::default().process(&ImagePair::new(colored, lines))?;
        assert_eq!(level.regions.len(), 2);
        assert_eq!(level.colors, vec![Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)]);

        let decoded = decode_level(&level.bytes)?;
        assert_eq!(decoded.regions.len(), 2);
        assert_eq!(decoded.atlases, level.atlases.len());
        assert_eq!(level_id(&level.bytes), level.id);
        Ok(())
    }
}
