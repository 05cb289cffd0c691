//! On-disk formats: the level byte file, `level.txt` and the atlas PNGs.

pub mod atlas_png;
pub mod byte_stream;
pub mod level_file;

pub use atlas_png::{atlas_file_name, decode_png, encode_png, render_atlas};
pub use level_file::{
    DecodedRegion, LevelFileData, decode_level, encode_level, level_id, level_txt, parse_level_txt, region_runs,
};

/// File name of the level byte file inside a level folder.
pub const LEVEL_BYTES_FILE: &str = "bytes.bytes";
/// File name of the id/asset-path companion file.
pub const LEVEL_TXT_FILE: &str = "level.txt";
