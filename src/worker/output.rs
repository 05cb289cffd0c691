// src/worker/output.rs

//! Writes a finished level to its folder.
//!
//! Files are first written into a hidden staging directory next to the
//! target and the directory is renamed into place at the end, so a level
//! folder either holds a complete level or does not exist.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::pipeline::LevelOutput;
use crate::format::atlas_png::atlas_file_name;
use crate::format::level_file::level_txt;
use crate::format::{LEVEL_BYTES_FILE, LEVEL_TXT_FILE};
use crate::utils::error::{LevelError, Result};

/// Writes `bytes.bytes`, `level.txt` and the atlas PNGs into `folder`,
/// replacing any previous level there.
pub fn write_level_folder(folder: &Path, output: &LevelOutput, asset_path: &str) -> Result<PathBuf> {
    let name = folder
        .file_name()
        .ok_or_else(|| LevelError::InvalidArg(format!("output folder {} has no name", folder.display())))?;
    let parent = match folder.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let staging = tempfile::Builder::new()
        .prefix(&format!(".{}.staging-", name.to_string_lossy()))
        .tempdir_in(&parent)?;

    // Any early return drops `staging` and removes it.
    write_files(staging.path(), output, asset_path)?;
    if folder.is_dir() {
        fs::remove_dir_all(folder)?;
    } else if folder.exists() {
        return Err(LevelError::InvalidArg(format!(
            "output path {} exists and is not a folder",
            folder.display()
        )));
    }
    fs::rename(staging.path(), folder)?;
    let _ = staging.keep();
    debug!(path = %folder.display(), id = %output.id, "level folder written");

    Ok(folder.to_path_buf())
}

fn write_files(dir: &Path, output: &LevelOutput, asset_path: &str) -> Result<()> {
    for (i, png) in output.atlas_pngs.iter().enumerate() {
        fs::write(dir.join(atlas_file_name(i)), png)?;
    }
    fs::write(dir.join(LEVEL_BYTES_FILE), &output.bytes)?;
    fs::write(dir.join(LEVEL_TXT_FILE), level_txt(&output.id, asset_path))?;
    Ok(())
}
