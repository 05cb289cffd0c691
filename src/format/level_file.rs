// src/format/level_file.rs

//! The level byte file (`bytes.bytes`) and its companion `level.txt`.
//!
//! ## Layout
//!
//! All fields are little-endian 4-byte values.
//!
//! ```text
//! i32 imageWidth, i32 imageHeight
//! i32 numColors, numColors x { i32 r, i32 g, i32 b }
//! i32 numRegions, numRegions x {
//!     i32 colorIndex
//!     i32 minX, i32 minY, i32 width, i32 height
//!     i32 numberX, i32 numberY, i32 numberSize
//!     min(width, height) x { i32 numSubValues, numSubValues/2 x { i32 start, i32 end } }
//!     i32 atlasIndex
//!     f32 u0, f32 v0, f32 u1, f32 v1
//! }
//! ```
//!
//! The run lists walk the region's shorter dimension: one list per column
//! when `width < height`, otherwise one per row. Runs are inclusive and use
//! global image coordinates along the other axis.
//!
//! The level id is the MD5 of the whole byte file, so any change to region
//! order or float rounding changes the id.

use std::io::Cursor;

use md5::{Digest, Md5};

use super::byte_stream::{ByteReader, ByteWriter};
use crate::image::image_formats::Rgb;
use crate::level::region::Region;
use crate::utils::error::{LevelError, Result};

/// Encodes a level. Regions are written in slice order.
pub fn encode_level(width: u32, height: u32, colors: &[Rgb], regions: &[Region]) -> Result<Vec<u8>> {
    let mut out: Vec<u8> = Vec::new();

    out.write_count(width as usize)?;
    out.write_count(height as usize)?;

    out.write_count(colors.len())?;
    for color in colors {
        out.write_i32_slice(&[color.r as i32, color.g as i32, color.b as i32])?;
    }

    out.write_count(regions.len())?;
    for region in regions {
        encode_region(&mut out, region)?;
    }

    Ok(out)
}

fn encode_region(out: &mut Vec<u8>, region: &Region) -> Result<()> {
    let (number_x, number_y) = region.number_center();

    out.write_i32_slice(&[
        region.color_index,
        region.min_x,
        region.min_y,
        region.width as i32,
        region.height as i32,
        number_x,
        number_y,
        region.number_area.size(),
    ])?;

    for runs in region_runs(region) {
        out.write_count(runs.len() * 2)?;
        for (start, end) in runs {
            out.write_i32_slice(&[start, end])?;
        }
    }

    out.write_i32_le(region.atlas_index)?;
    for uv in region.atlas_uvs {
        out.write_f32_le(uv)?;
    }

    Ok(())
}

/// Run lists of a region along its shorter dimension, in global coordinates.
pub fn region_runs(region: &Region) -> Vec<Vec<(i32, i32)>> {
    let by_x = region.width < region.height;
    let (lines, len) = if by_x {
        (region.width, region.height)
    } else {
        (region.height, region.width)
    };
    let origin = if by_x { region.min_y } else { region.min_x };

    let mut all = Vec::with_capacity(lines as usize);
    for i in 0..lines {
        let mut runs = Vec::new();
        let mut start: Option<u32> = None;

        for j in 0..=len {
            let filled = j < len && if by_x { region.is_filled(i, j) } else { region.is_filled(j, i) };
            match (filled, start) {
                (true, None) => start = Some(j),
                (false, Some(s)) => {
                    runs.push((origin + s as i32, origin + j as i32 - 1));
                    start = None;
                }
                _ => {}
            }
        }

        all.push(runs);
    }
    all
}

/// MD5 of the byte file as 32 lowercase hex digits.
pub fn level_id(bytes: &[u8]) -> String {
    let digest = Md5::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Contents of `level.txt`: the id, a newline, then the asset path.
pub fn level_txt(id: &str, asset_path: &str) -> String {
    format!("{id}\n{asset_path}")
}

/// Parses `level.txt` back into `(id, asset_path)`.
pub fn parse_level_txt(contents: &str) -> Result<(String, String)> {
    let mut lines = contents.splitn(2, '\n');
    let id = lines.next().unwrap_or_default().trim_end_matches('\r');
    let path = lines.next().unwrap_or_default().trim_end();
    if id.len() != 32 || !id.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(LevelError::Format(format!("malformed level id {id:?}")));
    }
    Ok((id.to_string(), path.to_string()))
}

// ─── Decoding ───────────────────────────────────────────────────────────────

/// A region as the game reads it back.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRegion {
    pub id: usize,
    pub color_index: i32,
    pub min_x: i32,
    pub min_y: i32,
    pub width: i32,
    pub height: i32,
    pub number_x: i32,
    pub number_y: i32,
    pub number_size: i32,
    /// Runs are stored per column (`true`) or per row (`false`).
    pub pixels_by_x: bool,
    pub runs: Vec<Vec<(i32, i32)>>,
    pub atlas_index: i32,
    pub atlas_uvs: [f32; 4],
}

impl DecodedRegion {
    pub fn max_x(&self) -> i32 {
        self.min_x.saturating_add(self.width).saturating_sub(1)
    }

    pub fn max_y(&self) -> i32 {
        self.min_y.saturating_add(self.height).saturating_sub(1)
    }

    /// True when the global pixel `(x, y)` belongs to this region.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        if x < self.min_x || x > self.max_x() || y < self.min_y || y > self.max_y() {
            return false;
        }
        let (line, pos) = if self.pixels_by_x {
            (x - self.min_x, y)
        } else {
            (y - self.min_y, x)
        };
        self.runs
            .get(line as usize)
            .is_some_and(|runs| runs.iter().any(|&(start, end)| pos >= start && pos <= end))
    }

    pub fn pixel_count(&self) -> usize {
        self.runs
            .iter()
            .flatten()
            .map(|&(start, end)| (end as i64 - start as i64 + 1).max(0) as usize)
            .sum()
    }
}

/// A decoded level byte file.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelFileData {
    pub image_width: i32,
    pub image_height: i32,
    pub colors: Vec<Rgb>,
    pub regions: Vec<DecodedRegion>,
    /// Number of atlas textures referenced (`max(atlasIndex) + 1`).
    pub atlases: usize,
}

impl LevelFileData {
    /// The region owning the global pixel `(x, y)`, if any.
    pub fn region_at(&self, x: i32, y: i32) -> Option<&DecodedRegion> {
        self.regions.iter().find(|r| r.contains(x, y))
    }
}

/// Decodes a level byte file. Truncated or inconsistent input is a
/// [`LevelError::Format`].
pub fn decode_level(bytes: &[u8]) -> Result<LevelFileData> {
    let mut reader = Cursor::new(bytes);

    let image_width = reader.read_i32_le("imageWidth")?;
    let image_height = reader.read_i32_le("imageHeight")?;

    let num_colors = reader.read_count("numColors")?;
    ensure_remaining(&reader, num_colors.saturating_mul(12), "colors")?;
    let mut colors = Vec::with_capacity(num_colors);
    for _ in 0..num_colors {
        let rgb = reader.read_i32_slice(3, "color")?;
        colors.push(Rgb::new(channel(rgb[0])?, channel(rgb[1])?, channel(rgb[2])?));
    }

    let num_regions = reader.read_count("numRegions")?;
    let mut regions = Vec::with_capacity(num_regions.min(bytes.len() / 4));
    let mut max_atlas: Option<i32> = None;
    for id in 0..num_regions {
        let region = decode_region(&mut reader, id)?;
        max_atlas = Some(max_atlas.map_or(region.atlas_index, |m| m.max(region.atlas_index)));
        regions.push(region);
    }

    if (reader.position() as usize) != bytes.len() {
        return Err(LevelError::Format(format!(
            "{} trailing bytes after the last region",
            bytes.len() - reader.position() as usize
        )));
    }

    Ok(LevelFileData {
        image_width,
        image_height,
        colors,
        regions,
        atlases: max_atlas.map_or(0, |m| (m.max(-1) + 1) as usize),
    })
}

fn decode_region(reader: &mut Cursor<&[u8]>, id: usize) -> Result<DecodedRegion> {
    let header = reader.read_i32_slice(8, "region header")?;
    let (width, height) = (header[3], header[4]);
    if width < 0 || height < 0 {
        return Err(LevelError::Format(format!("region {id} has negative size {width}x{height}")));
    }
    if header[1].checked_add(width).is_none() || header[2].checked_add(height).is_none() {
        return Err(LevelError::Format(format!(
            "region {id} at ({}, {}) extends past the coordinate range",
            header[1], header[2]
        )));
    }

    let pixels_by_x = width < height;
    let lines = (if pixels_by_x { width } else { height }) as usize;
    ensure_remaining(reader, lines.saturating_mul(4), "run lists")?;

    let mut runs = Vec::with_capacity(lines);
    for _ in 0..lines {
        let num_sub_values = reader.read_count("numSubValues")?;
        if num_sub_values % 2 != 0 {
            return Err(LevelError::Format(format!(
                "region {id} has an odd run value count {num_sub_values}"
            )));
        }
        ensure_remaining(reader, num_sub_values.saturating_mul(4), "runs")?;
        let values = reader.read_i32_slice(num_sub_values, "runs")?;
        let line_runs: Vec<(i32, i32)> = values.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect();
        if let Some(&(start, end)) = line_runs.iter().find(|(start, end)| start > end) {
            return Err(LevelError::Format(format!("region {id} has a reversed run {start}..{end}")));
        }
        runs.push(line_runs);
    }

    let atlas_index = reader.read_i32_le("atlasIndex")?;
    let mut atlas_uvs = [0.0f32; 4];
    for uv in atlas_uvs.iter_mut() {
        *uv = reader.read_f32_le("atlasUvs")?;
    }

    Ok(DecodedRegion {
        id,
        color_index: header[0],
        min_x: header[1],
        min_y: header[2],
        width,
        height,
        number_x: header[5],
        number_y: header[6],
        number_size: header[7],
        pixels_by_x,
        runs,
        atlas_index,
        atlas_uvs,
    })
}

fn channel(value: i32) -> Result<u8> {
    u8::try_from(value).map_err(|_| LevelError::Format(format!("color channel {value} out of range")))
}

fn ensure_remaining(reader: &Cursor<&[u8]>, needed: usize, field: &str) -> Result<()> {
    let remaining = reader.get_ref().len().saturating_sub(reader.position() as usize);
    if needed > remaining {
        return Err(LevelError::Format(format!(
            "truncated level file: {field} needs {needed} bytes, {remaining} left"
        )));
    }
    Ok(())
}
