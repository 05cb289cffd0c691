//! Bin packing of region masks into power-of-two texture atlases.
//!
//! Regions are packed largest bounding box first. Each atlas tries a fixed
//! sequence of sizes (exponents of two, width grows first, then the height
//! catches up) and keeps the first size that takes every remaining region.
//! When even the largest size cannot take them all, that attempt's placed
//! prefix becomes the atlas and packing continues with a fresh one.
//!
//! Placement is a first-fit scan, bottom row first. Every placed region is
//! surrounded by `padding` empty cells on all sides, so two padded boxes
//! never intersect.

use tracing::debug;

use super::region::Region;
use crate::image::geom::Rect;
use crate::utils::error::{LevelError, Result};

/// Size search and spacing of the packer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackSettings {
    /// Exponent of the first atlas side tried (`2^9 = 512`).
    pub pack_size_start: u32,
    /// Largest exponent either side may reach (`2^11 = 2048`).
    pub max_pack_size: u32,
    /// Empty cells kept around every packed region.
    pub padding: u32,
}

impl Default for PackSettings {
    fn default() -> Self {
        PackSettings {
            pack_size_start: 9,
            max_pack_size: 11,
            padding: 4,
        }
    }
}

impl PackSettings {
    pub fn max_atlas_size(&self) -> u32 {
        1u32 << self.max_pack_size
    }

    /// Atlas sizes in the order they are tried.
    ///
    /// `(w, h)` exponents start equal; after each failure the height catches
    /// up if it lags, otherwise the width grows.
    pub fn size_sequence(&self) -> Vec<(u32, u32)> {
        let mut sizes = Vec::new();
        let (mut w, mut h) = (self.pack_size_start, self.pack_size_start);
        while w <= self.max_pack_size && h <= self.max_pack_size {
            sizes.push((1u32 << w, 1u32 << h));
            if w != h {
                h = w;
            } else {
                w += 1;
            }
        }
        sizes
    }

    pub fn validate(&self) -> Result<()> {
        if self.pack_size_start > self.max_pack_size {
            return Err(LevelError::InvalidArg(format!(
                "pack size start 2^{} exceeds max pack size 2^{}",
                self.pack_size_start, self.max_pack_size
            )));
        }
        if self.max_pack_size > 15 {
            return Err(LevelError::InvalidArg(format!(
                "max pack size 2^{} is too large",
                self.max_pack_size
            )));
        }
        Ok(())
    }
}

/// One region's placement inside an atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedRegion {
    /// Position of the region in the region list (equals `Region::index`).
    pub region: usize,
    pub start_x: u32,
    pub start_y: u32,
    pub width: u32,
    pub height: u32,
}

impl PackedRegion {
    pub fn rect(&self) -> Rect {
        Rect::new(self.start_x as i32, self.start_y as i32, self.width, self.height)
    }
}

/// One atlas texture and the regions drawn into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureAtlasInfo {
    pub width: u32,
    pub height: u32,
    pub packed: Vec<PackedRegion>,
}

/// Packs every region and stores its atlas index and UVs on it.
///
/// Fails with [`LevelError::RegionTooLargeForAtlas`] when a region does not
/// fit even an empty atlas of the maximum size.
pub fn pack_regions(regions: &mut [Region], settings: &PackSettings) -> Result<Vec<TextureAtlasInfo>> {
    settings.validate()?;

    let mut order: Vec<usize> = (0..regions.len()).collect();
    order.sort_by(|&a, &b| regions[b].area().cmp(&regions[a].area()));

    let max_size = settings.max_atlas_size() as u64;
    let padded = |side: u32| side as u64 + 2 * settings.padding as u64;
    if let Some(region) = order
        .iter()
        .map(|&i| &regions[i])
        .find(|r| padded(r.width) > max_size || padded(r.height) > max_size)
    {
        return Err(too_large(region, settings));
    }

    let sizes = settings.size_sequence();
    let mut atlases = Vec::new();
    let mut next = 0usize;

    while next < order.len() {
        let remaining = &order[next..];
        let mut placed = Vec::new();
        let mut chosen = (0, 0);

        for &(width, height) in &sizes {
            let (attempt, complete) = pack_attempt(width, height, remaining, regions, settings.padding);
            placed = attempt;
            chosen = (width, height);
            if complete {
                break;
            }
            debug!(width, height, placed = placed.len(), remaining = remaining.len(), "atlas size too small");
        }

        if placed.is_empty() {
            return Err(too_large(&regions[remaining[0]], settings));
        }

        next += placed.len();
        debug!(
            atlas = atlases.len(),
            width = chosen.0,
            height = chosen.1,
            regions = placed.len(),
            "atlas packed"
        );
        atlases.push(TextureAtlasInfo {
            width: chosen.0,
            height: chosen.1,
            packed: placed,
        });
    }

    for (atlas_index, atlas) in atlases.iter().enumerate() {
        let (w, h) = (atlas.width as f32, atlas.height as f32);
        for p in &atlas.packed {
            let region = &mut regions[p.region];
            region.atlas_index = atlas_index as i32;
            region.atlas_uvs = [
                p.start_x as f32 / w,
                p.start_y as f32 / h,
                (p.start_x + p.width) as f32 / w,
                (p.start_y + p.height) as f32 / h,
            ];
        }
    }

    Ok(atlases)
}

fn too_large(region: &Region, settings: &PackSettings) -> LevelError {
    LevelError::RegionTooLargeForAtlas {
        region: region.index,
        width: region.width,
        height: region.height,
        max_size: settings.max_atlas_size(),
    }
}

/// Tries to place `order` into a `width` x `height` atlas, in order, stopping
/// at the first region that does not fit. Returns the placed prefix and
/// whether every region was placed.
fn pack_attempt(
    width: u32,
    height: u32,
    order: &[usize],
    regions: &[Region],
    padding: u32,
) -> (Vec<PackedRegion>, bool) {
    let pad = padding as i32;
    let mut placed: Vec<PackedRegion> = Vec::with_capacity(order.len());
    let mut padded: Vec<Rect> = Vec::with_capacity(order.len());

    for &index in order {
        let region = &regions[index];
        match find_position(width, height, region.width, region.height, &padded, pad) {
            Some((x, y)) => {
                let entry = PackedRegion {
                    region: index,
                    start_x: x,
                    start_y: y,
                    width: region.width,
                    height: region.height,
                };
                padded.push(entry.rect().inflate(pad));
                placed.push(entry);
            }
            None => return (placed, false),
        }
    }

    (placed, true)
}

/// First-fit position scan: rows from the bottom, and within a row jump past
/// whichever padded box blocks the candidate.
fn find_position(
    atlas_w: u32,
    atlas_h: u32,
    w: u32,
    h: u32,
    padded: &[Rect],
    pad: i32,
) -> Option<(u32, u32)> {
    if w > atlas_w || h > atlas_h {
        return None;
    }

    for y in 0..=(atlas_h - h) {
        let mut x = 0u32;
        while x + w <= atlas_w {
            let candidate = Rect::new(x as i32, y as i32, w, h).inflate(pad);
            match padded.iter().find(|r| r.overlaps(&candidate)) {
                None => return Some((x, y)),
                Some(blocker) => {
                    let skip = blocker.x_max() + pad;
                    x = skip.max(x as i32 + 1) as u32;
                }
            }
        }
    }

    None
}
