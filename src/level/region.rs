//! Flood-fill segmentation of the ink grid into paintable regions.
//!
//! ## Scan order
//!
//! Seeds are taken column by column (`x` outer, `y` inner). Each seed grows an
//! iterative 4-connected fill bounded by line pixels and the image edge.
//! Neighbours are pushed `+x, -x, +y, -y`, so the stack pops `-y` first.
//! Region indices follow seed order, which makes the whole level file
//! depend on this order.
//!
//! ## Size filter
//!
//! Only fully open pixels (ink alpha 0) count towards a region's size. A
//! component with fewer of them than the threshold is dropped without
//! consuming an index; its pixels stay visited and belong to nothing.

use bitvec::prelude::*;

use super::line_image::{InkPixel, LineImage};
use crate::image::geom::AreaBounds;

// ─── Region ─────────────────────────────────────────────────────────────────

/// A connected area of non-line pixels, enriched stage by stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Zero-based position among the kept regions, in seed order.
    pub index: usize,
    /// Palette entry, or `-1` for a blank region.
    pub color_index: i32,
    pub min_x: i32,
    pub min_y: i32,
    pub width: u32,
    pub height: u32,
    /// Row-major `width * height` cells; `Some(alpha)` for member pixels.
    pub mask: Vec<Option<u8>>,
    /// Inclusive local bounds of the number rectangle.
    pub number_area: AreaBounds,
    pub atlas_index: i32,
    /// `[u0, v0, u1, v1]` inside the owning atlas.
    pub atlas_uvs: [f32; 4],
}

impl Region {
    /// Builds a region from its member pixels (global coordinates).
    ///
    /// Number area, color and atlas placement start empty.
    pub fn from_pixels(index: usize, pixels: &[InkPixel]) -> Region {
        if pixels.is_empty() {
            return Region {
                index,
                color_index: -1,
                min_x: 0,
                min_y: 0,
                width: 0,
                height: 0,
                mask: Vec::new(),
                number_area: AreaBounds::default(),
                atlas_index: -1,
                atlas_uvs: [0.0; 4],
            };
        }

        let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
        let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);
        for p in pixels {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let width = (max_x - min_x + 1) as u32;
        let height = (max_y - min_y + 1) as u32;
        let mut mask = vec![None; width as usize * height as usize];
        for p in pixels {
            let local = (p.y - min_y) as usize * width as usize + (p.x - min_x) as usize;
            mask[local] = Some(p.alpha);
        }

        Region {
            index,
            color_index: -1,
            min_x,
            min_y,
            width,
            height,
            mask,
            number_area: AreaBounds::default(),
            atlas_index: -1,
            atlas_uvs: [0.0; 4],
        }
    }

    /// Ink alpha of the local cell `(x, y)` if it is a member pixel.
    #[inline]
    pub fn cell(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.mask[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn is_filled(&self, x: u32, y: u32) -> bool {
        self.cell(x, y).is_some()
    }

    /// Membership test in global image coordinates.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (lx, ly) = (x - self.min_x, y - self.min_y);
        lx >= 0 && ly >= 0 && self.is_filled(lx as u32, ly as u32)
    }

    pub fn pixel_count(&self) -> usize {
        self.mask.iter().filter(|c| c.is_some()).count()
    }

    /// Bounding-box area, the packing sort key.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Member pixels as global `(x, y, alpha)` triples, row by row.
    pub fn global_pixels(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        let w = self.width.max(1) as usize;
        self.mask.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|alpha| {
                (
                    self.min_x + (i % w) as i32,
                    self.min_y + (i / w) as i32,
                    alpha,
                )
            })
        })
    }

    /// Global center cell of the number area.
    pub fn number_center(&self) -> (i32, i32) {
        self.number_area.center(self.min_x, self.min_y)
    }
}

// ─── Extraction ─────────────────────────────────────────────────────────────

/// Walks the ink grid and returns the kept regions in seed order.
pub struct RegionExtractor<'a> {
    image: &'a LineImage,
    visited: BitVec,
    size_threshold: f32,
    next_index: usize,
    stack: Vec<(i32, i32)>,
}

impl<'a> RegionExtractor<'a> {
    pub fn new(image: &'a LineImage, size_threshold: f32) -> Self {
        RegionExtractor {
            image,
            visited: bitvec![0; image.len()],
            size_threshold,
            next_index: 0,
            stack: Vec::new(),
        }
    }

    pub fn run(mut self) -> Vec<Region> {
        let mut regions = Vec::new();
        let (width, height) = (self.image.width() as i32, self.image.height() as i32);

        for x in 0..width {
            for y in 0..height {
                let Some(i) = self.image.index_of(x, y) else {
                    continue;
                };
                if self.visited[i] || self.image.is_line(self.image.alpha_at(i)) {
                    continue;
                }

                let pixels = self.flood_fill(x, y);
                let open = pixels.iter().filter(|p| p.alpha == 0).count();
                if (open as f32) < self.size_threshold {
                    continue;
                }

                regions.push(Region::from_pixels(self.next_index, &pixels));
                self.next_index += 1;
            }
        }

        regions
    }

    /// Collects the non-line pixels connected to `(x, y)`. Every reached pixel,
    /// line or not, ends up visited.
    fn flood_fill(&mut self, x: i32, y: i32) -> Vec<InkPixel> {
        let mut pixels = Vec::new();
        self.stack.clear();
        self.stack.push((x, y));

        while let Some((px, py)) = self.stack.pop() {
            let Some(i) = self.image.index_of(px, py) else {
                continue;
            };
            if self.visited[i] {
                continue;
            }
            self.visited.set(i, true);

            let alpha = self.image.alpha_at(i);
            if self.image.is_line(alpha) {
                continue;
            }
            pixels.push(InkPixel {
                x: px,
                y: py,
                alpha,
            });

            self.stack.push((px + 1, py));
            self.stack.push((px - 1, py));
            self.stack.push((px, py + 1));
            self.stack.push((px, py - 1));
        }

        pixels
    }
}

/// Segments `image` into regions, dropping those with fewer than
/// `region_size_threshold` fully open pixels.
pub fn extract_regions(image: &LineImage, region_size_threshold: f32) -> Vec<Region> {
    RegionExtractor::new(image, region_size_threshold).run()
}
