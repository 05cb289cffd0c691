// src/level/palette.rs

//! Palette building for a level.
//!
//! Each region samples the colored image at the center of its number area.
//! Samples are matched against the palette collected so far using the CIE76
//! distance; a sample within the merge threshold reuses the nearest entry,
//! anything further away is appended. Matching never blends: an entry keeps
//! the exact color of the sample that created it.

use super::region::Region;
use crate::image::color_space::color_distance;
use crate::image::image_formats::{Pixmap, Rgb, Rgba};

/// Color index stored for regions that are not painted.
pub const BLANK_COLOR_INDEX: i32 = -1;

/// Parameters of the color merge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteSettings {
    /// Regions sampling opaque white get no color.
    pub ignore_white_regions: bool,
    /// Largest LAB distance at which a sample reuses an existing entry.
    pub color_merge_threshold: f32,
}

impl Default for PaletteSettings {
    fn default() -> Self {
        PaletteSettings {
            ignore_white_regions: false,
            color_merge_threshold: 0.1,
        }
    }
}

/// Append-only list of level colors. The index of an entry is its color number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a palette directly from a list of colors.
    pub fn from_colors(colors: Vec<Rgb>) -> Self {
        Palette { colors }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn into_colors(self) -> Vec<Rgb> {
        self.colors
    }

    /// Finds the entry closest to `color`: the first exact match, otherwise the
    /// first entry with the smallest LAB distance. `None` on an empty palette.
    pub fn closest(&self, color: Rgb) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &entry) in self.colors.iter().enumerate() {
            if entry == color {
                return Some((i, 0.0));
            }
            let diff = color_distance(color, entry);
            if best.is_none_or(|(_, min)| diff < min) {
                best = Some((i, diff));
            }
        }
        best
    }

    /// Assigns a color index to one sampled region color, growing the palette
    /// when the sample is not close enough to any entry.
    pub fn assign(&mut self, sample: Rgba, settings: &PaletteSettings) -> i32 {
        if !sample.is_opaque() || (settings.ignore_white_regions && sample == Rgba::white()) {
            return BLANK_COLOR_INDEX;
        }

        let color = sample.rgb();
        match self.closest(color) {
            Some((index, diff)) if diff <= settings.color_merge_threshold => index as i32,
            _ => {
                self.colors.push(color);
                (self.colors.len() - 1) as i32
            }
        }
    }
}

/// Samples the colored image at each region's number-area center, in region
/// order, and stores the resulting color index on the region.
///
/// Number areas must already be located. Centers outside the image count as
/// transparent and leave the region blank.
pub fn assign_region_colors(regions: &mut [Region], colored: &Pixmap, settings: &PaletteSettings) -> Palette {
    let mut palette = Palette::new();
    for region in regions.iter_mut() {
        region.color_index = assign_region_color(&mut palette, region, colored, settings);
    }
    palette
}

fn assign_region_color(palette: &mut Palette, region: &Region, colored: &Pixmap, settings: &PaletteSettings) -> i32 {
    let (x, y) = region.number_center();
    let sample = colored.pixel(x, y).unwrap_or(Rgba::transparent());
    palette.assign(sample, settings)
}
