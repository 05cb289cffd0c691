// src/worker/pipeline.rs

//! One image pair in, one level out.
//!
//! Stages run in a fixed order because each feeds the next: regions are
//! extracted, then every region gets its number area and, from the number
//! area's center, its color; packing needs the final region sizes; the byte
//! file needs everything.

use tracing::{debug, info, instrument};

use super::settings::{ImagePair, LevelSettings};
use crate::format::atlas_png::{encode_png, render_atlas};
use crate::format::level_file::{encode_level, level_id};
use crate::image::image_formats::Rgb;
use crate::level::atlas::{TextureAtlasInfo, pack_regions};
use crate::level::line_image::LineImage;
use crate::level::number_area::locate_number_area;
use crate::level::palette::{Palette, assign_region_colors};
use crate::level::region::{Region, extract_regions};
use crate::utils::error::{LevelError, Result};
use crate::utils::progress::{ProgressHandle, ProgressStep};

/// Everything produced for one level.
#[derive(Debug, Clone)]
pub struct LevelOutput {
    pub width: u32,
    pub height: u32,
    /// Regions in index order, fully enriched.
    pub regions: Vec<Region>,
    pub colors: Vec<Rgb>,
    pub atlases: Vec<TextureAtlasInfo>,
    /// Contents of `bytes.bytes`.
    pub bytes: Vec<u8>,
    /// MD5 of `bytes`, lowercase hex.
    pub id: String,
    /// Encoded `atlas_<i>.png` files, by atlas index.
    pub atlas_pngs: Vec<Vec<u8>>,
}

/// Runs the level pipeline with fixed settings.
#[derive(Debug, Clone, Default)]
pub struct LevelCreator {
    settings: LevelSettings,
    progress: Option<ProgressHandle>,
}

impl LevelCreator {
    pub fn new(settings: LevelSettings) -> Self {
        LevelCreator {
            settings,
            progress: None,
        }
    }

    /// Reports stage changes to `progress`.
    pub fn with_progress(mut self, progress: ProgressHandle) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn settings(&self) -> &LevelSettings {
        &self.settings
    }

    fn step(&self, step: ProgressStep) {
        if let Some(progress) = &self.progress {
            progress.set_step(step);
        }
    }

    /// Builds regions and palette without packing or encoding.
    pub fn gather_regions(&self, pair: &ImagePair) -> Result<(Vec<Region>, Palette)> {
        let (width, height) = pair.dimensions()?;
        if width == 0 || height == 0 {
            return Err(LevelError::InvalidArg(format!("empty image {width}x{height}")));
        }
        self.settings.validate()?;

        self.step(ProgressStep::GatheringRegions);
        let line_image = LineImage::from_rgba(&pair.lines, self.settings.line_threshold);
        let mut regions = extract_regions(&line_image, self.settings.region_size_threshold);
        debug!(
            regions = regions.len(),
            line_pixels = line_image.line_pixel_count(),
            "regions extracted"
        );

        regions.iter_mut().for_each(locate_number_area);
        let palette = assign_region_colors(&mut regions, &pair.colored, &self.settings.palette());
        debug!(colors = palette.len(), "palette assigned");

        Ok((regions, palette))
    }

    /// Runs every stage for one image pair.
    #[instrument(skip_all, fields(width = pair.colored.width(), height = pair.colored.height()))]
    pub fn process(&self, pair: &ImagePair) -> Result<LevelOutput> {
        let (mut regions, palette) = self.gather_regions(pair)?;
        let (width, height) = pair.colored.dimensions();

        self.step(ProgressStep::PackingRegions);
        let atlases = pack_regions(&mut regions, &self.settings.pack)?;
        debug!(atlases = atlases.len(), "regions packed");

        self.step(ProgressStep::CreateFiles);
        let colors = palette.into_colors();
        let bytes = encode_level(width, height, &colors, &regions)?;
        let id = level_id(&bytes);

        let atlas_pngs = atlases
            .iter()
            .map(|atlas| encode_png(&render_atlas(atlas, &regions)))
            .collect::<Result<Vec<_>>>()?;

        info!(
            id = %id,
            regions = regions.len(),
            colors = colors.len(),
            atlases = atlases.len(),
            "level created"
        );

        Ok(LevelOutput {
            width,
            height,
            regions,
            colors,
            atlases,
            bytes,
            id,
            atlas_pngs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::image_formats::{Pixmap, Rgba};

    fn open_lines(w: u32, h: u32) -> Pixmap {
        Pixmap::from_pixel(w, h, Rgba::transparent())
    }

    #[test]
    fn test_single_open_square() {
        let pair = ImagePair::new(Pixmap::from_pixel(10, 10, Rgba::opaque(200, 10, 10)), open_lines(10, 10));
        let out = LevelCreator::default().process(&pair).unwrap();

        assert_eq!(out.regions.len(), 1);
        let r = &out.regions[0];
        assert_eq!((r.min_x, r.min_y, r.width, r.height), (0, 0, 10, 10));
        assert_eq!(r.number_area.as_array(), [0, 0, 9, 9]);
        assert_eq!(r.color_index, 0);
        assert_eq!(out.colors, vec![Rgb::new(200, 10, 10)]);
        assert_eq!(out.atlases.len(), 1);
        assert_eq!(out.atlas_pngs.len(), 1);
        assert_eq!(out.id.len(), 32);
    }

    #[test]
    fn test_mismatch_checked_first() {
        let pair = ImagePair::new(Pixmap::new(3, 3), open_lines(4, 3));
        let err = LevelCreator::default().process(&pair).unwrap_err();
        assert!(matches!(err, LevelError::InputMismatch { .. }));
    }

    #[test]
    fn test_all_ink_is_an_empty_level() {
        let lines = Pixmap::from_pixel(6, 6, Rgba::opaque(0, 0, 0));
        let pair = ImagePair::new(Pixmap::new(6, 6), lines);
        let out = LevelCreator::default().process(&pair).unwrap();
        assert!(out.regions.is_empty());
        assert!(out.atlases.is_empty());
        assert!(out.colors.is_empty());
        assert_eq!(out.bytes.len(), 16);
    }

    #[test]
    fn test_transparent_color_sample_is_blank() {
        let pair = ImagePair::new(Pixmap::new(8, 8), open_lines(8, 8));
        let out = LevelCreator::default().process(&pair).unwrap();
        assert_eq!(out.regions[0].color_index, -1);
        assert!(out.colors.is_empty());
    }

    #[test]
    fn test_progress_reaches_create_files() {
        let progress = ProgressHandle::new();
        let creator = LevelCreator::default().with_progress(progress.clone());
        let pair = ImagePair::new(Pixmap::from_pixel(8, 8, Rgba::white()), open_lines(8, 8));
        creator.process(&pair).unwrap();
        assert_eq!(progress.snapshot().step, ProgressStep::CreateFiles);
    }
}
