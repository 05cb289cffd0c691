// src/worker/settings.rs

use crate::image::image_formats::Pixmap;
use crate::level::atlas::PackSettings;
use crate::level::palette::PaletteSettings;
use crate::utils::error::{LevelError, Result};

/// Parameters for turning one image pair into a level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSettings {
    /// Ink alpha (0-255) at which a line pixel starts (default: 200)
    pub line_threshold: f32,
    /// Regions sampling opaque white are left blank
    pub ignore_white_regions: bool,
    /// Minimum number of fully open pixels for a region to be kept (default: 24)
    pub region_size_threshold: f32,
    /// LAB distance up to which a region reuses a palette color (default: 0.1)
    pub color_merge_threshold: f32,
    pub pack: PackSettings,
    /// Prefix of the asset path written to `level.txt`
    pub asset_prefix: String,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            line_threshold: 200.0,
            ignore_white_regions: false,
            region_size_threshold: 24.0,
            color_merge_threshold: 0.1,
            pack: PackSettings::default(),
            asset_prefix: "Assets/Levels".to_string(),
        }
    }
}

impl LevelSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_threshold(mut self, threshold: f32) -> Self {
        self.line_threshold = threshold;
        self
    }

    pub fn with_ignore_white_regions(mut self, ignore: bool) -> Self {
        self.ignore_white_regions = ignore;
        self
    }

    pub fn with_region_size_threshold(mut self, threshold: f32) -> Self {
        self.region_size_threshold = threshold;
        self
    }

    pub fn with_color_merge_threshold(mut self, threshold: f32) -> Self {
        self.color_merge_threshold = threshold;
        self
    }

    pub fn with_pack_padding(mut self, padding: u32) -> Self {
        self.pack.padding = padding;
        self
    }

    pub fn with_max_pack_size(mut self, exponent: u32) -> Self {
        self.pack.max_pack_size = exponent;
        self
    }

    pub fn with_pack_settings(mut self, pack: PackSettings) -> Self {
        self.pack = pack;
        self
    }

    pub fn with_asset_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.asset_prefix = prefix.into();
        self
    }

    pub fn palette(&self) -> PaletteSettings {
        PaletteSettings {
            ignore_white_regions: self.ignore_white_regions,
            color_merge_threshold: self.color_merge_threshold,
        }
    }

    /// Asset path recorded in `level.txt` for a level folder named `name`.
    pub fn asset_path(&self, name: &str) -> String {
        asset_path(&self.asset_prefix, name)
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("line threshold", self.line_threshold),
            ("region size threshold", self.region_size_threshold),
            ("color merge threshold", self.color_merge_threshold),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(LevelError::InvalidArg(format!("{name} must be finite, got {value}")));
            }
        }
        if self.color_merge_threshold < 0.0 {
            return Err(LevelError::InvalidArg(format!(
                "color merge threshold must not be negative, got {}",
                self.color_merge_threshold
            )));
        }
        self.pack.validate()
    }
}

/// Joins an asset prefix and a level folder name.
pub fn asset_path(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

/// The two source images of one level, both bottom-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePair {
    pub colored: Pixmap,
    pub lines: Pixmap,
}

impl ImagePair {
    pub fn new(colored: Pixmap, lines: Pixmap) -> Self {
        ImagePair { colored, lines }
    }

    /// Common size of both images, or [`LevelError::InputMismatch`].
    pub fn dimensions(&self) -> Result<(u32, u32)> {
        let colored = self.colored.dimensions();
        let lines = self.lines.dimensions();
        if colored != lines {
            return Err(LevelError::InputMismatch { colored, lines });
        }
        Ok(colored)
    }
}
