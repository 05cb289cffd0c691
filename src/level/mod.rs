//! The level-building stages, leaf first: ink grid, regions, number areas,
//! palette and atlas packing.

pub mod atlas;
pub mod line_image;
pub mod number_area;
pub mod palette;
pub mod region;

pub use atlas::{PackSettings, PackedRegion, TextureAtlasInfo, pack_regions};
pub use line_image::{InkPixel, LineImage};
pub use number_area::{find_number_area, locate_number_area};
pub use palette::{BLANK_COLOR_INDEX, Palette, PaletteSettings, assign_region_colors};
pub use region::{Region, RegionExtractor, extract_regions};
