pub mod color_space;
pub mod geom;
pub mod image_formats;

pub use color_space::{Lab, color_distance, rgb_to_lab};
pub use geom::{AreaBounds, Rect};
pub use image_formats::{Pixmap, Rgb, Rgba};
