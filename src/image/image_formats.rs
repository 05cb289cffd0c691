// src/image/image_formats.rs

//! In-memory representations for the colored and line-art source images.
//!
//! `Pixmap` is a flat RGBA buffer addressed with a **bottom-left** origin:
//! row 0 is the bottom row of the picture. Level files and atlases are written
//! in that convention, so anything decoded through the `image` crate (which is
//! top-down) is flipped on the way in and on the way out.

use crate::utils::error::{LevelError, Result};
use bytemuck::{Pod, Zeroable};

// --- Pixel Type Definitions ---

/// A single RGBA pixel with 8-bit components.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Rgba { r: 0, g: 0, b: 0, a: 0 }
    }

    pub const fn white() -> Self {
        Rgba::opaque(255, 255, 255)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Drops the alpha channel.
    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Perceptual luminance on 0..1 channels (`0.299 R + 0.587 G + 0.114 B`).
    pub fn grayscale(&self) -> f32 {
        0.299 * (self.r as f32 / 255.0) + 0.587 * (self.g as f32 / 255.0) + 0.114 * (self.b as f32 / 255.0)
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(arr: [u8; 4]) -> Self {
        Rgba::new(arr[0], arr[1], arr[2], arr[3])
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(p: Rgba) -> Self {
        [p.r, p.g, p.b, p.a]
    }
}

/// An opaque palette color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub const fn white() -> Self {
        Rgb::new(255, 255, 255)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(arr: [u8; 3]) -> Self {
        Rgb::new(arr[0], arr[1], arr[2])
    }
}

// --- Pixmap Type (RGBA Image Buffer) ---

/// A 2D buffer of RGBA pixels, row-major, `y = 0` at the bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<Rgba>,
}

impl Pixmap {
    /// Creates a new pixmap with the given dimensions, fully transparent.
    pub fn new(width: u32, height: u32) -> Self {
        Pixmap::from_pixel(width, height, Rgba::transparent())
    }

    /// Creates a pixmap filled with a single pixel value.
    pub fn from_pixel(width: u32, height: u32, pixel: Rgba) -> Self {
        Pixmap {
            width,
            height,
            data: vec![pixel; width as usize * height as usize],
        }
    }

    /// Creates a pixmap from a row-major vector of pixels.
    pub fn from_vec(width: u32, height: u32, data: Vec<Rgba>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(LevelError::InvalidArg(format!(
                "pixel buffer holds {} pixels, expected {}x{} = {}",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Pixmap {
            width,
            height,
            data,
        })
    }

    /// Creates a pixmap from raw RGBA bytes (4 bytes per pixel, row-major).
    pub fn from_raw(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 4 != 0 {
            return Err(LevelError::InvalidArg(format!(
                "raw RGBA buffer length {} is not a multiple of 4",
                bytes.len()
            )));
        }
        Pixmap::from_vec(width, height, bytemuck::pod_collect_to_vec(bytes))
    }

    /// Creates a pixmap by calling a function for each pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Rgba,
    {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Pixmap {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the dimensions as a tuple (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Rgba {
        assert!(x < self.width && y < self.height);
        self.data[self.offset(x, y)]
    }

    /// Bounds-checked read; `None` outside the image.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.data[self.offset(x as u32, y as u32)])
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, pixel: Rgba) {
        assert!(x < self.width && y < self.height);
        let offset = self.offset(x, y);
        self.data[offset] = pixel;
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.data
    }

    /// Returns raw pixel data as a byte slice.
    pub fn as_raw(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Returns a copy with the row order reversed (bottom-up <-> top-down).
    pub fn flipped_vertically(&self) -> Pixmap {
        let row = self.width as usize;
        let mut data = Vec::with_capacity(self.data.len());
        if row > 0 {
            for chunk in self.data.chunks_exact(row).rev() {
                data.extend_from_slice(chunk);
            }
        }
        Pixmap {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Converts a decoded image (top-down) into a bottom-left origin pixmap.
    pub fn from_image(img: &::image::DynamicImage) -> Pixmap {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let data: Vec<Rgba> = bytemuck::pod_collect_to_vec(rgba.as_raw());
        Pixmap {
            width,
            height,
            data,
        }
        .flipped_vertically()
    }

    /// Decodes an image file. Any failure is reported as an unreadable source.
    pub fn open(path: &std::path::Path) -> Result<Pixmap> {
        let img = ::image::open(path).map_err(|e| LevelError::UnreadablePixelSource {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Pixmap::from_image(&img))
    }

    /// Converts to a top-down `image::RgbaImage`, ready for PNG encoding.
    pub fn to_image(&self) -> ::image::RgbaImage {
        let top_down = self.flipped_vertically();
        let mut out = ::image::RgbaImage::new(self.width, self.height);
        out.copy_from_slice(top_down.as_raw());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        let err = Pixmap::from_vec(2, 2, vec![Rgba::white(); 3]).unwrap_err();
        assert!(matches!(err, LevelError::InvalidArg(_)));
    }

    #[test]
    fn test_from_raw_casts_bytes() {
        let bytes = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let pm = Pixmap::from_raw(2, 1, &bytes).unwrap();
        assert_eq!(pm.get_pixel(0, 0), Rgba::new(1, 2, 3, 4));
        assert_eq!(pm.get_pixel(1, 0), Rgba::new(5, 6, 7, 8));
        assert_eq!(pm.as_raw(), &bytes);
    }

    #[test]
    fn test_bounds_checked_access() {
        let pm = Pixmap::from_pixel(3, 2, Rgba::white());
        assert_eq!(pm.pixel(2, 1), Some(Rgba::white()));
        assert_eq!(pm.pixel(-1, 0), None);
        assert_eq!(pm.pixel(3, 0), None);
        assert_eq!(pm.pixel(0, 2), None);
    }

    #[test]
    fn test_image_roundtrip_flips_rows() {
        let mut img = ::image::RgbaImage::new(2, 2);
        // Top-left red in image-crate (top-down) coordinates
        img.put_pixel(0, 0, ::image::Rgba([255, 0, 0, 255]));
        let pm = Pixmap::from_image(&::image::DynamicImage::ImageRgba8(img.clone()));
        // ... which is the top row, i.e. y = height - 1 in bottom-left coordinates
        assert_eq!(pm.get_pixel(0, 1), Rgba::opaque(255, 0, 0));
        assert_eq!(pm.get_pixel(0, 0), Rgba::transparent());
        assert_eq!(pm.to_image(), img);
    }

    #[test]
    fn test_grayscale_weights() {
        assert!((Rgba::white().grayscale() - 1.0).abs() < 1e-6);
        assert_eq!(Rgba::opaque(0, 0, 0).grayscale(), 0.0);
        assert!((Rgba::opaque(255, 0, 0).grayscale() - 0.299).abs() < 1e-6);
    }
}
