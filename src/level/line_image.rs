//! Conversion of the line-art image into an ink-alpha grid.
//!
//! Every pixel of the line image gets an *ink alpha* in `0..=255`: how much
//! line ink covers it. Translucent source pixels carry their own alpha;
//! opaque ones are inverted grayscale, so black ink reads as 255 and white
//! paper as 0. Pixels whose ink alpha reaches the line threshold are *line
//! pixels*; everything else can belong to a region.

use crate::image::image_formats::{Pixmap, Rgba};

/// One cell of the ink grid, in global (bottom-left origin) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkPixel {
    pub x: i32,
    pub y: i32,
    pub alpha: u8,
}

/// Immutable ink-alpha grid built from the line image.
#[derive(Debug, Clone)]
pub struct LineImage {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
    line_threshold: f32,
}

/// Ink alpha of a single source pixel.
pub fn ink_alpha(pixel: Rgba) -> u8 {
    if pixel.a < 255 {
        return pixel.a;
    }
    let ink = 255.0 - (pixel.grayscale() * 255.0).round_ties_even();
    ink.clamp(0.0, 255.0) as u8
}

impl LineImage {
    /// Builds the grid from the line image's pixels. Row order is kept as is.
    pub fn from_rgba(lines: &Pixmap, line_threshold: f32) -> Self {
        let alpha = lines.pixels().iter().map(|&p| ink_alpha(p)).collect();
        LineImage {
            width: lines.width(),
            height: lines.height(),
            alpha,
            line_threshold,
        }
    }

    /// Builds a grid directly from ink alpha values (row-major).
    pub fn from_alpha(width: u32, height: u32, alpha: Vec<u8>, line_threshold: f32) -> Self {
        assert_eq!(alpha.len(), width as usize * height as usize);
        LineImage {
            width,
            height,
            alpha,
            line_threshold,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn line_threshold(&self) -> f32 {
        self.line_threshold
    }

    pub fn len(&self) -> usize {
        self.alpha.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alpha.is_empty()
    }

    /// Flat index of `(x, y)`, or `None` outside the image.
    #[inline]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<InkPixel> {
        self.index_of(x, y).map(|i| InkPixel {
            x,
            y,
            alpha: self.alpha[i],
        })
    }

    #[inline]
    pub fn alpha_at(&self, index: usize) -> u8 {
        self.alpha[index]
    }

    /// True when `alpha` counts as line ink under this image's threshold.
    #[inline]
    pub fn is_line(&self, alpha: u8) -> bool {
        alpha as f32 >= self.line_threshold
    }

    /// Number of line pixels in the grid.
    pub fn line_pixel_count(&self) -> usize {
        self.alpha.iter().filter(|&&a| self.is_line(a)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ink_alpha_opaque_inverts_grayscale() {
        assert_eq!(ink_alpha(Rgba::opaque(0, 0, 0)), 255);
        assert_eq!(ink_alpha(Rgba::white()), 0);
        // 0.5 gray lands on 127.5 -> ties to even
        let mid = ink_alpha(Rgba::opaque(128, 128, 128));
        assert!(mid == 127 || mid == 128);
    }

    #[test]
    fn test_ink_alpha_translucent_uses_source_alpha() {
        assert_eq!(ink_alpha(Rgba::new(0, 0, 0, 0)), 0);
        assert_eq!(ink_alpha(Rgba::new(255, 255, 255, 200)), 200);
        assert_eq!(ink_alpha(Rgba::new(10, 10, 10, 254)), 254);
    }

    #[test]
    fn test_line_classification() {
        let mut pm = Pixmap::new(2, 1);
        pm.put_pixel(0, 0, Rgba::opaque(0, 0, 0));
        let img = LineImage::from_rgba(&pm, 200.0);

        assert!(img.is_line(img.pixel(0, 0).unwrap().alpha));
        assert!(!img.is_line(img.pixel(1, 0).unwrap().alpha));
        assert!(img.is_line(200));
        assert!(!img.is_line(199));
        assert_eq!(img.line_pixel_count(), 1);
    }

    #[test]
    fn test_out_of_bounds_is_none() {
        let img = LineImage::from_alpha(3, 2, vec![0; 6], 200.0);
        assert!(img.pixel(-1, 0).is_none());
        assert!(img.pixel(0, 2).is_none());
        assert_eq!(img.index_of(2, 1), Some(5));
    }
}
