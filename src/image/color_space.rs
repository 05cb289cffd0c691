//! RGB to CIE L*a*b* conversion and the CIE76 color difference.
//!
//! The XYZ step keeps the channels on a 0..1 scale while the reference white
//! divisors are the usual 0..100 ones (95.047, 100, 108.883). Merge
//! thresholds (default `0.1`) are expressed on that scale.

use crate::image::image_formats::Rgb;

/// A color in L*a*b* space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

const REF_X: f32 = 95.047;
const REF_Y: f32 = 100.0;
const REF_Z: f32 = 108.883;

#[inline]
fn srgb_to_linear(value: f32) -> f32 {
    if value > 0.04045 {
        ((value + 0.055) / 1.055).powf(2.4)
    } else {
        value / 12.92
    }
}

#[inline]
fn lab_f(value: f32) -> f32 {
    if value > 0.008856 {
        value.powf(1.0 / 3.0)
    } else {
        7.787 * value + 16.0 / 116.0
    }
}

/// Converts an 8-bit RGB color to XYZ (0..1 scale).
pub fn rgb_to_xyz(color: Rgb) -> (f32, f32, f32) {
    let r = srgb_to_linear(color.r as f32 / 255.0);
    let g = srgb_to_linear(color.g as f32 / 255.0);
    let b = srgb_to_linear(color.b as f32 / 255.0);

    (
        r * 0.412453 + g * 0.357580 + b * 0.180423,
        r * 0.212671 + g * 0.715160 + b * 0.072169,
        r * 0.019334 + g * 0.119193 + b * 0.950227,
    )
}

/// Converts an 8-bit RGB color to L*a*b*.
pub fn rgb_to_lab(color: Rgb) -> Lab {
    let (x, y, z) = rgb_to_xyz(color);

    let fx = lab_f(x / REF_X);
    let fy = lab_f(y / REF_Y);
    let fz = lab_f(z / REF_Z);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Euclidean distance between two colors in L*a*b* space (CIE76).
pub fn color_distance(c1: Rgb, c2: Rgb) -> f32 {
    let lab1 = rgb_to_lab(c1);
    let lab2 = rgb_to_lab(c2);

    let dl = lab2.l - lab1.l;
    let da = lab2.a - lab1.a;
    let db = lab2.b - lab1.b;

    (dl * dl + da * da + db * db).sqrt()
}
