//! Atlas texture rendering.
//!
//! Each packed region is drawn as white with alpha `255 - ink`, so open
//! pixels are fully opaque and anti-aliased line edges fade out. Cells that
//! no region covers stay fully transparent.

use std::io::Cursor;

use ::image::ImageFormat;

use crate::image::image_formats::{Pixmap, Rgba};
use crate::level::atlas::TextureAtlasInfo;
use crate::level::region::Region;
use crate::utils::error::Result;

/// Renders one atlas in bottom-left origin coordinates.
pub fn render_atlas(atlas: &TextureAtlasInfo, regions: &[Region]) -> Pixmap {
    let mut pixmap = Pixmap::new(atlas.width, atlas.height);

    for packed in &atlas.packed {
        let Some(region) = regions.get(packed.region) else {
            continue;
        };
        for y in 0..region.height {
            for x in 0..region.width {
                if let Some(ink) = region.cell(x, y) {
                    pixmap.put_pixel(
                        packed.start_x + x,
                        packed.start_y + y,
                        Rgba::new(255, 255, 255, 255 - ink),
                    );
                }
            }
        }
    }

    pixmap
}

/// Encodes a pixmap as PNG, top row first.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    pixmap.to_image().write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Decodes PNG (or any format the `image` crate was built with) into a
/// bottom-left origin pixmap.
pub fn decode_png(bytes: &[u8]) -> Result<Pixmap> {
    let img = ::image::load_from_memory(bytes)?;
    Ok(Pixmap::from_image(&img))
}

/// File name of the `index`-th atlas in a level folder.
pub fn atlas_file_name(index: usize) -> String {
    format!("atlas_{index}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::atlas::PackedRegion;
    use crate::level::line_image::InkPixel;

    #[test]
    fn test_render_places_members_only() {
        let pixels = [
            InkPixel { x: 0, y: 0, alpha: 0 },
            InkPixel { x: 1, y: 1, alpha: 55 },
        ];
        let region = Region::from_pixels(0, &pixels);
        let atlas = TextureAtlasInfo {
            width: 8,
            height: 4,
            packed: vec![PackedRegion {
                region: 0,
                start_x: 4,
                start_y: 1,
                width: 2,
                height: 2,
            }],
        };

        let pm = render_atlas(&atlas, &[region]);
        assert_eq!(pm.dimensions(), (8, 4));
        assert_eq!(pm.get_pixel(4, 1), Rgba::new(255, 255, 255, 255));
        assert_eq!(pm.get_pixel(5, 2), Rgba::new(255, 255, 255, 200));
        assert_eq!(pm.get_pixel(5, 1), Rgba::transparent());
        assert_eq!(pm.pixels().iter().filter(|p| p.a > 0).count(), 2);
    }

    #[test]
    fn test_png_roundtrip_preserves_orientation() {
        let mut pm = Pixmap::new(3, 2);
        pm.put_pixel(2, 0, Rgba::new(255, 255, 255, 9));
        let bytes = encode_png(&pm).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));

        // Bottom-left (2, 0) is the last pixel of the PNG's last row.
        let img = ::image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(img.get_pixel(2, 1).0, [255, 255, 255, 9]);

        assert_eq!(decode_png(&bytes).unwrap(), pm);
    }

    #[test]
    fn test_atlas_file_name() {
        assert_eq!(atlas_file_name(3), "atlas_3.png");
    }
}
