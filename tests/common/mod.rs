#![allow(dead_code)]

use level_creator::{ImagePair, Pixmap, Rgba};

/// Colors used by the synthetic pictures, cycled per cell.
pub const CELL_COLORS: [Rgba; 4] = [
    Rgba::opaque(230, 40, 40),
    Rgba::opaque(40, 200, 60),
    Rgba::opaque(30, 60, 220),
    Rgba::opaque(240, 220, 30),
];

/// A line drawing of a `cols` x `rows` grid of cells, each `cell` pixels wide,
/// separated by 2-pixel black lines with a soft gray edge on one side.
pub fn grid_lines(cols: u32, rows: u32, cell: u32) -> Pixmap {
    let pitch = cell + 2;
    let width = cols * pitch + 2;
    let height = rows * pitch + 2;
    Pixmap::from_fn(width, height, |x, y| {
        let (mx, my) = (x % pitch, y % pitch);
        if mx < 2 || my < 2 {
            Rgba::opaque(0, 0, 0)
        } else if mx == 2 || my == 2 {
            // Anti-aliased edge: ink 128, below the default line threshold.
            Rgba::new(0, 0, 0, 128)
        } else {
            Rgba::transparent()
        }
    })
}

/// The colored picture matching [`grid_lines`]. Cell `(c, r)` uses
/// `CELL_COLORS[(c + r) % 4]`, nudged by one unit on odd rows.
pub fn grid_colors(cols: u32, rows: u32, cell: u32) -> Pixmap {
    let pitch = cell + 2;
    let width = cols * pitch + 2;
    let height = rows * pitch + 2;
    Pixmap::from_fn(width, height, |x, y| {
        let c = (x / pitch).min(cols.saturating_sub(1));
        let r = (y / pitch).min(rows.saturating_sub(1));
        let base = CELL_COLORS[((c + r) % 4) as usize];
        if r % 2 == 1 {
            Rgba::opaque(base.r.saturating_sub(1), base.g, base.b)
        } else {
            base
        }
    })
}

pub fn grid_pair(cols: u32, rows: u32, cell: u32) -> ImagePair {
    ImagePair::new(grid_colors(cols, rows, cell), grid_lines(cols, rows, cell))
}

/// Saves a pixmap as PNG (top-down, as image viewers expect).
pub fn save_png(pixmap: &Pixmap, path: &std::path::Path) {
    pixmap.to_image().save(path).expect("Failed to save test PNG");
}
