//! Number placement: the largest squarish rectangle of filled cells.
//!
//! Rows are swept bottom to top while a per-column histogram tracks how many
//! filled cells stand directly below-and-including the current row. Each row
//! is then treated as the classic "largest rectangle in a histogram" problem
//! with a monotonic stack. Candidates are ranked by their shorter side
//! (`min(x1 - x0, y1 - y0)`), not their area, and only a strictly larger
//! value replaces the current best, so the earliest candidate wins ties.

use super::region::Region;
use crate::image::geom::AreaBounds;

#[inline]
fn keep_larger(best: AreaBounds, candidate: AreaBounds) -> AreaBounds {
    if candidate.size() > best.size() { candidate } else { best }
}

/// Finds the number rectangle of a `width` x `height` mask.
///
/// Returns inclusive local bounds. A mask with no filled cells, or one whose
/// best rectangle is a single row or column, yields `[0, 0, 0, 0]`.
pub fn find_number_area<F>(width: u32, height: u32, is_filled: F) -> AreaBounds
where
    F: Fn(u32, u32) -> bool,
{
    let width = width as usize;
    let mut histogram = vec![0i32; width];
    let mut stack: Vec<usize> = Vec::with_capacity(width);
    let mut best = AreaBounds::default();

    for row in 0..height {
        for (col, bar) in histogram.iter_mut().enumerate() {
            *bar = if is_filled(col as u32, row) { *bar + 1 } else { 0 };
        }

        let row = row as i32;
        stack.clear();
        let mut i = 0usize;

        while i < width {
            match stack.last() {
                Some(&top) if histogram[top] > histogram[i] => {
                    stack.pop();
                    let left = stack.last().map_or(0, |&s| s as i32 + 1);
                    let candidate = AreaBounds::new(left, row - histogram[top] + 1, i as i32 - 1, row);
                    best = keep_larger(best, candidate);
                }
                _ => {
                    stack.push(i);
                    i += 1;
                }
            }
        }

        while let Some(top) = stack.pop() {
            let left = stack.last().map_or(0, |&s| s as i32 + 1);
            let candidate = AreaBounds::new(left, row - histogram[top] + 1, i as i32 - 1, row);
            best = keep_larger(best, candidate);
        }
    }

    best
}

/// Stores the number rectangle of `region` in its `number_area`.
pub fn locate_number_area(region: &mut Region) {
    region.number_area = find_number_area(region.width, region.height, |x, y| region.is_filled(x, y));
}
