//! Shared fixtures for unit tests: mask builders and a reference labeler.

use std::collections::VecDeque;
use std::ops::Range;

use ndarray::{Array2, ArrayView2};

use crate::{ComponentLabeler, FieldError};

/// Mask with `rows[k].1` columns set in row `rows[k].0`.
pub(crate) fn mask_from_rows(shape: (usize, usize), rows: &[(usize, Range<usize>)]) -> Array2<bool> {
    let mut mask = Array2::<bool>::default(shape);
    for (r, cols) in rows {
        for c in cols.clone() {
            mask[[*r, c]] = true;
        }
    }
    mask
}

/// Mask with the rectangle `rows x cols` set.
pub(crate) fn rect_mask(shape: (usize, usize), rows: Range<usize>, cols: Range<usize>) -> Array2<bool> {
    let mut mask = Array2::<bool>::default(shape);
    mask.slice_mut(ndarray::s![rows, cols]).fill(true);
    mask
}

/// Mask of the cells within `radius` of `center` (`[row, col]`).
pub(crate) fn disk_mask(shape: (usize, usize), center: [f64; 2], radius: f64) -> Array2<bool> {
    Array2::from_shape_fn(shape, |(r, c)| {
        let dr = r as f64 - center[0];
        let dc = c as f64 - center[1];
        dr * dr + dc * dc <= radius * radius
    })
}

/// Breadth-first 4-connected labeler numbering components in raster order.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FloodFillLabeler;

impl ComponentLabeler for FloodFillLabeler {
    fn label(&self, mask: ArrayView2<'_, bool>) -> Result<(Array2<i32>, usize), FieldError> {
        let (rows, cols) = mask.dim();
        let mut labels = Array2::<i32>::zeros((rows, cols));
        let mut next = 0;
        let mut queue = VecDeque::new();

        for r in 0..rows {
            for c in 0..cols {
                if !mask[[r, c]] || labels[[r, c]] != 0 {
                    continue;
                }
                next += 1;
                labels[[r, c]] = next;
                queue.push_back((r, c));
                while let Some((y, x)) = queue.pop_front() {
                    let neighbours = [
                        (y.wrapping_sub(1), x),
                        (y + 1, x),
                        (y, x.wrapping_sub(1)),
                        (y, x + 1),
                    ];
                    for (ny, nx) in neighbours {
                        if ny < rows && nx < cols && mask[[ny, nx]] && labels[[ny, nx]] == 0 {
                            labels[[ny, nx]] = next;
                            queue.push_back((ny, nx));
                        }
                    }
                }
            }
        }
        Ok((labels, next as usize))
    }
}
