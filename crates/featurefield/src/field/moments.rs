//! Raw and central spatial moments of a weighted 2-D grid.
//!
//! `x` is the row index and `y` the column index, both zero-based. Every
//! cell of the grid contributes; the cell value is the weight (1 or 0 for
//! masks).
//!
//! Nothing here guards against an empty or zero-weight grid: dividing by a
//! zero area yields NaN or infinity and that value is returned as is.

use ndarray::Array2;

use super::FieldData;

/// Raw moment `M_ij = Σ x^i y^j w(x, y)`.
///
/// `None` data is treated as an empty grid and sums to zero.
pub fn raw_moment(data: Option<&FieldData>, i: u32, j: u32) -> f64 {
    match (i, j) {
        (0, 0) => weighted_sum(data, |_, _| 1.0),
        (0, j) => weighted_sum(data, |_, y| y.powi(j as i32)),
        (i, 0) => weighted_sum(data, |x, _| x.powi(i as i32)),
        (i, j) => weighted_sum(data, |x, y| x.powi(i as i32) * y.powi(j as i32)),
    }
}

/// Central moment `μ_ij = Σ (x - x̄)^i (y - ȳ)^j w(x, y)` around the given
/// means.
pub fn central_moment(data: Option<&FieldData>, i: u32, j: u32, xmean: f64, ymean: f64) -> f64 {
    weighted_sum(data, |x, y| {
        (x - xmean).powi(i as i32) * (y - ymean).powi(j as i32)
    })
}

/// First-order mean along `axis` (0 = rows, 1 = columns): `M10/M00` or
/// `M01/M00`.
pub fn mean(data: Option<&FieldData>, axis: usize) -> f64 {
    debug_assert!(axis < 2, "axis must be 0 or 1");
    let m00 = raw_moment(data, 0, 0);
    if axis == 0 {
        raw_moment(data, 1, 0) / m00
    } else {
        raw_moment(data, 0, 1) / m00
    }
}

fn weighted_sum<F>(data: Option<&FieldData>, coord: F) -> f64
where
    F: Fn(f64, f64) -> f64,
{
    match data {
        None => 0.0,
        Some(FieldData::Mask(a)) => sum_grid(a, |&v| if v { 1.0 } else { 0.0 }, coord),
        Some(FieldData::Labels(a)) => sum_grid(a, |&v| f64::from(v), coord),
        Some(FieldData::Intensity(a)) => sum_grid(a, |&v| v, coord),
    }
}

fn sum_grid<T, W, F>(a: &Array2<T>, weight: W, coord: F) -> f64
where
    W: Fn(&T) -> f64,
    F: Fn(f64, f64) -> f64,
{
    let mut acc = 0.0f64;
    for ((x, y), v) in a.indexed_iter() {
        acc += coord(x as f64, y as f64) * weight(v);
    }
    acc
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};

    use super::{central_moment, mean, raw_moment};
    use crate::field::FieldData;

    fn brute_force(a: &Array2<f64>, i: i32, j: i32) -> f64 {
        let mut s = 0.0;
        for ((x, y), v) in a.indexed_iter() {
            s += (x as f64).powi(i) * (y as f64).powi(j) * v;
        }
        s
    }

    #[test]
    fn zeroth_moment_is_the_weight_sum() {
        let data = FieldData::Intensity(array![[1.0, 2.0], [3.5, 0.5]]);
        assert_eq!(raw_moment(Some(&data), 0, 0), 7.0);

        let mask = FieldData::Mask(array![[true, false, true], [false, true, true]]);
        assert_eq!(raw_moment(Some(&mask), 0, 0), 4.0);
    }

    #[test]
    fn single_axis_shortcuts_match_general_formula() {
        let a = array![[0.0, 1.0, 2.0], [3.0, 4.0, 5.0], [6.0, 7.0, 8.0]];
        let data = FieldData::Intensity(a.clone());
        for (i, j) in [(0, 0), (1, 0), (0, 1), (2, 0), (0, 3), (1, 1), (2, 1)] {
            assert_eq!(
                raw_moment(Some(&data), i, j),
                brute_force(&a, i as i32, j as i32),
                "moment ({}, {})",
                i,
                j
            );
        }
    }

    #[test]
    fn x_runs_along_rows() {
        // Single pixel at row 3, column 1.
        let mut a = Array2::<bool>::default((5, 5));
        a[[3, 1]] = true;
        let data = FieldData::Mask(a);
        assert_eq!(raw_moment(Some(&data), 1, 0), 3.0);
        assert_eq!(raw_moment(Some(&data), 0, 1), 1.0);
        assert_eq!(mean(Some(&data), 0), 3.0);
        assert_eq!(mean(Some(&data), 1), 1.0);
    }

    #[test]
    fn label_values_act_as_weights() {
        let data = FieldData::Labels(array![[0, 2], [0, 0]]);
        assert_eq!(raw_moment(Some(&data), 0, 0), 2.0);
        assert_eq!(raw_moment(Some(&data), 0, 1), 2.0);
    }

    #[test]
    fn central_first_order_moments_vanish() {
        let data = FieldData::Intensity(array![[1.0, 4.0, 0.0], [2.0, 0.0, 3.0]]);
        let xm = mean(Some(&data), 0);
        let ym = mean(Some(&data), 1);
        assert_abs_diff_eq!(central_moment(Some(&data), 1, 0, xm, ym), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(central_moment(Some(&data), 0, 1, xm, ym), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            central_moment(Some(&data), 0, 0, xm, ym),
            raw_moment(Some(&data), 0, 0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn empty_grid_degenerates_to_nan_means() {
        assert_eq!(raw_moment(None, 0, 0), 0.0);
        assert!(mean(None, 0).is_nan());

        let data = FieldData::Mask(Array2::default((4, 4)));
        assert_eq!(raw_moment(Some(&data), 0, 0), 0.0);
        assert!(mean(Some(&data), 1).is_nan());
    }
}
