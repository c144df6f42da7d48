//! Scalar 2-D feature fields and their moment-derived descriptors.
//!
//! A [`FeatureField`] wraps a boolean mask, an integer label map or a float
//! intensity grid and derives area, centroid and orientation from its
//! spatial moments (see [`moments`]).
//!
//! ## Mean cache
//! `xmean()`/`ymean()` are computed on first access and memoized for the
//! lifetime of the field. The cache is a `OnceLock`, so concurrent first
//! accesses from several threads are safe: one computation wins and every
//! reader sees that value afterwards. Fields are immutable once built.

pub mod moments;

use std::f64::consts::FRAC_PI_2;
use std::sync::OnceLock;

use nalgebra::Matrix2;
use ndarray::Array2;

use crate::array::{into_2d, RawArray};
use crate::FieldError;

/// Cell storage of a feature field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldData {
    /// Binary feature mask; set cells weigh 1.
    Mask(Array2<bool>),
    /// Integer label map; each cell weighs its label value.
    Labels(Array2<i32>),
    /// Intensity grid; each cell weighs its value.
    Intensity(Array2<f64>),
}

impl FieldData {
    /// `(rows, cols)` of the underlying array.
    pub fn dim(&self) -> (usize, usize) {
        match self {
            Self::Mask(a) => a.dim(),
            Self::Labels(a) => a.dim(),
            Self::Intensity(a) => a.dim(),
        }
    }
}

impl From<Array2<bool>> for FieldData {
    fn from(a: Array2<bool>) -> Self {
        Self::Mask(a)
    }
}

impl From<Array2<i32>> for FieldData {
    fn from(a: Array2<i32>) -> Self {
        Self::Labels(a)
    }
}

impl From<Array2<f64>> for FieldData {
    fn from(a: Array2<f64>) -> Self {
        Self::Intensity(a)
    }
}

impl TryFrom<RawArray> for FieldData {
    type Error = FieldError;

    fn try_from(raw: RawArray) -> Result<Self, FieldError> {
        Ok(match raw {
            RawArray::Bool(a) => Self::Mask(into_2d(a)?),
            RawArray::I32(a) => Self::Labels(into_2d(a)?),
            RawArray::I64(a) => Self::Intensity(into_2d(a)?.mapv(|v| v as f64)),
            RawArray::U8(a) => Self::Intensity(into_2d(a)?.mapv(f64::from)),
            RawArray::F32(a) => Self::Intensity(into_2d(a)?.mapv(f64::from)),
            RawArray::F64(a) => Self::Intensity(into_2d(a)?),
        })
    }
}

/// Second-order central moments of one field.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SecondOrderMoments {
    pub mu20: f64,
    pub mu02: f64,
    pub mu11: f64,
}

/// A 2-D scalar field with lazily cached first-order means.
#[derive(Debug, Clone, Default)]
pub struct FeatureField {
    data: Option<FieldData>,
    xmean: OnceLock<f64>,
    ymean: OnceLock<f64>,
}

impl FeatureField {
    /// Field over a mask, label map or intensity grid.
    pub fn new(data: impl Into<FieldData>) -> Self {
        Self {
            data: Some(data.into()),
            xmean: OnceLock::new(),
            ymean: OnceLock::new(),
        }
    }

    /// A field without data. Its dimension is `(0, 0)` and its moments sum
    /// over an empty grid.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Underlying cells, `None` for [`FeatureField::empty`].
    pub fn data(&self) -> Option<&FieldData> {
        self.data.as_ref()
    }

    /// `(rows, cols)`, or `(0, 0)` without data.
    pub fn dim(&self) -> (usize, usize) {
        self.data.as_ref().map_or((0, 0), FieldData::dim)
    }

    /// Whether the field holds a boolean mask.
    pub fn is_binary(&self) -> bool {
        matches!(self.data, Some(FieldData::Mask(_)))
    }

    /// Raw spatial moment `M_ij`.
    pub fn spatial_moment(&self, i: u32, j: u32) -> f64 {
        moments::raw_moment(self.data.as_ref(), i, j)
    }

    /// Central spatial moment `μ_ij`, shifted by the cached means.
    pub fn central_moment(&self, i: u32, j: u32) -> f64 {
        let xmean = self.xmean();
        let ymean = self.ymean();
        moments::central_moment(self.data.as_ref(), i, j, xmean, ymean)
    }

    /// Area `M00`: number of set cells for masks, total weight otherwise.
    pub fn area(&self) -> f64 {
        self.spatial_moment(0, 0)
    }

    /// Row mean `M10/M00`. NaN for a zero-area field.
    pub fn xmean(&self) -> f64 {
        *self
            .xmean
            .get_or_init(|| moments::mean(self.data.as_ref(), 0))
    }

    /// Column mean `M01/M00`. NaN for a zero-area field.
    pub fn ymean(&self) -> f64 {
        *self
            .ymean
            .get_or_init(|| moments::mean(self.data.as_ref(), 1))
    }

    /// `(xmean, ymean)`.
    pub fn centroid(&self) -> (f64, f64) {
        (self.xmean(), self.ymean())
    }

    /// `μ20`, `μ02` and `μ11` around the cached centroid.
    pub fn second_order_moments(&self) -> SecondOrderMoments {
        SecondOrderMoments {
            mu20: self.central_moment(2, 0),
            mu02: self.central_moment(0, 2),
            mu11: self.central_moment(1, 1),
        }
    }

    /// Symmetric second-moment tensor `[[μ20, μ11], [μ11, μ02]]`.
    pub fn moment_tensor(&self) -> Matrix2<f64> {
        let m = self.second_order_moments();
        Matrix2::new(m.mu20, m.mu11, m.mu11, m.mu02)
    }

    /// Orientation of the principal axis in radians,
    /// `0.5 * atan(2μ11 / (μ20 - μ02))`.
    ///
    /// Uses the single-argument arctangent, so the result lies in
    /// `(-π/4, π/4]` and the quadrant is not recovered. When `μ20 == μ02`
    /// the result is `π/4` whatever the sign of `μ11`.
    pub fn orientation_radians(&self) -> f64 {
        let m = self.second_order_moments();
        let denom = m.mu20 - m.mu02;
        if denom == 0.0 {
            return 0.5 * FRAC_PI_2;
        }
        0.5 * ((2.0 * m.mu11) / denom).atan()
    }

    /// [`Self::orientation_radians`] in degrees.
    pub fn orientation_degrees(&self) -> f64 {
        self.orientation_radians().to_degrees()
    }

    /// Quadrant-aware principal axis angle, `0.5 * atan2(2μ11, μ20 - μ02)`,
    /// in `(-π/2, π/2]`.
    pub fn principal_angle_radians(&self) -> f64 {
        let m = self.second_order_moments();
        0.5 * (2.0 * m.mu11).atan2(m.mu20 - m.mu02)
    }
}

impl TryFrom<RawArray> for FeatureField {
    type Error = FieldError;

    fn try_from(raw: RawArray) -> Result<Self, FieldError> {
        Ok(Self::new(FieldData::try_from(raw)?))
    }
}

impl std::fmt::Display for FeatureField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (rows, cols) = self.dim();
        write!(f, "FeatureField ({} {})", rows, cols)
    }
}
