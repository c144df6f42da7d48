//! Best-fit ellipse of a feature from its second-order central moments.
//!
//! The moment tensor `[[μ20, μ11], [μ11, μ02]]` has eigenvalues
//!
//! ```text
//! λ± = ½ (μ20 + μ02 ± √(4μ11² + (μ20 − μ02)²))
//! ```
//!
//! and the ellipse with the same second moments has semi-axes
//!
//! ```text
//! a = (4/π)^¼ (λ+³ / λ−)^⅛        b = (4/π)^¼ (λ−³ / λ+)^⅛
//! ```
//!
//! A non-positive eigenvalue (empty, single-pixel or line-like features)
//! yields NaN or infinite axes; they are returned unchanged.

use std::f64::consts::PI;

use crate::FeatureField;

/// Semi-axis lengths of a best-fit ellipse. Both are `None` until computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EllipseFeature {
    pub semi_major_axis: Option<f64>,
    pub semi_minor_axis: Option<f64>,
}

impl EllipseFeature {
    /// Whether both semi-axes have been filled in.
    pub fn is_computed(&self) -> bool {
        self.semi_major_axis.is_some() && self.semi_minor_axis.is_some()
    }

    /// Ratio `a / b`, if both axes are known.
    pub fn aspect_ratio(&self) -> Option<f64> {
        Some(self.semi_major_axis? / self.semi_minor_axis?)
    }
}

/// Eigenvalues `(λ+, λ−)` of the second-moment tensor.
pub fn moment_eigenvalues(mu20: f64, mu02: f64, mu11: f64) -> (f64, f64) {
    let root = (4.0 * mu11 * mu11 + (mu20 - mu02).powi(2)).sqrt();
    let eig_max = 0.5 * (mu20 + mu02 + root);
    let eig_min = 0.5 * (mu20 + mu02 - root);
    (eig_max, eig_min)
}

/// Semi-axes of the ellipse with second moments `μ20`, `μ02`, `μ11`.
pub fn fit_from_moments(mu20: f64, mu02: f64, mu11: f64) -> EllipseFeature {
    let (eig_max, eig_min) = moment_eigenvalues(mu20, mu02, mu11);
    let scale = (4.0 / PI).powf(0.25);
    EllipseFeature {
        semi_major_axis: Some(scale * (eig_max.powi(3) / eig_min).powf(0.125)),
        semi_minor_axis: Some(scale * (eig_min.powi(3) / eig_max).powf(0.125)),
    }
}

/// [`fit_from_moments`] on the central moments of `field`.
pub fn fit_from_field(field: &FeatureField) -> EllipseFeature {
    let m = field.second_order_moments();
    fit_from_moments(m.mu20, m.mu02, m.mu11)
}

/// Geometry of a fitted feature for serialization (centroid + ellipse).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EllipseParams {
    /// Centroid `(row, col)`.
    pub center: [f64; 2],
    /// Semi-axes `[a, b]` in pixels.
    pub semi_axes: [f64; 2],
    /// Angle of the major axis from the row axis, in radians, in
    /// `(-π/2, π/2]`.
    pub angle: f64,
}

impl EllipseParams {
    /// Centroid, semi-axes and major-axis angle of `field`.
    pub fn from_field(field: &FeatureField) -> Self {
        let (cx, cy) = field.centroid();
        let fit = fit_from_field(field);
        Self {
            center: [cx, cy],
            semi_axes: [
                fit.semi_major_axis.unwrap_or(f64::NAN),
                fit.semi_minor_axis.unwrap_or(f64::NAN),
            ],
            angle: field.principal_angle_radians(),
        }
    }

    /// Finite centre and angle with positive finite semi-axes.
    pub fn is_valid(&self) -> bool {
        self.semi_axes.iter().all(|v| v.is_finite() && *v > 0.0)
            && self.center.iter().all(|v| v.is_finite())
            && self.angle.is_finite()
    }
}
