//! Per-feature measurement of a label map.

use ndarray::Array2;

use crate::config::MeasureOptions;
use crate::ellipse::{fit_from_field, EllipseFeature};
use crate::labelmap::{feature_mask, features_by_size, LabelSource};
use crate::FeatureField;

/// Moment descriptors of one labeled feature.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeatureMeasurement {
    pub label: i32,
    pub pixel_count: usize,
    /// `M00` of the feature mask.
    pub area: f64,
    /// `(row, col)` centroid.
    pub centroid: [f64; 2],
    pub orientation_deg: f64,
    pub ellipse: EllipseFeature,
}

impl FeatureMeasurement {
    /// Measure one feature field recorded under `label`.
    pub fn from_field(label: i32, pixel_count: usize, field: &FeatureField) -> Self {
        let (cx, cy) = field.centroid();
        Self {
            label,
            pixel_count,
            area: field.area(),
            centroid: [cx, cy],
            orientation_deg: field.orientation_degrees(),
            ellipse: fit_from_field(field),
        }
    }
}

/// Measure features of a label map, largest first.
pub fn measure_features(source: &LabelSource, options: &MeasureOptions) -> Vec<FeatureMeasurement> {
    let limit = options.max_features.unwrap_or(usize::MAX);
    let measured: Vec<FeatureMeasurement> = features_by_size(source)
        .filter(|&(label, _)| options.include_background || label != 0)
        .filter(|&(_, count)| count >= options.min_pixel_count)
        .take(limit)
        .map(|(label, count)| {
            let field = FeatureField::new(select_feature(source, label));
            let m = FeatureMeasurement::from_field(label, count, &field);
            tracing::debug!(
                label,
                pixels = count,
                "centroid=({:.2}, {:.2}) orientation={:.2}deg",
                m.centroid[0],
                m.centroid[1],
                m.orientation_deg
            );
            m
        })
        .collect();
    tracing::debug!("{} features measured", measured.len());
    measured
}

/// Cells counted under `label` by [`features_by_size`].
///
/// A mask source ranks its unset cells as label 0, so that label selects the
/// complement of the mask.
fn select_feature(source: &LabelSource, label: i32) -> Array2<bool> {
    match source {
        LabelSource::Mask(a) if label == 0 => a.mapv(|v| !v),
        _ => feature_mask(source, label),
    }
}
