//! Segmentation and measurement settings.
//!
//! Both structs deserialize from JSON with every field optional, e.g.
//!
//! ```json
//! { "threshold": 80.0, "connectivity": "eight" }
//! ```

use std::path::Path;

use crate::labelmap::labeler::Connectivity;
use crate::FieldError;

const DEFAULT_THRESHOLD: f64 = 50.0;
const DEFAULT_DIFF_THRESHOLD: f64 = 10.0;

/// Thresholds and neighbourhood used to turn images into label maps.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SegmentationConfig {
    /// Single-image cut-off: pixels strictly above it are foreground.
    pub threshold: f64,
    /// Image-pair cut-off: pixels whose absolute difference reaches it are
    /// foreground.
    pub diff_threshold: f64,
    /// Neighbourhood used by the component labeler.
    pub connectivity: Connectivity,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            diff_threshold: DEFAULT_DIFF_THRESHOLD,
            connectivity: Connectivity::Four,
        }
    }
}

impl SegmentationConfig {
    /// Load from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, FieldError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self, FieldError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        if !self.threshold.is_finite() || !self.diff_threshold.is_finite() {
            return Err(FieldError::Config(format!(
                "thresholds must be finite (threshold={}, diff_threshold={})",
                self.threshold, self.diff_threshold
            )));
        }
        Ok(())
    }
}

/// Which features [`measure_features`](crate::measure_features) reports.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeasureOptions {
    /// Report at most this many features (largest first).
    pub max_features: Option<usize>,
    /// Skip features with fewer pixels.
    pub min_pixel_count: usize,
    /// Also measure the background label 0.
    pub include_background: bool,
}

impl Default for MeasureOptions {
    fn default() -> Self {
        Self {
            max_features: None,
            min_pixel_count: 1,
            include_background: false,
        }
    }
}
