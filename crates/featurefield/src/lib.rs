//! featurefield: geometric descriptors of features in 2-D scalar fields.
//!
//! A feature is a region of a boolean mask, an integer label map or an
//! intensity grid. Its descriptors come from image moments:
//!
//! 1. **Label** – threshold a single image, or difference a foreground and a
//!    background image, then label the connected regions
//!    ([`LabelMapBuilder`], [`label_single_image`], [`label_image_diff`]).
//! 2. **Select** – pick one feature out of a label map ([`feature_mask`]),
//!    or rank all of them by pixel count ([`features_by_size`]).
//! 3. **Measure** – raw and central moments, area, centroid and orientation
//!    of a [`FeatureField`].
//! 4. **Fit** – semi-axes of the ellipse with the same second moments
//!    ([`fit_from_field`]).
//!
//! Coordinates follow array indexing: `x` is the row, `y` the column.
//!
//! Degenerate input is not an error. A zero-area feature has NaN means, and
//! a feature whose moment tensor has a zero eigenvalue has NaN or infinite
//! semi-axes. Callers that need finite values check them.

mod array;
mod config;
mod decode;
mod ellipse;
mod error;
mod field;
mod labelmap;
mod measure;

#[cfg(test)]
mod test_utils;

pub use array::RawArray;
pub use config::{MeasureOptions, SegmentationConfig};
pub use decode::{
    dynamic_image_to_array, read_file_source, ArrayDecoder, BufferDecoder, Decoder, FileDecoder,
};
pub use ellipse::{fit_from_field, fit_from_moments, moment_eigenvalues, EllipseFeature, EllipseParams};
pub use error::FieldError;
pub use field::moments::{central_moment, mean, raw_moment};
pub use field::{FeatureField, FieldData, SecondOrderMoments};
pub use labelmap::build::{
    label_image_diff, label_single_image, to_single_channel, LabelMapBuilder, Preprocess,
};
pub use labelmap::labeler::{ComponentLabeler, Connectivity, ImageprocLabeler};
pub use labelmap::{feature_mask, features_by_size, FeaturesBySize, LabelMap, LabelSource};
pub use measure::{measure_features, FeatureMeasurement};
