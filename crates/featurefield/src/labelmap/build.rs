//! Label-map builders: threshold or difference, then label.
//!
//! 1. **Collapse** – 3-D `(rows, cols, channels)` images are reduced to one
//!    channel by the per-pixel channel mean.
//! 2. **Mask** – a single image keeps pixels strictly above the threshold;
//!    an image pair keeps pixels whose absolute difference is at or above it.
//! 3. **Label** – the mask is handed to a [`ComponentLabeler`].

use std::path::Path;

use ndarray::{Array2, ArrayD, Axis, Zip};

use super::labeler::{ComponentLabeler, ImageprocLabeler};
use super::LabelMap;
use crate::array::into_2d;
use crate::config::SegmentationConfig;
use crate::decode::Decoder;
use crate::{FeatureField, FieldError};

/// Optional intensity transform applied after decoding and before masking.
pub type Preprocess<'a> = &'a dyn Fn(Array2<f64>) -> Array2<f64>;

/// Reduce an image to a single channel.
///
/// 2-D input is returned unchanged; 3-D input is averaged over its last
/// axis. Any other rank is a shape error.
pub fn to_single_channel(image: ArrayD<f64>) -> Result<Array2<f64>, FieldError> {
    match image.ndim() {
        2 => into_2d(image),
        3 => {
            let collapsed = image.mean_axis(Axis(2)).ok_or(FieldError::NoChannels)?;
            into_2d(collapsed)
        }
        actual => Err(FieldError::Shape {
            expected: 2,
            actual,
        }),
    }
}

/// Decode one image, optionally preprocess it, threshold it and label the
/// pixels above `threshold`.
///
/// Returns the (preprocessed) intensity array alongside the label map.
pub fn label_single_image<D, L>(
    decoder: &D,
    threshold: f64,
    preprocess: Option<Preprocess<'_>>,
    labeler: &L,
) -> Result<(Array2<f64>, LabelMap), FieldError>
where
    D: Decoder + ?Sized,
    L: ComponentLabeler + ?Sized,
{
    let mut intensity = to_single_channel(decoder.decode()?)?;
    if let Some(f) = preprocess {
        intensity = f(intensity);
    }

    let mask = intensity.mapv(|v| v > threshold);
    let map = label_mask(&mask, labeler)?;
    tracing::debug!(
        threshold,
        components = map.count,
        "labeled single image {}x{}",
        mask.nrows(),
        mask.ncols()
    );
    Ok((intensity, map))
}

/// Label the pixels where foreground and background differ by at least
/// `threshold`.
pub fn label_image_diff<L>(
    foreground: ArrayD<f64>,
    background: ArrayD<f64>,
    threshold: f64,
    labeler: &L,
) -> Result<LabelMap, FieldError>
where
    L: ComponentLabeler + ?Sized,
{
    let fg = to_single_channel(foreground)?;
    let bg = to_single_channel(background)?;
    if fg.dim() != bg.dim() {
        return Err(FieldError::ShapeMismatch {
            foreground: fg.shape().to_vec(),
            background: bg.shape().to_vec(),
        });
    }

    let mut mask = Array2::<bool>::default(fg.dim());
    Zip::from(&mut mask)
        .and(&fg)
        .and(&bg)
        .for_each(|m, &f, &b| *m = (f - b).abs() >= threshold);

    let map = label_mask(&mask, labeler)?;
    tracing::debug!(
        threshold,
        components = map.count,
        "labeled image difference {}x{}",
        mask.nrows(),
        mask.ncols()
    );
    Ok(map)
}

fn label_mask<L: ComponentLabeler + ?Sized>(
    mask: &Array2<bool>,
    labeler: &L,
) -> Result<LabelMap, FieldError> {
    if !mask.is_empty() && mask.iter().all(|&v| v) {
        tracing::warn!("threshold keeps every pixel; the whole image is one feature");
    }
    let (labels, count) = labeler.label(mask.view())?;
    Ok(LabelMap { labels, count })
}

/// Label-map construction bound to a [`SegmentationConfig`] and a labeler.
#[derive(Debug, Clone)]
pub struct LabelMapBuilder<L = ImageprocLabeler> {
    config: SegmentationConfig,
    labeler: L,
}

impl LabelMapBuilder<ImageprocLabeler> {
    /// Builder using the `imageproc` labeler with the configured connectivity.
    pub fn new(config: SegmentationConfig) -> Self {
        let labeler = ImageprocLabeler::new(config.connectivity);
        Self { config, labeler }
    }
}

impl Default for LabelMapBuilder<ImageprocLabeler> {
    fn default() -> Self {
        Self::new(SegmentationConfig::default())
    }
}

impl<L: ComponentLabeler> LabelMapBuilder<L> {
    pub fn with_labeler(config: SegmentationConfig, labeler: L) -> Self {
        Self { config, labeler }
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// [`label_single_image`] with the configured threshold.
    pub fn from_single_image<D: Decoder + ?Sized>(
        &self,
        decoder: &D,
        preprocess: Option<Preprocess<'_>>,
    ) -> Result<(Array2<f64>, LabelMap), FieldError> {
        label_single_image(decoder, self.config.threshold, preprocess, &self.labeler)
    }

    /// [`label_image_diff`] with the configured difference threshold.
    pub fn from_image_diff(
        &self,
        foreground: ArrayD<f64>,
        background: ArrayD<f64>,
    ) -> Result<LabelMap, FieldError> {
        label_image_diff(foreground, background, self.config.diff_threshold, &self.labeler)
    }

    /// Build a feature field straight from a background/foreground file pair.
    ///
    /// Not implemented: always returns [`FieldError::NotImplemented`]. Decode
    /// both files and use [`Self::from_image_diff`] instead.
    pub fn from_image_files(
        &self,
        _background: &Path,
        _foreground: &Path,
    ) -> Result<FeatureField, FieldError> {
        Err(FieldError::NotImplemented(
            "feature field construction from image files",
        ))
    }
}
