//! Label maps: building them from images and picking features out of them.
//!
//! A label map assigns every pixel a connected-component id, with 0 for
//! background. Maps come either from the builders in [`build`] or from
//! callers, in which case they enter through [`LabelSource`].

pub mod build;
pub mod labeler;

use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView2};

use crate::array::{into_2d, RawArray};
use crate::FieldError;

/// A labeled map as produced by the builders.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMap {
    /// Component id per pixel; 0 is background.
    pub labels: Array2<i32>,
    /// Number of foreground components.
    pub count: usize,
}

impl LabelMap {
    /// `(rows, cols)` of the label array.
    pub fn dim(&self) -> (usize, usize) {
        self.labels.dim()
    }

    /// Borrowed view of the labels.
    pub fn view(&self) -> ArrayView2<'_, i32> {
        self.labels.view()
    }

    /// Cells equal to `label`.
    pub fn feature_mask(&self, label: i32) -> Array2<bool> {
        self.labels.mapv(|v| v == label)
    }

    /// Labels with their pixel counts, largest first.
    pub fn features_by_size(&self) -> FeaturesBySize {
        rank_by_size(self.labels.iter().copied())
    }
}

/// Label data accepted by [`feature_mask`] and [`features_by_size`].
#[derive(Debug, Clone, PartialEq)]
pub enum LabelSource {
    /// A single feature given as a mask.
    Mask(Array2<bool>),
    /// A signed 32-bit label map.
    Labels(Array2<i32>),
}

impl LabelSource {
    /// `(rows, cols)` of the source array.
    pub fn dim(&self) -> (usize, usize) {
        match self {
            Self::Mask(a) => a.dim(),
            Self::Labels(a) => a.dim(),
        }
    }
}

impl From<LabelMap> for LabelSource {
    fn from(map: LabelMap) -> Self {
        Self::Labels(map.labels)
    }
}

impl From<Array2<i32>> for LabelSource {
    fn from(a: Array2<i32>) -> Self {
        Self::Labels(a)
    }
}

impl From<Array2<bool>> for LabelSource {
    fn from(a: Array2<bool>) -> Self {
        Self::Mask(a)
    }
}

impl TryFrom<RawArray> for LabelSource {
    type Error = FieldError;

    /// Only `bool` and `i32` arrays are label sources; every other element
    /// type is a [`FieldError::TypeMismatch`].
    fn try_from(raw: RawArray) -> Result<Self, FieldError> {
        match raw {
            RawArray::Bool(a) => Ok(Self::Mask(into_2d(a)?)),
            RawArray::I32(a) => Ok(Self::Labels(into_2d(a)?)),
            other => Err(FieldError::TypeMismatch {
                element: other.element_name(),
            }),
        }
    }
}

/// Boolean mask of the cells belonging to `label`.
///
/// A [`LabelSource::Mask`] already is a single feature and is returned as
/// is, whatever `label` says.
pub fn feature_mask(source: &LabelSource, label: i32) -> Array2<bool> {
    match source {
        LabelSource::Labels(a) => a.mapv(|v| v == label),
        LabelSource::Mask(a) => a.clone(),
    }
}

/// Distinct labels with their pixel counts, largest first.
///
/// Equal counts keep ascending label order. For a mask, unset cells count
/// as label 0 and set cells as label 1.
pub fn features_by_size(source: &LabelSource) -> FeaturesBySize {
    match source {
        LabelSource::Labels(a) => rank_by_size(a.iter().copied()),
        LabelSource::Mask(a) => rank_by_size(a.iter().map(|&v| i32::from(v))),
    }
}

/// Iterator over `(label, pixel_count)` pairs in descending count order.
///
/// Produced once per call; it cannot be rewound.
#[derive(Debug, Clone)]
pub struct FeaturesBySize {
    inner: std::vec::IntoIter<(i32, usize)>,
}

impl Iterator for FeaturesBySize {
    type Item = (i32, usize);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for FeaturesBySize {}

fn rank_by_size(labels: impl Iterator<Item = i32>) -> FeaturesBySize {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for l in labels {
        *counts.entry(l).or_default() += 1;
    }
    let mut ranked: Vec<(i32, usize)> = counts.into_iter().collect();
    // Stable sort keeps ascending label order within equal counts.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    FeaturesBySize {
        inner: ranked.into_iter(),
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array2, ArrayD, IxDyn};

    use super::{feature_mask, features_by_size, LabelMap, LabelSource};
    use crate::array::RawArray;
    use crate::FieldError;

    fn two_features() -> Array2<i32> {
        let mut a = Array2::<i32>::zeros((10, 10));
        a.slice_mut(ndarray::s![2..4, 2..4]).fill(1);
        a.slice_mut(ndarray::s![6..8, 2..5]).fill(2);
        a
    }

    #[test]
    fn features_ranked_by_size() {
        let source = LabelSource::from(two_features());
        let ranked: Vec<_> = features_by_size(&source).collect();
        assert_eq!(ranked, vec![(0, 90), (2, 6), (1, 4)]);
    }

    #[test]
    fn ties_keep_ascending_label_order() {
        let source = LabelSource::from(array![[3, 3, 1], [1, 2, 2]]);
        let ranked: Vec<_> = features_by_size(&source).collect();
        assert_eq!(ranked, vec![(1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn ranking_is_exhausted_after_one_pass() {
        let map = LabelMap {
            labels: two_features(),
            count: 2,
        };
        let mut it = map.features_by_size();
        assert_eq!(it.len(), 3);
        assert_eq!(it.by_ref().count(), 3);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn mask_ranks_as_background_and_one_feature() {
        let source = LabelSource::from(array![[true, false, false], [false, false, true]]);
        let ranked: Vec<_> = features_by_size(&source).collect();
        assert_eq!(ranked, vec![(0, 4), (1, 2)]);
    }

    #[test]
    fn feature_mask_selects_one_label() {
        let source = LabelSource::from(two_features());
        let mask = feature_mask(&source, 2);
        assert_eq!(mask.iter().filter(|&&v| v).count(), 6);
        assert!(mask[[6, 4]]);
        assert!(!mask[[2, 2]]);

        let absent = feature_mask(&source, 9);
        assert!(absent.iter().all(|&v| !v));
    }

    #[test]
    fn mask_source_is_its_own_feature() {
        let m = array![[true, false], [true, true]];
        assert_eq!(feature_mask(&LabelSource::Mask(m.clone()), 7), m);
    }

    #[test]
    fn non_label_element_types_are_rejected() {
        let raw: RawArray = Array2::<f64>::zeros((3, 3)).into();
        match LabelSource::try_from(raw) {
            Err(FieldError::TypeMismatch { element }) => assert_eq!(element, "f64"),
            other => panic!("expected type mismatch, got {:?}", other),
        }

        let raw: RawArray = Array2::<i64>::zeros((3, 3)).into();
        assert!(matches!(
            LabelSource::try_from(raw),
            Err(FieldError::TypeMismatch { element: "i64" })
        ));

        let raw: RawArray = ArrayD::<i32>::zeros(IxDyn(&[3])).into();
        assert!(matches!(
            LabelSource::try_from(raw),
            Err(FieldError::Shape { expected: 2, actual: 1 })
        ));

        let raw: RawArray = two_features().into();
        let source = LabelSource::try_from(raw).expect("i32 map");
        assert_eq!(source.dim(), (10, 10));
    }
}
