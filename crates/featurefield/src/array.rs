//! Dynamically typed arrays accepted at the ingestion boundary.
//!
//! Element type is inspected exactly once, when a [`RawArray`] is converted
//! into a [`FeatureField`](crate::FeatureField) or a
//! [`LabelSource`](crate::LabelSource). Everything downstream works on
//! statically typed `ndarray` arrays.

use ndarray::{Array2, ArrayD, Ix2};

use crate::FieldError;

/// An array of any supported element type and rank.
#[derive(Debug, Clone, PartialEq)]
pub enum RawArray {
    Bool(ArrayD<bool>),
    I32(ArrayD<i32>),
    I64(ArrayD<i64>),
    U8(ArrayD<u8>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

impl RawArray {
    /// Extent of every axis.
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Bool(a) => a.shape(),
            Self::I32(a) => a.shape(),
            Self::I64(a) => a.shape(),
            Self::U8(a) => a.shape(),
            Self::F32(a) => a.shape(),
            Self::F64(a) => a.shape(),
        }
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Name of the element type, used in error messages.
    pub fn element_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U8(_) => "u8",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
        }
    }
}

macro_rules! impl_from_array {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<ArrayD<$ty>> for RawArray {
                fn from(a: ArrayD<$ty>) -> Self {
                    Self::$variant(a)
                }
            }

            impl From<Array2<$ty>> for RawArray {
                fn from(a: Array2<$ty>) -> Self {
                    Self::$variant(a.into_dyn())
                }
            }
        )*
    };
}

impl_from_array!(
    Bool => bool,
    I32 => i32,
    I64 => i64,
    U8 => u8,
    F32 => f32,
    F64 => f64,
);

/// Reinterpret a dynamic array as 2-D, failing with [`FieldError::Shape`]
/// for any other rank.
pub(crate) fn into_2d<T>(a: ArrayD<T>) -> Result<Array2<T>, FieldError> {
    let actual = a.ndim();
    a.into_dimensionality::<Ix2>()
        .map_err(|_| FieldError::Shape {
            expected: 2,
            actual,
        })
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, ArrayD, IxDyn};

    use super::{into_2d, RawArray};
    use crate::FieldError;

    #[test]
    fn from_impls_pick_the_matching_variant() {
        let raw: RawArray = Array2::<u8>::zeros((3, 4)).into();
        assert_eq!(raw.element_name(), "u8");
        assert_eq!(raw.shape(), &[3, 4]);

        let raw: RawArray = ArrayD::<f32>::zeros(IxDyn(&[2, 2, 3])).into();
        assert_eq!(raw.ndim(), 3);
    }

    #[test]
    fn into_2d_rejects_other_ranks() {
        let a = ArrayD::<i32>::zeros(IxDyn(&[2, 2, 2]));
        match into_2d(a) {
            Err(FieldError::Shape { expected, actual }) => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 3);
            }
            other => panic!("expected shape error, got {:?}", other),
        }

        let ok = into_2d(ArrayD::<i32>::zeros(IxDyn(&[5, 7]))).expect("2-D input");
        assert_eq!(ok.dim(), (5, 7));
    }
}
