//! Crate error type.
//!
//! Only structural problems are reported here. Numeric degeneracies (zero
//! area, zero eigenvalues) are not errors: they flow through return values as
//! NaN or infinity.

/// Errors raised by field ingestion, label-map building and decoding.
#[derive(Debug)]
pub enum FieldError {
    /// Array rank does not match what the operation needs.
    Shape {
        /// Required number of dimensions.
        expected: usize,
        /// Number of dimensions of the provided array.
        actual: usize,
    },
    /// Foreground and background images differ in shape.
    ShapeMismatch {
        /// Shape of the foreground array.
        foreground: Vec<usize>,
        /// Shape of the background array.
        background: Vec<usize>,
    },
    /// A multi-channel image has a zero-length channel axis.
    NoChannels,
    /// An axis is too long for the image backend (`u32` extents).
    TooLarge {
        rows: usize,
        cols: usize,
    },
    /// Array element type is not accepted by the operation.
    TypeMismatch {
        /// Name of the rejected element type.
        element: &'static str,
    },
    /// Operation exists in the API but has no implementation.
    NotImplemented(&'static str),
    /// Image bytes could not be decoded.
    Decode(image::ImageError),
    /// Reading a source failed.
    Io(std::io::Error),
    /// Configuration could not be parsed or is invalid.
    Config(String),
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shape { expected, actual } => {
                write!(f, "expected a {}-D array, got {}-D", expected, actual)
            }
            Self::ShapeMismatch {
                foreground,
                background,
            } => write!(
                f,
                "foreground shape {:?} does not match background shape {:?}",
                foreground, background
            ),
            Self::NoChannels => write!(f, "image has no channels"),
            Self::TooLarge { rows, cols } => write!(
                f,
                "{}x{} grid exceeds the u32 extent of the image backend",
                rows, cols
            ),
            Self::TypeMismatch { element } => {
                write!(f, "unsupported element type for label map: {}", element)
            }
            Self::NotImplemented(what) => write!(f, "{} is not implemented", what),
            Self::Decode(e) => write!(f, "unable to decode image: {}", e),
            Self::Io(e) => write!(f, "i/o error: {}", e),
            Self::Config(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for FieldError {
    fn from(e: image::ImageError) -> Self {
        Self::Decode(e)
    }
}

impl From<std::io::Error> for FieldError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for FieldError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
