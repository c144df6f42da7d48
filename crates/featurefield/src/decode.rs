//! Decoders turning encoded image bytes into numeric arrays.
//!
//! A decoder hands back a 2-D `(rows, cols)` array for single-channel
//! images or a 3-D `(rows, cols, channels)` array otherwise. Samples keep
//! their native range (0..=255 for 8-bit, 0..=65535 for 16-bit).

use std::io::Read;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageBuffer, Pixel};
use ndarray::{ArrayD, IxDyn};

use crate::FieldError;

/// Source of a decoded image array.
pub trait Decoder {
    fn decode(&self) -> Result<ArrayD<f64>, FieldError>;
}

/// Decoder over an in-memory encoded image (PNG, TIFF, ...).
#[derive(Debug, Clone)]
pub struct BufferDecoder {
    bytes: Vec<u8>,
}

impl BufferDecoder {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Read the whole file into a decoder.
    pub fn from_file(path: &Path) -> Result<Self, FieldError> {
        Ok(Self::new(read_file_source(path, None)?))
    }

    /// Encoded bytes as given.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode with a caller-supplied callback instead of the built-in image
    /// decoder.
    pub fn decode_with<F>(&self, callback: F) -> Result<ArrayD<f64>, FieldError>
    where
        F: FnOnce(&[u8]) -> Result<ArrayD<f64>, FieldError>,
    {
        callback(&self.bytes)
    }
}

impl Decoder for BufferDecoder {
    fn decode(&self) -> Result<ArrayD<f64>, FieldError> {
        let img = image::load_from_memory(&self.bytes)?;
        tracing::debug!(
            width = img.width(),
            height = img.height(),
            color = ?img.color(),
            "decoded image buffer"
        );
        Ok(dynamic_image_to_array(&img))
    }
}

/// Decoder reading an image file from disk on every `decode` call.
#[derive(Debug, Clone)]
pub struct FileDecoder {
    path: PathBuf,
}

impl FileDecoder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File read on every decode.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Decoder for FileDecoder {
    fn decode(&self) -> Result<ArrayD<f64>, FieldError> {
        tracing::debug!("decoding {}", self.path.display());
        BufferDecoder::from_file(&self.path)?.decode()
    }
}

/// Passes an already decoded array through.
#[derive(Debug, Clone)]
pub struct ArrayDecoder {
    array: ArrayD<f64>,
}

impl ArrayDecoder {
    pub fn new(array: ArrayD<f64>) -> Self {
        Self { array }
    }
}

impl Decoder for ArrayDecoder {
    fn decode(&self) -> Result<ArrayD<f64>, FieldError> {
        Ok(self.array.clone())
    }
}

/// Read a file, or only its first `nbytes` bytes.
pub fn read_file_source(path: &Path, nbytes: Option<usize>) -> Result<Vec<u8>, FieldError> {
    match nbytes {
        None => Ok(std::fs::read(path)?),
        Some(n) => {
            let mut buf = Vec::with_capacity(n);
            std::fs::File::open(path)?
                .take(n as u64)
                .read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Convert a decoded image to `(rows, cols)` or `(rows, cols, channels)`.
pub fn dynamic_image_to_array(img: &DynamicImage) -> ArrayD<f64> {
    match img {
        DynamicImage::ImageLuma8(b) => buffer_to_array(b),
        DynamicImage::ImageLumaA8(b) => buffer_to_array(b),
        DynamicImage::ImageRgb8(b) => buffer_to_array(b),
        DynamicImage::ImageRgba8(b) => buffer_to_array(b),
        DynamicImage::ImageLuma16(b) => buffer_to_array(b),
        DynamicImage::ImageLumaA16(b) => buffer_to_array(b),
        DynamicImage::ImageRgb16(b) => buffer_to_array(b),
        DynamicImage::ImageRgba16(b) => buffer_to_array(b),
        DynamicImage::ImageRgb32F(b) => buffer_to_array(b),
        DynamicImage::ImageRgba32F(b) => buffer_to_array(b),
        other => buffer_to_array(&other.to_rgba8()),
    }
}

fn buffer_to_array<P>(buf: &ImageBuffer<P, Vec<P::Subpixel>>) -> ArrayD<f64>
where
    P: Pixel,
    P::Subpixel: Into<f64>,
{
    let rows = buf.height() as usize;
    let cols = buf.width() as usize;
    let channels = usize::from(P::CHANNEL_COUNT);
    let shape = if channels == 1 {
        vec![rows, cols]
    } else {
        vec![rows, cols, channels]
    };
    let values: Vec<f64> = buf.as_raw().iter().map(|&v| v.into()).collect();
    ArrayD::from_shape_vec(IxDyn(&shape), values)
        .unwrap_or_else(|_| unreachable!("image buffer length matches its dimensions"))
}
