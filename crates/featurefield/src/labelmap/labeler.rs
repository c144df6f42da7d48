//! Connected-component labeling of boolean masks.
//!
//! The builders only rely on the contract of [`ComponentLabeler`]: background
//! cells get label 0 and each connected foreground component gets one of the
//! contiguous labels `1..=count`.

use image::{GrayImage, Luma};
use imageproc::region_labelling::connected_components;
use ndarray::{Array2, ArrayView2};

use crate::FieldError;

/// Pixel neighbourhood used to connect foreground cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Edge neighbours only.
    #[default]
    Four,
    /// Edge and corner neighbours.
    Eight,
}

impl From<Connectivity> for imageproc::region_labelling::Connectivity {
    fn from(c: Connectivity) -> Self {
        match c {
            Connectivity::Four => Self::Four,
            Connectivity::Eight => Self::Eight,
        }
    }
}

/// Labels connected `true` regions of a mask.
pub trait ComponentLabeler {
    /// Returns the label array (same shape as `mask`) and the number of
    /// foreground components.
    fn label(&self, mask: ArrayView2<'_, bool>) -> Result<(Array2<i32>, usize), FieldError>;
}

impl<L: ComponentLabeler + ?Sized> ComponentLabeler for &L {
    fn label(&self, mask: ArrayView2<'_, bool>) -> Result<(Array2<i32>, usize), FieldError> {
        (**self).label(mask)
    }
}

impl<L: ComponentLabeler + ?Sized> ComponentLabeler for Box<L> {
    fn label(&self, mask: ArrayView2<'_, bool>) -> Result<(Array2<i32>, usize), FieldError> {
        (**self).label(mask)
    }
}

/// `(width, height)` of the image holding a `rows x cols` grid.
fn image_extent(rows: usize, cols: usize) -> Result<(u32, u32), FieldError> {
    match (u32::try_from(cols), u32::try_from(rows)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(FieldError::TooLarge { rows, cols }),
    }
}

/// Labeler backed by `imageproc::region_labelling::connected_components`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageprocLabeler {
    pub connectivity: Connectivity,
}

impl ImageprocLabeler {
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }
}

impl ComponentLabeler for ImageprocLabeler {
    fn label(&self, mask: ArrayView2<'_, bool>) -> Result<(Array2<i32>, usize), FieldError> {
        let (rows, cols) = mask.dim();
        if rows == 0 || cols == 0 {
            return Ok((Array2::zeros((rows, cols)), 0));
        }
        let (width, height) = image_extent(rows, cols)?;

        // Image coordinates are (x = column, y = row).
        let img = GrayImage::from_fn(width, height, |x, y| {
            Luma([if mask[[y as usize, x as usize]] { 255 } else { 0 }])
        });
        let labeled = connected_components(&img, self.connectivity.into(), Luma([0u8]));

        let mut count = 0u32;
        let labels = Array2::from_shape_fn((rows, cols), |(r, c)| {
            let l = labeled.get_pixel(c as u32, r as u32)[0];
            count = count.max(l);
            l as i32
        });
        tracing::trace!(
            rows,
            cols,
            components = count,
            connectivity = ?self.connectivity,
            "labeled mask"
        );
        Ok((labels, count as usize))
    }
}
