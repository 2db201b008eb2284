//! Color matrix transforms (sepia).
//!
//! Each output channel is a weighted sum of the input channels:
//! `new[c] = round(sum_k matrix[c][k] * old[k])`, clamped to 0-255.

use ndarray::{Array3, ArrayView3};
use tracing::trace;

use crate::error::Result;
use crate::filters::core::{map_pixels, round_clamp_u8};
use crate::image::Image;
use crate::operation::ImageOperation;

/// 3x3 color weight matrix, rows are output channels.
pub type ColorMatrix = [[f64; 3]; 3];

/// Sepia tone weights.
pub const SEPIA: ColorMatrix = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Apply a color matrix to every pixel.
pub fn color_matrix_u8(input: ArrayView3<u8>, matrix: &ColorMatrix) -> Array3<u8> {
    map_pixels(input, |[r, g, b]| {
        let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
        let mut out = [0u8; 3];
        for (dst, row) in out.iter_mut().zip(matrix.iter()) {
            *dst = round_clamp_u8(row[0] * r + row[1] * g + row[2] * b);
        }
        out
    })
}

/// Sepia tone, the fixed [`SEPIA`] matrix.
pub fn sepia_u8(input: ArrayView3<u8>) -> Array3<u8> {
    color_matrix_u8(input, &SEPIA)
}

/// Color transformation operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTransformation {
    matrix: ColorMatrix,
}

impl ColorTransformation {
    /// Transformation with arbitrary weights.
    pub fn new(matrix: ColorMatrix) -> Self {
        Self { matrix }
    }

    pub fn sepia() -> Self {
        Self::new(SEPIA)
    }

    pub fn matrix(&self) -> &ColorMatrix {
        &self.matrix
    }
}

impl Default for ColorTransformation {
    fn default() -> Self {
        Self::sepia()
    }
}

impl ImageOperation for ColorTransformation {
    fn name(&self) -> &'static str {
        "color_transformation"
    }

    fn apply(&self, image: &Image) -> Result<Image> {
        trace!(height = image.height(), width = image.width(), "color_transformation");
        Ok(Image::from_valid(color_matrix_u8(image.view(), &self.matrix)))
    }
}
