//! Mirror images left-right or top-bottom.

use std::str::FromStr;

use ndarray::{s, Array3, ArrayView3};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{OpError, Result};
use crate::image::Image;
use crate::operation::ImageOperation;

/// Mirror axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipAxis {
    /// Swap columns: `pixel[i][j] <-> pixel[i][width-1-j]`.
    Horizontal,
    /// Swap rows: `pixel[i][j] <-> pixel[height-1-i][j]`.
    Vertical,
}

impl FromStr for FlipAxis {
    type Err = OpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(FlipAxis::Horizontal),
            "vertical" | "v" => Ok(FlipAxis::Vertical),
            other => Err(OpError::InvalidParameter(format!("unknown flip axis '{other}'"))),
        }
    }
}

/// Mirror `input` along `axis`.
pub fn flip_u8(input: ArrayView3<u8>, axis: FlipAxis) -> Array3<u8> {
    let mirrored = match axis {
        FlipAxis::Horizontal => input.slice_move(s![.., ..;-1, ..]),
        FlipAxis::Vertical => input.slice_move(s![..;-1, .., ..]),
    };
    let mut output = Array3::<u8>::zeros(mirrored.dim());
    output.assign(&mirrored);
    output
}

/// Flip operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flip {
    axis: FlipAxis,
}

impl Flip {
    pub fn new(axis: FlipAxis) -> Self {
        Self { axis }
    }

    pub fn axis(&self) -> FlipAxis {
        self.axis
    }
}

impl ImageOperation for Flip {
    fn name(&self) -> &'static str {
        "flip"
    }

    fn apply(&self, image: &Image) -> Result<Image> {
        trace!(height = image.height(), width = image.width(), axis = ?self.axis, "flip");
        Ok(Image::from_valid(flip_u8(image.view(), self.axis)))
    }
}
