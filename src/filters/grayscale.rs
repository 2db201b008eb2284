//! Greyscale reduction filter.
//!
//! Each pixel is reduced to one scalar which is then replicated into all
//! three channels. Three reducers are available:
//!
//! - **value**: `max(R, G, B)`
//! - **intensity**: `(R + G + B) / 3`, truncated
//! - **luma**: ITU-R BT.709 weighted sum, truncated
//!
//! Every reducer stays inside the input range, so no clamping is needed.

use std::str::FromStr;

use ndarray::{Array3, ArrayView3};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{OpError, Result};
use crate::filters::core::map_pixels;
use crate::image::Image;
use crate::operation::ImageOperation;

/// ITU-R BT.709 luminosity coefficients
pub const LUMA_R: f64 = 0.2126;
pub const LUMA_G: f64 = 0.7152;
pub const LUMA_B: f64 = 0.0722;

/// Which scalar a pixel is reduced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GreyScaleType {
    Value,
    Intensity,
    Luma,
}

impl GreyScaleType {
    /// Reduce one RGB pixel.
    #[inline]
    pub fn reduce(self, [r, g, b]: [u8; 3]) -> u8 {
        match self {
            GreyScaleType::Value => r.max(g).max(b),
            GreyScaleType::Intensity => ((u16::from(r) + u16::from(g) + u16::from(b)) / 3) as u8,
            GreyScaleType::Luma => {
                let luma = LUMA_R * f64::from(r) + LUMA_G * f64::from(g) + LUMA_B * f64::from(b);
                // Weights sum to 1.0, so the floor never leaves 0-255
                luma.floor().min(255.0) as u8
            }
        }
    }
}

impl FromStr for GreyScaleType {
    type Err = OpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "value" => Ok(GreyScaleType::Value),
            "intensity" => Ok(GreyScaleType::Intensity),
            "luma" => Ok(GreyScaleType::Luma),
            other => Err(OpError::InvalidParameter(format!(
                "unknown greyscale type '{other}'"
            ))),
        }
    }
}

// ============================================================================
// 8-bit (u8) Implementation
// ============================================================================

/// Convert an RGB image to greyscale.
///
/// # Arguments
/// * `input` - RGB image (height, width, 3)
/// * `kind` - Reducer to use
///
/// # Returns
/// New image with R=G=B=reduced value
pub fn greyscale_u8(input: ArrayView3<u8>, kind: GreyScaleType) -> Array3<u8> {
    map_pixels(input, |px| {
        let grey = kind.reduce(px);
        [grey, grey, grey]
    })
}

/// Greyscale operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreyScale {
    kind: GreyScaleType,
}

impl GreyScale {
    pub fn new(kind: GreyScaleType) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> GreyScaleType {
        self.kind
    }
}

impl ImageOperation for GreyScale {
    fn name(&self) -> &'static str {
        "greyscale"
    }

    fn apply(&self, image: &Image) -> Result<Image> {
        trace!(height = image.height(), width = image.width(), kind = ?self.kind, "greyscale");
        Ok(Image::from_valid(greyscale_u8(image.view(), self.kind)))
    }
}
