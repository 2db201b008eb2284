//! Lossy compression by Haar wavelet coefficient thresholding.
//!
//! ## Pipeline
//!
//! 1. Each channel is zero-padded into a square plane whose side is the
//!    smallest power of two covering both image dimensions.
//! 2. A multi-level 2-D Haar transform is applied in place: rows, then
//!    columns, on a shrinking top-left block (full side, half, ... down to 2).
//! 3. The magnitudes of all coefficients of *all* channels, rounded to two
//!    decimals, form one sorted set of unique values. The threshold is the
//!    element at index `round(len * percentage / 100)`, or infinity past the
//!    end. Coefficients whose magnitude is below the threshold are zeroed.
//! 4. The inverse transform runs the same schedule backwards (columns
//!    before rows, block side 2 up to the full side).
//! 5. Planes are cropped to the original size, rounded and clamped.
//!
//! 0% keeps every coefficient; 100% zeroes every coefficient and yields a
//! black image.

use std::f64::consts::SQRT_2;

use ndarray::{s, Array2, Array3, ArrayView3, ArrayViewMut1};
use tracing::{debug, trace};

use crate::error::{OpError, Result};
use crate::filters::core::round_clamp_u8;
use crate::image::{Image, CHANNELS};
use crate::operation::ImageOperation;

// ============================================================================
// Haar transform
// ============================================================================

/// One forward Haar step over an even-length sequence.
///
/// Writes pairwise averages to the first half and differences to the
/// second half, both scaled by `1/sqrt(2)`.
pub fn haar_forward_1d(mut data: ArrayViewMut1<f64>) {
    let len = data.len();
    let half = len / 2;
    let mut out = vec![0.0f64; len];
    for k in 0..half {
        let a = data[2 * k];
        let b = data[2 * k + 1];
        out[k] = (a + b) / SQRT_2;
        out[half + k] = (a - b) / SQRT_2;
    }
    for (dst, v) in data.iter_mut().zip(out) {
        *dst = v;
    }
}

/// Inverse of [`haar_forward_1d`].
pub fn haar_inverse_1d(mut data: ArrayViewMut1<f64>) {
    let len = data.len();
    let half = len / 2;
    let mut out = vec![0.0f64; len];
    for k in 0..half {
        let a = data[k];
        let b = data[half + k];
        out[2 * k] = (a + b) / SQRT_2;
        out[2 * k + 1] = (a - b) / SQRT_2;
    }
    for (dst, v) in data.iter_mut().zip(out) {
        *dst = v;
    }
}

/// Full multi-level forward transform of a square power-of-two plane.
pub fn haar_forward_2d(plane: &mut Array2<f64>) {
    let mut length = plane.nrows();
    while length > 1 {
        for i in 0..length {
            haar_forward_1d(plane.slice_mut(s![i, ..length]));
        }
        for j in 0..length {
            haar_forward_1d(plane.slice_mut(s![..length, j]));
        }
        length /= 2;
    }
}

/// Full multi-level inverse transform of a square power-of-two plane.
pub fn haar_inverse_2d(plane: &mut Array2<f64>) {
    let size = plane.nrows();
    let mut length = 2;
    while length <= size {
        for j in 0..length {
            haar_inverse_1d(plane.slice_mut(s![..length, j]));
        }
        for i in 0..length {
            haar_inverse_1d(plane.slice_mut(s![i, ..length]));
        }
        length *= 2;
    }
}

// ============================================================================
// Padding and thresholding
// ============================================================================

/// Smallest power of two that is at least `max(height, width)`.
pub fn padded_size(height: usize, width: usize) -> usize {
    height.max(width).max(1).next_power_of_two()
}

/// Copy one channel into the top-left of a zeroed `size x size` plane.
pub fn pad_to_square(input: ArrayView3<u8>, channel: usize, size: usize) -> Array2<f64> {
    let (height, width, _) = input.dim();
    let mut plane = Array2::<f64>::zeros((size, size));
    plane
        .slice_mut(s![..height, ..width])
        .assign(&input.slice(s![.., .., channel]).mapv(f64::from));
    plane
}

fn round_2dp(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Magnitude below which coefficients are discarded.
///
/// Built from the unique two-decimal magnitudes of every coefficient in
/// every plane. Returns infinity when the rank falls past the last value.
pub fn compression_threshold(planes: &[Array2<f64>], percentage: f64) -> f64 {
    let mut magnitudes: Vec<f64> = planes
        .iter()
        .flat_map(|plane| plane.iter().map(|v| round_2dp(v.abs())))
        .collect();
    magnitudes.sort_by(f64::total_cmp);
    magnitudes.dedup();

    let rank = (magnitudes.len() as f64 * percentage / 100.0).round() as usize;
    magnitudes.get(rank).copied().unwrap_or(f64::INFINITY)
}

// ============================================================================
// Compression
// ============================================================================

/// Compress and reconstruct an RGB image.
///
/// # Arguments
/// * `input` - RGB image (height, width, 3)
/// * `percentage` - Share of unique coefficient magnitudes to discard, 0-100
///
/// # Returns
/// Reconstructed image of the original size
pub fn compress_u8(input: ArrayView3<u8>, percentage: f64) -> Array3<u8> {
    let (height, width, _) = input.dim();
    let size = padded_size(height, width);

    let mut planes: Vec<Array2<f64>> = (0..CHANNELS)
        .map(|c| pad_to_square(input, c, size))
        .collect();

    for_each_plane(&mut planes, haar_forward_2d);

    // Every plane must be fully transformed before the threshold is chosen
    let threshold = compression_threshold(&planes, percentage);
    let mut zeroed = 0usize;
    for plane in planes.iter_mut() {
        for v in plane.iter_mut() {
            if v.abs() < threshold {
                *v = 0.0;
                zeroed += 1;
            }
        }
    }
    debug!(size, percentage, threshold, zeroed, "wavelet threshold");

    for_each_plane(&mut planes, haar_inverse_2d);

    let mut output = Array3::<u8>::zeros((height, width, CHANNELS));
    for (c, plane) in planes.iter().enumerate() {
        output
            .slice_mut(s![.., .., c])
            .zip_mut_with(&plane.slice(s![..height, ..width]), |dst, &v| {
                *dst = round_clamp_u8(v)
            });
    }
    output
}

fn for_each_plane(planes: &mut [Array2<f64>], f: fn(&mut Array2<f64>)) {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        planes.par_iter_mut().for_each(f);
    }
    #[cfg(not(feature = "parallel"))]
    {
        planes.iter_mut().for_each(f);
    }
}

/// Wavelet compression operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compression {
    percentage: f64,
}

impl Compression {
    /// `percentage` must lie in 0-100.
    pub fn new(percentage: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&percentage) {
            return Err(OpError::InvalidParameter(format!(
                "compression percentage {percentage} outside 0-100"
            )));
        }
        Ok(Self { percentage })
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }
}

impl ImageOperation for Compression {
    fn name(&self) -> &'static str {
        "compression"
    }

    fn apply(&self, image: &Image) -> Result<Image> {
        trace!(
            height = image.height(),
            width = image.width(),
            percentage = self.percentage,
            "compression"
        );
        Ok(Image::from_valid(compress_u8(image.view(), self.percentage)))
    }
}
