//! Convolution filters: Blur, Sharpen.
//!
//! Each channel is convolved independently with a fixed odd-sized kernel.
//!
//! ## Border Handling
//!
//! Kernel taps whose source pixel lies outside the image are skipped. The
//! remaining weights are *not* renormalized, so border pixels see only part
//! of the kernel mass: blur darkens edges slightly and sharpen brightens
//! them. Results are rounded and clamped to 0-255.

use std::str::FromStr;

use ndarray::{arr2, Array2, Array3, ArrayView3, ArrayViewMut2, Axis};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{OpError, Result};
use crate::filters::core::round_clamp_u8;
use crate::image::{Image, CHANNELS};
use crate::operation::ImageOperation;

/// Square convolution kernel with odd side length.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Array2<f64>,
}

impl Kernel {
    /// Create a kernel from a square, odd-sized weight matrix.
    pub fn new(weights: Array2<f64>) -> Result<Self> {
        let (rows, cols) = weights.dim();
        if rows != cols || rows % 2 == 0 {
            return Err(OpError::InvalidParameter(format!(
                "kernel must be square with odd size, got {rows}x{cols}"
            )));
        }
        Ok(Self { weights })
    }

    /// 3x3 weighted blur (weights sum to 1).
    pub fn blur() -> Self {
        let weights = arr2(&[
            [1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0],
            [1.0 / 8.0, 1.0 / 4.0, 1.0 / 8.0],
            [1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0],
        ]);
        Self { weights }
    }

    /// 5x5 sharpen: unit center, positive inner ring, negative outer ring.
    pub fn sharpen() -> Self {
        let weights = Array2::from_shape_fn((5, 5), |(y, x)| {
            let ring = y.abs_diff(2).max(x.abs_diff(2));
            match ring {
                0 => 1.0,
                1 => 0.25,
                _ => -0.125,
            }
        });
        Self { weights }
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.weights.dim().0
    }

    /// Offset of the center tap, `size / 2`.
    pub fn center(&self) -> usize {
        self.size() / 2
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }
}

/// The two built-in kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelKind {
    Blur,
    Sharpen,
}

impl KernelKind {
    pub fn kernel(self) -> Kernel {
        match self {
            KernelKind::Blur => Kernel::blur(),
            KernelKind::Sharpen => Kernel::sharpen(),
        }
    }
}

impl FromStr for KernelKind {
    type Err = OpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "blur" => Ok(KernelKind::Blur),
            "sharpen" => Ok(KernelKind::Sharpen),
            other => Err(OpError::InvalidParameter(format!("unknown kernel '{other}'"))),
        }
    }
}

/// Convolve every channel with `kernel`, skipping out-of-image taps.
///
/// # Arguments
/// * `input` - RGB image (height, width, 3)
/// * `kernel` - Odd-sized square kernel
///
/// # Returns
/// Filtered image of the same size
pub fn convolve_u8(input: ArrayView3<u8>, kernel: &Kernel) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));
    let size = kernel.size();
    let half = kernel.center() as isize;
    let weights = kernel.weights();

    let convolve_row = |y: usize, mut out_row: ArrayViewMut2<u8>| {
        for x in 0..width {
            let mut sums = [0.0f64; CHANNELS];

            for ky in 0..size {
                let sy = y as isize + ky as isize - half;
                if sy < 0 || sy >= height as isize {
                    continue;
                }
                for kx in 0..size {
                    let sx = x as isize + kx as isize - half;
                    if sx < 0 || sx >= width as isize {
                        continue;
                    }
                    let w = weights[[ky, kx]];
                    for (c, sum) in sums.iter_mut().enumerate() {
                        *sum += f64::from(input[[sy as usize, sx as usize, c]]) * w;
                    }
                }
            }

            for (c, sum) in sums.iter().enumerate() {
                out_row[[x, c]] = round_clamp_u8(*sum);
            }
        }
    };

    #[cfg(feature = "parallel")]
    {
        use ndarray::parallel::prelude::*;
        output
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(y, row)| convolve_row(y, row));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for (y, row) in output.axis_iter_mut(Axis(0)).enumerate() {
            convolve_row(y, row);
        }
    }

    output
}

/// Blur or sharpen operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Sharpness {
    kind: KernelKind,
    kernel: Kernel,
}

impl Sharpness {
    pub fn new(kind: KernelKind) -> Self {
        Self {
            kind,
            kernel: kind.kernel(),
        }
    }

    pub fn kind(&self) -> KernelKind {
        self.kind
    }
}

impl ImageOperation for Sharpness {
    fn name(&self) -> &'static str {
        "sharpness"
    }

    fn apply(&self, image: &Image) -> Result<Image> {
        trace!(
            height = image.height(),
            width = image.width(),
            kernel = ?self.kind,
            size = self.kernel.size(),
            "sharpness"
        );
        Ok(Image::from_valid(convolve_u8(image.view(), &self.kernel)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_3x4() -> Array3<u8> {
        let rows: [[[u8; 3]; 4]; 3] = [
            [[145, 203, 132], [248, 69, 80], [21, 65, 98], [19, 11, 211]],
            [[95, 216, 181], [243, 108, 173], [97, 13, 96], [171, 198, 224]],
            [[54, 215, 14], [103, 87, 31], [247, 171, 122], [167, 77, 110]],
        ];
        Array3::from_shape_fn((3, 4, 3), |(y, x, c)| rows[y][x][c])
    }

    #[test]
    fn test_kernels_are_odd_and_centered() {
        assert_eq!(Kernel::blur().size(), 3);
        assert_eq!(Kernel::blur().center(), 1);
        assert_eq!(Kernel::sharpen().size(), 5);
        assert_eq!(Kernel::sharpen().center(), 2);
        assert_relative_eq!(Kernel::blur().weights().sum(), 1.0);
        assert_relative_eq!(Kernel::sharpen().weights()[[2, 2]], 1.0);
        assert_relative_eq!(Kernel::sharpen().weights()[[1, 3]], 0.25);
        assert_relative_eq!(Kernel::sharpen().weights()[[0, 4]], -0.125);
    }

    #[test]
    fn test_kernel_new_rejects_even() {
        assert!(Kernel::new(Array2::zeros((2, 2))).is_err());
        assert!(Kernel::new(Array2::zeros((3, 5))).is_err());
        assert!(Kernel::new(Array2::zeros((3, 3))).is_ok());
    }

    #[test]
    fn test_blur_corner_uses_truncated_kernel() {
        let img = sample_3x4();
        let result = convolve_u8(img.view(), &Kernel::blur());

        assert_eq!(result[[0, 0, 0]], 94);
        assert_eq!(result[[0, 0, 1]], 93);
        assert_eq!(result[[0, 0, 2]], 76);
    }

    #[test]
    fn test_blur_full_image() {
        let img = sample_3x4();
        let result = convolve_u8(img.view(), &Kernel::blur());

        assert_eq!(result[[1, 1, 0]], 158);
        assert_eq!(result[[1, 1, 1]], 116);
        assert_eq!(result[[1, 1, 2]], 115);
        assert_eq!(result[[2, 3, 0]], 100);
        assert_eq!(result[[2, 3, 1]], 66);
        assert_eq!(result[[2, 3, 2]], 77);
    }

    #[test]
    fn test_sharpen_clamps() {
        let img = sample_3x4();
        let result = convolve_u8(img.view(), &Kernel::sharpen());

        assert_eq!(result[[0, 0, 0]], 226);
        assert_eq!(result[[0, 0, 1]], 232);
        assert_eq!(result[[0, 0, 2]], 195);
        assert_eq!(result[[0, 3, 0]], 0);
        assert_eq!(result[[1, 1, 0]], 255);
    }

    #[test]
    fn test_blur_uniform_interior_unchanged() {
        let img = Array3::<u8>::from_elem((5, 5, 3), 100);
        let result = convolve_u8(img.view(), &Kernel::blur());

        assert_eq!(result[[2, 2, 0]], 100);
        // Corner sees 9/16 of the kernel: 56.25
        assert_eq!(result[[0, 0, 0]], 56);
    }

    #[test]
    fn test_sharpness_operation() {
        let img = Image::from_array(sample_3x4()).unwrap();
        let out = Sharpness::new(KernelKind::Blur).apply(&img).unwrap();
        assert_eq!(out.pixel(0, 0), Some([94, 93, 76]));
        assert_eq!(out.dimensions(), img.dimensions());
    }
}
