//! Image Tool Rust Core
//!
//! Pixel-matrix transforms for in-memory 8-bit RGB raster images, with
//! Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Every image is `(height, width, 3)` `u8`: red, green, blue, 0-255.
//! [`Image`] validates its buffer once and is immutable afterwards.
//!
//! ## Operation Architecture
//! Each transform is a free function over `ArrayView3<u8>` plus a small
//! struct implementing [`ImageOperation`]. Operations compose through
//! [`Pipeline`] and [`SplitPreview`], and can be described in JSON via
//! [`config::PipelineConfig`]. Most operations preserve dimensions; the
//! histogram plot always returns a 256x256 canvas.
//!
//! ```
//! use imagetool_rust::{Brightness, Flip, FlipAxis, Image, ImageOperation, Pipeline};
//!
//! let image = Image::filled(2, 2, [10, 20, 30]).unwrap();
//! let pipeline = Pipeline::new()
//!     .then(Brightness::new(5))
//!     .then(Flip::new(FlipAxis::Horizontal));
//! let out = pipeline.apply(&image).unwrap();
//! assert_eq!(out.pixel(0, 0), Some([15, 25, 35]));
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod filters;
pub mod image;
pub mod operation;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use compose::{combine_channels, split_channels, CombineChannels, SplitChannels, SplitPreview};
pub use error::{OpError, Result};
pub use filters::color_adjust::{Brightness, Monochrome};
pub use filters::color_science::{ColorTransformation, SEPIA};
pub use filters::compression::Compression;
pub use filters::flip::{Flip, FlipAxis};
pub use filters::grayscale::{GreyScale, GreyScaleType};
pub use filters::histogram::{render_histogram, Histogram, HistogramStats};
pub use filters::levels_curves::{ColorCorrection, LevelsAdjustment, QuadraticCurve};
pub use filters::sharpen::{Kernel, KernelKind, Sharpness};
pub use image::{Channel, Image};
pub use operation::{ImageOperation, MultiImageOperation, Pipeline};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::prelude::*;

    use crate::compose::{combine_channels as combine_impl, split_channels as split_impl, SplitPreview};
    use crate::config::PipelineConfig;
    use crate::filters::color_adjust::{Brightness, Monochrome};
    use crate::filters::color_science::ColorTransformation;
    use crate::filters::compression::Compression;
    use crate::filters::flip::{Flip, FlipAxis};
    use crate::filters::grayscale::{GreyScale, GreyScaleType};
    use crate::filters::histogram::Histogram;
    use crate::filters::levels_curves::{ColorCorrection, LevelsAdjustment};
    use crate::filters::sharpen::{KernelKind, Sharpness};
    use crate::image::{Channel, Image};
    use crate::operation::ImageOperation;

    fn to_image(image: PyReadonlyArray3<'_, u8>) -> PyResult<Image> {
        Ok(Image::from_array(image.as_array().to_owned())?)
    }

    fn run<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        op: &dyn ImageOperation,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_image(image)?;
        let output = op.apply(&input)?;
        Ok(output.into_array().into_pyarray(py))
    }

    // ========================================================================
    // Pixel-wise Filters
    // ========================================================================

    /// Add `delta` to every sample, saturating at 0 and 255.
    #[pyfunction]
    pub fn brightness<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        delta: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, &Brightness::new(delta))
    }

    /// Keep one channel ("red", "green" or "blue") and zero the others.
    #[pyfunction]
    pub fn monochrome<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        channel: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let channel: Channel = channel.parse()?;
        run(py, image, &Monochrome::new(channel))
    }

    /// Grey reduction: "value", "intensity" or "luma".
    #[pyfunction]
    #[pyo3(signature = (image, kind="luma"))]
    pub fn greyscale<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kind: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let kind: GreyScaleType = kind.parse()?;
        run(py, image, &GreyScale::new(kind))
    }

    /// Sepia tone.
    #[pyfunction]
    pub fn sepia<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, &ColorTransformation::sepia())
    }

    // ========================================================================
    // Geometry & Convolution
    // ========================================================================

    /// Mirror "horizontal" (columns) or "vertical" (rows).
    #[pyfunction]
    pub fn flip<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        axis: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let axis: FlipAxis = axis.parse()?;
        run(py, image, &Flip::new(axis))
    }

    /// Convolve with the built-in "blur" (3x3) or "sharpen" (5x5) kernel.
    #[pyfunction]
    #[pyo3(signature = (image, kernel="sharpen"))]
    pub fn sharpness<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kernel: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let kind: KernelKind = kernel.parse()?;
        run(py, image, &Sharpness::new(kind))
    }

    // ========================================================================
    // Tonal & Analysis
    // ========================================================================

    /// Align the histogram peaks of the three channels.
    #[pyfunction]
    pub fn color_correction<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, &ColorCorrection::new())
    }

    /// Quadratic levels through (black, 0), (mid, 128), (highlight, 255).
    #[pyfunction]
    #[pyo3(signature = (image, black=0, mid=128, highlight=255))]
    pub fn levels_adjustment<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        black: i32,
        mid: i32,
        highlight: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let levels = LevelsAdjustment::new(black, mid, highlight)?;
        run(py, image, &levels)
    }

    /// 256x256 line plot of the channel histograms.
    #[pyfunction]
    pub fn histogram<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, &Histogram::new())
    }

    /// Lossy Haar-wavelet compression, `percentage` in 0-100.
    #[pyfunction]
    pub fn compression<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        percentage: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let op = Compression::new(percentage)?;
        run(py, image, &op)
    }

    // ========================================================================
    // Composition
    // ========================================================================

    /// Run a JSON pipeline (`{"steps": [...]}`) over the image.
    #[pyfunction]
    pub fn apply_pipeline<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        config: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let pipeline = PipelineConfig::from_json_str(config)?.build()?;
        run(py, image, &pipeline)
    }

    /// Apply a JSON pipeline to the left `percentage` of the image only.
    #[pyfunction]
    pub fn split_preview<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        percentage: f64,
        config: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let pipeline = PipelineConfig::from_json_str(config)?.build()?;
        let preview = SplitPreview::new(percentage, pipeline)?;
        run(py, image, &preview)
    }

    /// Three single-channel images: red, green, blue.
    #[pyfunction]
    pub fn split_channels<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Vec<Bound<'py, PyArray3<u8>>>> {
        let input = to_image(image)?;
        Ok(split_impl(&input)
            .into_iter()
            .map(|part| part.into_array().into_pyarray(py))
            .collect())
    }

    /// Take red from `red`, green from `green` and blue from `blue`.
    #[pyfunction]
    pub fn combine_channels<'py>(
        py: Python<'py>,
        red: PyReadonlyArray3<'py, u8>,
        green: PyReadonlyArray3<'py, u8>,
        blue: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let images = [to_image(red)?, to_image(green)?, to_image(blue)?];
        let merged = combine_impl(&images)?;
        Ok(merged.into_array().into_pyarray(py))
    }

    /// Python module definition
    #[pymodule]
    pub fn imagetool_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Pixel-wise filters
        m.add_function(wrap_pyfunction!(brightness, m)?)?;
        m.add_function(wrap_pyfunction!(monochrome, m)?)?;
        m.add_function(wrap_pyfunction!(greyscale, m)?)?;
        m.add_function(wrap_pyfunction!(sepia, m)?)?;

        // Geometry & convolution
        m.add_function(wrap_pyfunction!(flip, m)?)?;
        m.add_function(wrap_pyfunction!(sharpness, m)?)?;

        // Tonal & analysis
        m.add_function(wrap_pyfunction!(color_correction, m)?)?;
        m.add_function(wrap_pyfunction!(levels_adjustment, m)?)?;
        m.add_function(wrap_pyfunction!(histogram, m)?)?;
        m.add_function(wrap_pyfunction!(compression, m)?)?;

        // Composition
        m.add_function(wrap_pyfunction!(apply_pipeline, m)?)?;
        m.add_function(wrap_pyfunction!(split_preview, m)?)?;
        m.add_function(wrap_pyfunction!(split_channels, m)?)?;
        m.add_function(wrap_pyfunction!(combine_channels, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::imagetool_rust;
