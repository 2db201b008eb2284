//! WebAssembly exports for the image operations.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! Images cross the boundary as flat row-major RGB bytes
//! (length = width * height * 3). Invalid sizes or parameters are
//! reported as a thrown string instead of a panic.

use wasm_bindgen::prelude::*;

use crate::compose::{combine_channels, split_channels, SplitPreview};
use crate::config::PipelineConfig;
use crate::error::OpError;
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

fn to_js(err: OpError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn run(data: &[u8], width: usize, height: usize, op: &dyn ImageOperation) -> Result<Vec<u8>, JsValue> {
    let image = Image::from_raw(height, width, data.to_vec()).map_err(to_js)?;
    op.apply(&image).map(Image::into_raw).map_err(to_js)
}

// ============================================================================
// Pixel-wise Filters
// ============================================================================

/// Add `delta` to every sample, saturating at 0 and 255.
///
/// # Arguments
/// * `data` - Flat array of RGB bytes (length = width * height * 3)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `delta` - Offset, negative darkens
///
/// # Returns
/// Flat array of RGB bytes
#[wasm_bindgen]
pub fn brightness_wasm(data: &[u8], width: usize, height: usize, delta: i32) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, &Brightness::new(delta))
}

/// Keep one channel ("red", "green", "blue") and zero the others.
#[wasm_bindgen]
pub fn monochrome_wasm(data: &[u8], width: usize, height: usize, channel: &str) -> Result<Vec<u8>, JsValue> {
    let channel: Channel = channel.parse().map_err(to_js)?;
    run(data, width, height, &Monochrome::new(channel))
}

/// Grey reduction: "value", "intensity" or "luma".
#[wasm_bindgen]
pub fn greyscale_wasm(data: &[u8], width: usize, height: usize, kind: &str) -> Result<Vec<u8>, JsValue> {
    let kind: GreyScaleType = kind.parse().map_err(to_js)?;
    run(data, width, height, &GreyScale::new(kind))
}

/// Sepia tone.
#[wasm_bindgen]
pub fn sepia_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, &ColorTransformation::sepia())
}

// ============================================================================
// Geometry & Convolution
// ============================================================================

/// Mirror "horizontal" or "vertical".
#[wasm_bindgen]
pub fn flip_wasm(data: &[u8], width: usize, height: usize, axis: &str) -> Result<Vec<u8>, JsValue> {
    let axis: FlipAxis = axis.parse().map_err(to_js)?;
    run(data, width, height, &Flip::new(axis))
}

/// Convolve with the "blur" or "sharpen" kernel.
#[wasm_bindgen]
pub fn sharpness_wasm(data: &[u8], width: usize, height: usize, kernel: &str) -> Result<Vec<u8>, JsValue> {
    let kind: KernelKind = kernel.parse().map_err(to_js)?;
    run(data, width, height, &Sharpness::new(kind))
}

// ============================================================================
// Tonal & Analysis
// ============================================================================

/// Align the histogram peaks of the three channels.
#[wasm_bindgen]
pub fn color_correction_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, &ColorCorrection::new())
}

/// Quadratic levels through (black, 0), (mid, 128), (highlight, 255).
#[wasm_bindgen]
pub fn levels_adjustment_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    black: i32,
    mid: i32,
    highlight: i32,
) -> Result<Vec<u8>, JsValue> {
    let levels = LevelsAdjustment::new(black, mid, highlight).map_err(to_js)?;
    run(data, width, height, &levels)
}

/// Histogram plot.
///
/// # Returns
/// Flat RGB bytes of a 256x256 canvas, whatever the input size
#[wasm_bindgen]
pub fn histogram_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    run(data, width, height, &Histogram::new())
}

/// Lossy Haar-wavelet compression, `percentage` in 0-100.
#[wasm_bindgen]
pub fn compression_wasm(data: &[u8], width: usize, height: usize, percentage: f64) -> Result<Vec<u8>, JsValue> {
    let op = Compression::new(percentage).map_err(to_js)?;
    run(data, width, height, &op)
}

// ============================================================================
// Composition
// ============================================================================

/// Run a JSON pipeline (`{"steps": [...]}`), optionally on the left
/// `percentage` of the image only (pass 100 for the whole image).
#[wasm_bindgen]
pub fn apply_pipeline_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    config: &str,
    percentage: f64,
) -> Result<Vec<u8>, JsValue> {
    let pipeline = PipelineConfig::from_json_str(config)
        .and_then(|c| c.build())
        .map_err(to_js)?;
    let preview = SplitPreview::new(percentage, pipeline).map_err(to_js)?;
    run(data, width, height, &preview)
}

/// Monochrome version of one channel (0 red, 1 green, 2 blue).
#[wasm_bindgen]
pub fn split_channel_wasm(data: &[u8], width: usize, height: usize, channel: usize) -> Result<Vec<u8>, JsValue> {
    let channel = Channel::from_index(channel).map_err(to_js)?;
    let image = Image::from_raw(height, width, data.to_vec()).map_err(to_js)?;
    let mut parts = split_channels(&image);
    Ok(parts.swap_remove(channel.index()).into_raw())
}

/// Take red from `red`, green from `green` and blue from `blue`.
#[wasm_bindgen]
pub fn combine_channels_wasm(
    red: &[u8],
    green: &[u8],
    blue: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<u8>, JsValue> {
    let images = [red, green, blue]
        .into_iter()
        .map(|data| Image::from_raw(height, width, data.to_vec()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_js)?;
    combine_channels(&images).map(Image::into_raw).map_err(to_js)
}
