//! Filter modules for image processing effects.
//!
//! ## Format
//!
//! Every filter works on 8-bit RGB:
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Free function + operation struct** - `xxx_u8(ArrayView3<u8>) -> Array3<u8>`
//!   does the work, a small struct wraps it as an [`ImageOperation`](crate::ImageOperation)
//! - **Saturating** - intermediate math in `i32`/`f64`, clamped back to 0-255
//! - **Input untouched** - every filter allocates its output
//! - **Two-phase** - whole-image statistics are gathered before any pixel is written
//! - **Thread-safe** - rayon for row/plane parallelism with the `parallel` feature
//!
//! ## Filter Categories
//!
//! - **Pixel-wise**: brightness, monochrome, greyscale
//! - **Geometry**: flip
//! - **Color science**: sepia / 3x3 color matrix
//! - **Convolution**: blur, sharpen
//! - **Tonal**: color correction, levels
//! - **Analysis**: histogram statistics and plot
//! - **Wavelet**: Haar compression

pub mod core;
pub mod color_adjust;
pub mod flip;
pub mod grayscale;
pub mod color_science;
pub mod sharpen;
pub mod histogram;
pub mod levels_curves;
pub mod compression;
