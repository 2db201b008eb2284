//! Color adjustment filters: Brightness, Monochrome.
//!
//! These are pixel-wise operations that don't require spatial context.
//! Every result sample is clamped into 0-255; nothing wraps.

use ndarray::{Array3, ArrayView3};
use tracing::trace;

use crate::error::Result;
use crate::filters::core::{clamp_u8, map_pixels};
use crate::image::{Channel, Image};
use crate::operation::ImageOperation;

// ============================================================================
// Brightness
// ============================================================================

/// Add `delta` to every sample.
///
/// # Arguments
/// * `input` - RGB image (height, width, 3)
/// * `delta` - Offset in sample units; negative darkens. Values beyond
///   +/-255 simply saturate.
///
/// # Returns
/// Brightness-adjusted image
pub fn brightness_u8(input: ArrayView3<u8>, delta: i32) -> Array3<u8> {
    map_pixels(input, |px| px.map(|v| clamp_u8(i32::from(v).saturating_add(delta))))
}

/// Brighten or darken by a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brightness {
    delta: i32,
}

impl Brightness {
    pub fn new(delta: i32) -> Self {
        Self { delta }
    }

    pub fn delta(&self) -> i32 {
        self.delta
    }
}

impl ImageOperation for Brightness {
    fn name(&self) -> &'static str {
        "brightness"
    }

    fn apply(&self, image: &Image) -> Result<Image> {
        trace!(height = image.height(), width = image.width(), delta = self.delta, "brightness");
        Ok(Image::from_valid(brightness_u8(image.view(), self.delta)))
    }
}

// ============================================================================
// Monochrome (channel isolation)
// ============================================================================

/// Keep one channel and zero the other two.
pub fn monochrome_u8(input: ArrayView3<u8>, channel: Channel) -> Array3<u8> {
    let keep = channel.index();
    map_pixels(input, |px| {
        let mut out = [0u8; 3];
        out[keep] = px[keep];
        out
    })
}

/// Isolate a single color channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monochrome {
    channel: Channel,
}

impl Monochrome {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }
}

impl ImageOperation for Monochrome {
    fn name(&self) -> &'static str {
        "monochrome"
    }

    fn apply(&self, image: &Image) -> Result<Image> {
        trace!(height = image.height(), width = image.width(), channel = %self.channel, "monochrome");
        Ok(Image::from_valid(monochrome_u8(image.view(), self.channel)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Brightness Tests
    // ========================================================================

    #[test]
    fn test_brightness_u8_brighten() {
        let mut img = Array3::<u8>::zeros((1, 1, 3));
        img[[0, 0, 0]] = 145;
        img[[0, 0, 1]] = 203;
        img[[0, 0, 2]] = 132;

        let result = brightness_u8(img.view(), 30);

        assert_eq!(result[[0, 0, 0]], 175);
        assert_eq!(result[[0, 0, 1]], 233);
        assert_eq!(result[[0, 0, 2]], 162);
    }

    #[test]
    fn test_brightness_u8_saturates() {
        let mut img = Array3::<u8>::zeros((1, 2, 3));
        img[[0, 0, 0]] = 250;
        img[[0, 1, 0]] = 5;

        let up = brightness_u8(img.view(), 1000);
        assert_eq!(up[[0, 0, 0]], 255);
        assert_eq!(up[[0, 1, 2]], 255);

        let down = brightness_u8(img.view(), -1000);
        assert!(down.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_brightness_extreme_delta_does_not_overflow() {
        let img = Array3::<u8>::from_elem((1, 1, 3), 200);
        let result = brightness_u8(img.view(), i32::MAX);
        assert_eq!(result[[0, 0, 1]], 255);
        let result = brightness_u8(img.view(), i32::MIN);
        assert_eq!(result[[0, 0, 1]], 0);
    }

    // ========================================================================
    // Monochrome Tests
    // ========================================================================

    #[test]
    fn test_monochrome_keeps_selected_channel() {
        let mut img = Array3::<u8>::zeros((1, 1, 3));
        img[[0, 0, 0]] = 10;
        img[[0, 0, 1]] = 20;
        img[[0, 0, 2]] = 30;

        let green = monochrome_u8(img.view(), Channel::Green);
        assert_eq!(green[[0, 0, 0]], 0);
        assert_eq!(green[[0, 0, 1]], 20);
        assert_eq!(green[[0, 0, 2]], 0);

        let blue = monochrome_u8(img.view(), Channel::Blue);
        assert_eq!(blue[[0, 0, 2]], 30);
        assert_eq!(blue[[0, 0, 0]], 0);
    }

    #[test]
    fn test_monochrome_operation() {
        let img = Image::filled(2, 2, [9, 8, 7]).unwrap();
        let out = Monochrome::new(Channel::Red).apply(&img).unwrap();
        assert_eq!(out.pixel(1, 1), Some([9, 0, 0]));
        assert_eq!(img.pixel(1, 1), Some([9, 8, 7]));
    }
}
