//! Split an image into single-channel images and merge them back.

use ndarray::{s, Array3, Zip};
use tracing::trace;

use crate::error::{OpError, Result};
use crate::filters::color_adjust::monochrome_u8;
use crate::image::{Channel, Image, CHANNELS};
use crate::operation::MultiImageOperation;

/// One image per channel, each keeping only that channel.
///
/// Output `i` holds channel `i` (red, green, blue) with the other two
/// zeroed.
pub fn split_channels(image: &Image) -> Vec<Image> {
    Channel::ALL
        .iter()
        .map(|&channel| Image::from_valid(monochrome_u8(image.view(), channel)))
        .collect()
}

/// Take channel `i` from `images[i]`.
///
/// Needs exactly one image per channel, all of the same size.
pub fn combine_channels(images: &[Image]) -> Result<Image> {
    if images.len() != CHANNELS {
        return Err(OpError::InvalidParameter(format!(
            "combine needs {CHANNELS} images, got {}",
            images.len()
        )));
    }
    let (height, width) = images[0].dimensions();
    if let Some(odd) = images.iter().find(|img| img.dimensions() != (height, width)) {
        let (h, w) = odd.dimensions();
        return Err(OpError::SizeMismatch(format!(
            "cannot combine {height}x{width} with {h}x{w}"
        )));
    }

    let mut output = Array3::<u8>::zeros((height, width, CHANNELS));
    for (c, source) in images.iter().enumerate() {
        Zip::from(output.slice_mut(s![.., .., c]))
            .and(source.view().slice(s![.., .., c]))
            .for_each(|dst, &src| *dst = src);
    }
    Ok(Image::from_valid(output))
}

/// Multi-output channel split. Takes exactly one image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitChannels;

impl SplitChannels {
    pub fn new() -> Self {
        Self
    }
}

impl MultiImageOperation for SplitChannels {
    fn name(&self) -> &'static str {
        "split_channels"
    }

    fn apply(&self, images: &[Image]) -> Result<Vec<Image>> {
        let [image] = images else {
            return Err(OpError::InvalidParameter(format!(
                "split needs 1 image, got {}",
                images.len()
            )));
        };
        trace!(height = image.height(), width = image.width(), "split_channels");
        Ok(split_channels(image))
    }
}

/// Multi-input channel merge. Produces a single image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombineChannels;

impl CombineChannels {
    pub fn new() -> Self {
        Self
    }
}

impl MultiImageOperation for CombineChannels {
    fn name(&self) -> &'static str {
        "combine_channels"
    }

    fn apply(&self, images: &[Image]) -> Result<Vec<Image>> {
        trace!(inputs = images.len(), "combine_channels");
        combine_channels(images).map(|img| vec![img])
    }
}
