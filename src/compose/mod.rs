//! Operations built from other operations or spanning several images.
//!
//! | Item | Description |
//! |------|-------------|
//! | [`SplitPreview`] | Run an operation on the left part of an image |
//! | [`SplitChannels`] | One image in, three single-channel images out |
//! | [`CombineChannels`] | Three images in, channel `i` taken from image `i` |

pub mod channels;
pub mod split_preview;

pub use channels::{combine_channels, split_channels, CombineChannels, SplitChannels};
pub use split_preview::SplitPreview;
