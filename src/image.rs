//! RGB raster image value type.
//!
//! An [`Image`] owns a `(height, width, 3)` array of `u8` samples. It is
//! validated once at construction and never mutated afterwards: every
//! operation produces a new `Image`, and every accessor that hands out a
//! buffer hands out a copy (or a read-only view).
//!
//! Channel order is fixed: index 0 is red, 1 is green, 2 is blue.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array3, ArrayView3};
use serde::{Deserialize, Serialize};

use crate::error::{OpError, Result};

/// Number of color channels in every image.
pub const CHANNELS: usize = 3;

/// Largest sample value.
pub const MAX_VALUE: i32 = 255;

/// One of the three color planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// All channels in storage order.
    pub const ALL: [Channel; CHANNELS] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Position of this channel in a pixel.
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    /// Channel stored at `index`.
    pub fn from_index(index: usize) -> Result<Self> {
        Channel::ALL.get(index).copied().ok_or_else(|| {
            OpError::InvalidParameter(format!(
                "channel index {index} out of range 0..{CHANNELS}"
            ))
        })
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        };
        f.write_str(name)
    }
}

impl FromStr for Channel {
    type Err = OpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "red" | "r" => Ok(Channel::Red),
            "green" | "g" => Ok(Channel::Green),
            "blue" | "b" => Ok(Channel::Blue),
            other => Err(OpError::InvalidParameter(format!(
                "unknown channel '{other}'"
            ))),
        }
    }
}

/// Immutable 8-bit RGB image.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    data: Array3<u8>,
}

impl Image {
    /// Build an image from a `[height][width][channel]` integer buffer.
    ///
    /// Rejects empty buffers, ragged rows, pixels without exactly three
    /// channels and values outside 0-255.
    pub fn new(buffer: &[Vec<Vec<i32>>]) -> Result<Self> {
        let height = buffer.len();
        if height == 0 {
            return Err(OpError::InvalidImage("buffer has no rows".into()));
        }
        let width = buffer[0].len();
        if width == 0 {
            return Err(OpError::InvalidImage("buffer has no columns".into()));
        }

        let mut data = Array3::<u8>::zeros((height, width, CHANNELS));
        for (y, row) in buffer.iter().enumerate() {
            if row.len() != width {
                return Err(OpError::InvalidImage(format!(
                    "row {y} has {} pixels, expected {width}",
                    row.len()
                )));
            }
            for (x, pixel) in row.iter().enumerate() {
                if pixel.len() != CHANNELS {
                    return Err(OpError::InvalidImage(format!(
                        "pixel ({y}, {x}) has {} channels, expected {CHANNELS}",
                        pixel.len()
                    )));
                }
                for (c, &value) in pixel.iter().enumerate() {
                    data[[y, x, c]] = u8::try_from(value).map_err(|_| {
                        OpError::InvalidImage(format!(
                            "value {value} at ({y}, {x}, {c}) outside 0-{MAX_VALUE}"
                        ))
                    })?;
                }
            }
        }

        Ok(Self { data })
    }

    /// Wrap an owned `(height, width, 3)` array.
    pub fn from_array(data: Array3<u8>) -> Result<Self> {
        let (height, width, channels) = data.dim();
        if height == 0 || width == 0 {
            return Err(OpError::InvalidImage(format!(
                "zero-sized image {height}x{width}"
            )));
        }
        if channels != CHANNELS {
            return Err(OpError::InvalidImage(format!(
                "expected {CHANNELS} channels, got {channels}"
            )));
        }
        Ok(Self { data })
    }

    /// Build an image from a flat row-major RGB byte buffer.
    pub fn from_raw(height: usize, width: usize, data: Vec<u8>) -> Result<Self> {
        let expected = height
            .checked_mul(width)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| {
                OpError::SizeMismatch(format!("{height}x{width} RGB does not fit in memory"))
            })?;
        if data.len() != expected {
            return Err(OpError::SizeMismatch(format!(
                "expected {expected} bytes for {height}x{width} RGB, got {}",
                data.len()
            )));
        }
        let array = Array3::from_shape_vec((height, width, CHANNELS), data)
            .map_err(|e| OpError::InvalidImage(e.to_string()))?;
        Self::from_array(array)
    }

    /// Image filled with a single color.
    pub fn filled(height: usize, width: usize, rgb: [u8; CHANNELS]) -> Result<Self> {
        let data = Array3::from_shape_fn((height, width, CHANNELS), |(_, _, c)| rgb[c]);
        Self::from_array(data)
    }

    /// Wrap an array produced by an operation over a valid image.
    pub(crate) fn from_valid(data: Array3<u8>) -> Self {
        debug_assert!(data.dim().0 > 0 && data.dim().1 > 0 && data.dim().2 == CHANNELS);
        Self { data }
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn channels(&self) -> usize {
        CHANNELS
    }

    /// `(height, width)` of the image.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    /// Copy of the pixel buffer as `[height][width][channel]` integers.
    pub fn pixels(&self) -> Vec<Vec<Vec<i32>>> {
        self.data
            .outer_iter()
            .map(|row| {
                row.outer_iter()
                    .map(|px| px.iter().map(|&v| i32::from(v)).collect())
                    .collect()
            })
            .collect()
    }

    /// RGB value at `(row, col)`, if inside the image.
    pub fn pixel(&self, row: usize, col: usize) -> Option<[u8; CHANNELS]> {
        if row >= self.height() || col >= self.width() {
            return None;
        }
        Some([
            self.data[[row, col, 0]],
            self.data[[row, col, 1]],
            self.data[[row, col, 2]],
        ])
    }

    /// Read-only view of the samples.
    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    /// Owned copy of the samples.
    pub fn to_array(&self) -> Array3<u8> {
        self.data.clone()
    }

    /// Take ownership of the samples.
    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Flat row-major RGB bytes.
    pub fn into_raw(self) -> Vec<u8> {
        let (raw, _) = self
            .data
            .as_standard_layout()
            .into_owned()
            .into_raw_vec_and_offset();
        raw
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("height", &self.height())
            .field("width", &self.width())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_2x2() -> Vec<Vec<Vec<i32>>> {
        vec![
            vec![vec![1, 2, 3], vec![4, 5, 6]],
            vec![vec![7, 8, 9], vec![10, 11, 12]],
        ]
    }

    #[test]
    fn test_new_valid_buffer() {
        let img = Image::new(&buffer_2x2()).unwrap();
        assert_eq!(img.height(), 2);
        assert_eq!(img.width(), 2);
        assert_eq!(img.channels(), 3);
        assert_eq!(img.pixel(1, 0), Some([7, 8, 9]));
        assert_eq!(img.pixels(), buffer_2x2());
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(matches!(Image::new(&[]), Err(OpError::InvalidImage(_))));
        assert!(matches!(Image::new(&[vec![]]), Err(OpError::InvalidImage(_))));
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let mut buf = buffer_2x2();
        buf[1].pop();
        assert!(matches!(Image::new(&buf), Err(OpError::InvalidImage(_))));
    }

    #[test]
    fn test_new_rejects_wrong_channel_count() {
        let mut buf = buffer_2x2();
        buf[0][1].push(0);
        assert!(matches!(Image::new(&buf), Err(OpError::InvalidImage(_))));
    }

    #[test]
    fn test_new_rejects_out_of_range_values() {
        let mut buf = buffer_2x2();
        buf[0][0][2] = 256;
        assert!(Image::new(&buf).is_err());
        buf[0][0][2] = -1;
        assert!(Image::new(&buf).is_err());
    }

    #[test]
    fn test_pixels_is_a_copy() {
        let img = Image::new(&buffer_2x2()).unwrap();
        let mut copy = img.pixels();
        copy[0][0][0] = 200;
        assert_eq!(img.pixel(0, 0), Some([1, 2, 3]));
    }

    #[test]
    fn test_from_array_rejects_rgba() {
        let arr = Array3::<u8>::zeros((2, 2, 4));
        assert!(Image::from_array(arr).is_err());
    }

    #[test]
    fn test_from_raw_roundtrip() {
        let raw: Vec<u8> = (0..12).collect();
        let img = Image::from_raw(2, 2, raw.clone()).unwrap();
        assert_eq!(img.pixel(0, 1), Some([3, 4, 5]));
        assert_eq!(img.into_raw(), raw);
        assert!(matches!(
            Image::from_raw(2, 3, vec![0; 12]),
            Err(OpError::SizeMismatch(_))
        ));
    }

    #[test]
    fn test_from_raw_rejects_overflowing_shape() {
        assert!(matches!(
            Image::from_raw(usize::MAX, 2, vec![0; 6]),
            Err(OpError::SizeMismatch(_))
        ));
        assert!(matches!(
            Image::from_raw(usize::MAX / 2, 1, vec![0; 6]),
            Err(OpError::SizeMismatch(_))
        ));
    }

    #[test]
    fn test_channel_parsing() {
        assert_eq!("Red".parse::<Channel>().unwrap(), Channel::Red);
        assert_eq!(Channel::from_index(2).unwrap(), Channel::Blue);
        assert!(Channel::from_index(3).is_err());
        assert!("alpha".parse::<Channel>().is_err());
    }
}
