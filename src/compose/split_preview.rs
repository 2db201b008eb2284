//! Apply an operation to the left part of an image only.
//!
//! The left `round(percentage / 100 * width)` columns are cut out, passed
//! through the wrapped operation and pasted back over a copy of the
//! original. The rest of the image is untouched.

use tracing::{trace, warn};

use crate::error::{OpError, Result};
use crate::filters::core::{extract_region, paste_region};
use crate::image::Image;
use crate::operation::ImageOperation;

/// Split-view decorator around any single-input operation.
#[derive(Debug)]
pub struct SplitPreview {
    percentage: f64,
    operation: Box<dyn ImageOperation>,
    strict: bool,
}

impl SplitPreview {
    /// `percentage` must lie in 0-100.
    pub fn new(percentage: f64, operation: impl ImageOperation + 'static) -> Result<Self> {
        Self::from_boxed(percentage, Box::new(operation))
    }

    pub fn from_boxed(percentage: f64, operation: Box<dyn ImageOperation>) -> Result<Self> {
        if !(0.0..=100.0).contains(&percentage) {
            return Err(OpError::InvalidParameter(format!(
                "split percentage {percentage} outside 0-100"
            )));
        }
        Ok(Self {
            percentage,
            operation,
            strict: false,
        })
    }

    /// Propagate errors from the wrapped operation instead of falling
    /// back to the unmodified input.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    pub fn inner(&self) -> &dyn ImageOperation {
        self.operation.as_ref()
    }

    /// Number of columns the wrapped operation sees.
    pub fn split_width(&self, width: usize) -> usize {
        ((self.percentage / 100.0 * width as f64).round() as usize).min(width)
    }
}

impl ImageOperation for SplitPreview {
    fn name(&self) -> &'static str {
        "split_preview"
    }

    fn apply(&self, image: &Image) -> Result<Image> {
        let (height, width) = image.dimensions();
        let split = self.split_width(width);
        trace!(
            height,
            width,
            split,
            inner = self.operation.name(),
            "split_preview"
        );

        if split == 0 {
            return Ok(image.clone());
        }

        let region = if split == width {
            image.clone()
        } else {
            Image::from_valid(extract_region(image.view(), height, split))
        };

        let result = match self.operation.apply(&region) {
            Ok(result) => result,
            Err(err) if !self.strict => {
                warn!(inner = self.operation.name(), error = %err, "split preview fell back to original");
                return Ok(image.clone());
            }
            Err(err) => return Err(err),
        };

        if split == width {
            return Ok(result);
        }
        let mut canvas = image.to_array();
        paste_region(&mut canvas, result.view(), height, split);
        Ok(Image::from_valid(canvas))
    }
}
