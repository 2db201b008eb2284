//! The single-input operation contract and operation chaining.

use std::fmt::Debug;

use tracing::trace;

use crate::error::Result;
use crate::image::Image;

/// A transform from one image to a new image.
///
/// Implementations validate their parameters when constructed, so `apply`
/// only fails for reasons that depend on the input image.
pub trait ImageOperation: Debug + Send + Sync {
    /// Short stable name used in logs.
    fn name(&self) -> &'static str;

    /// Produce a new image; `image` is never modified.
    fn apply(&self, image: &Image) -> Result<Image>;
}

impl<T: ImageOperation + ?Sized> ImageOperation for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn apply(&self, image: &Image) -> Result<Image> {
        (**self).apply(image)
    }
}

/// A transform over several images at once (channel split/combine).
pub trait MultiImageOperation: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, images: &[Image]) -> Result<Vec<Image>>;
}

/// Operations applied one after another.
///
/// An empty pipeline returns a copy of its input.
#[derive(Debug, Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn ImageOperation>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step, builder style.
    pub fn then(mut self, op: impl ImageOperation + 'static) -> Self {
        self.steps.push(Box::new(op));
        self
    }

    pub fn push(&mut self, op: Box<dyn ImageOperation>) {
        self.steps.push(op);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl From<Vec<Box<dyn ImageOperation>>> for Pipeline {
    fn from(steps: Vec<Box<dyn ImageOperation>>) -> Self {
        Self { steps }
    }
}

impl ImageOperation for Pipeline {
    fn name(&self) -> &'static str {
        "pipeline"
    }

    fn apply(&self, image: &Image) -> Result<Image> {
        let mut current = image.clone();
        for step in &self.steps {
            trace!(step = step.name(), "pipeline step");
            current = step.apply(&current)?;
        }
        Ok(current)
    }
}
