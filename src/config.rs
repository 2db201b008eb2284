//! JSON descriptions of operations and pipelines.
//!
//! ```json
//! { "steps": [
//!     { "op": "brightness", "delta": 20 },
//!     { "op": "split_preview", "percentage": 50,
//!       "inner": { "op": "greyscale", "kind": "luma" } }
//! ] }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compose::SplitPreview;
use crate::error::{OpError, Result};
use crate::filters::color_adjust::{Brightness, Monochrome};
use crate::filters::color_science::{ColorMatrix, ColorTransformation, SEPIA};
use crate::filters::compression::Compression;
use crate::filters::flip::{Flip, FlipAxis};
use crate::filters::grayscale::{GreyScale, GreyScaleType};
use crate::filters::histogram::Histogram;
use crate::filters::levels_curves::{ColorCorrection, LevelsAdjustment};
use crate::filters::sharpen::{KernelKind, Sharpness};
use crate::image::Channel;
use crate::operation::{ImageOperation, Pipeline};

fn sepia_matrix() -> ColorMatrix {
    SEPIA
}

/// One single-input operation with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OperationSpec {
    Brightness {
        delta: i32,
    },
    Flip {
        axis: FlipAxis,
    },
    Monochrome {
        channel: Channel,
    },
    Greyscale {
        kind: GreyScaleType,
    },
    Sepia,
    ColorTransformation {
        #[serde(default = "sepia_matrix")]
        matrix: ColorMatrix,
    },
    Sharpness {
        kernel: KernelKind,
    },
    ColorCorrection,
    LevelsAdjustment {
        black: i32,
        mid: i32,
        highlight: i32,
    },
    Compression {
        percentage: f64,
    },
    Histogram,
    SplitPreview {
        percentage: f64,
        inner: Box<OperationSpec>,
    },
    Pipeline {
        steps: Vec<OperationSpec>,
    },
}

impl OperationSpec {
    /// Validate parameters and construct the operation.
    pub fn build(&self) -> Result<Box<dyn ImageOperation>> {
        let op: Box<dyn ImageOperation> = match self {
            OperationSpec::Brightness { delta } => Box::new(Brightness::new(*delta)),
            OperationSpec::Flip { axis } => Box::new(Flip::new(*axis)),
            OperationSpec::Monochrome { channel } => Box::new(Monochrome::new(*channel)),
            OperationSpec::Greyscale { kind } => Box::new(GreyScale::new(*kind)),
            OperationSpec::Sepia => Box::new(ColorTransformation::sepia()),
            OperationSpec::ColorTransformation { matrix } => {
                Box::new(ColorTransformation::new(*matrix))
            }
            OperationSpec::Sharpness { kernel } => Box::new(Sharpness::new(*kernel)),
            OperationSpec::ColorCorrection => Box::new(ColorCorrection::new()),
            OperationSpec::LevelsAdjustment {
                black,
                mid,
                highlight,
            } => Box::new(LevelsAdjustment::new(*black, *mid, *highlight)?),
            OperationSpec::Compression { percentage } => Box::new(Compression::new(*percentage)?),
            OperationSpec::Histogram => Box::new(Histogram::new()),
            OperationSpec::SplitPreview { percentage, inner } => {
                Box::new(SplitPreview::from_boxed(*percentage, inner.build()?)?)
            }
            OperationSpec::Pipeline { steps } => Box::new(build_pipeline(steps)?),
        };
        Ok(op)
    }
}

fn build_pipeline(steps: &[OperationSpec]) -> Result<Pipeline> {
    steps
        .iter()
        .map(OperationSpec::build)
        .collect::<Result<Vec<_>>>()
        .map(Pipeline::from)
}

/// Top-level pipeline file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub steps: Vec<OperationSpec>,
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents).map_err(|e| {
            OpError::Config(format!("failed to parse {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), steps = config.steps.len(), "loaded pipeline config");
        Ok(config)
    }

    /// Build every step; the first invalid one aborts.
    pub fn build(&self) -> Result<Pipeline> {
        build_pipeline(&self.steps)
    }
}
