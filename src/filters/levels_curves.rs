//! Tonal filters: Color Correction, Levels Adjustment.
//!
//! Color correction aligns the histogram peaks of the three channels.
//! Levels adjustment remaps every sample through a quadratic curve fitted
//! to user-chosen black, mid and highlight points.

use ndarray::{Array3, ArrayView3};
use tracing::{debug, trace};

use crate::error::{OpError, Result};
use crate::filters::core::{clamp_u8, floor_clamp_u8, map_pixels};
use crate::filters::histogram::HistogramStats;
use crate::image::{Image, CHANNELS};
use crate::operation::ImageOperation;

// ============================================================================
// Color Correction
// ============================================================================

/// Lowest peak value that takes part in the average.
pub const MEANINGFUL_MIN: usize = 10;
/// Highest peak value that takes part in the average.
pub const MEANINGFUL_MAX: usize = 245;

/// Per-channel offsets that move every peak onto the mean meaningful peak.
///
/// Peaks outside `MEANINGFUL_MIN..=MEANINGFUL_MAX` are excluded from the
/// mean but are still shifted. With no meaningful peak at all, every
/// offset is zero.
pub fn correction_shifts(stats: &HistogramStats) -> [i32; CHANNELS] {
    let peaks = stats.peaks();
    let meaningful: Vec<usize> = peaks
        .iter()
        .copied()
        .filter(|p| (MEANINGFUL_MIN..=MEANINGFUL_MAX).contains(p))
        .collect();

    if meaningful.is_empty() {
        return [0; CHANNELS];
    }
    let average = (meaningful.iter().sum::<usize>() / meaningful.len()) as i32;
    peaks.map(|p| average - p as i32)
}

/// Align channel histogram peaks.
///
/// Statistics for the whole image are gathered before any output pixel
/// is written.
pub fn color_correct_u8(input: ArrayView3<u8>) -> Array3<u8> {
    let stats = HistogramStats::from_view(input);
    let shifts = correction_shifts(&stats);
    debug!(peaks = ?stats.peaks(), shifts = ?shifts, "color correction");

    if shifts == [0; CHANNELS] {
        return input.to_owned();
    }
    map_pixels(input, |px| {
        let mut out = [0u8; CHANNELS];
        for c in 0..CHANNELS {
            out[c] = clamp_u8(i32::from(px[c]) + shifts[c]);
        }
        out
    })
}

/// Color correction operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorCorrection;

impl ColorCorrection {
    pub fn new() -> Self {
        Self
    }
}

impl ImageOperation for ColorCorrection {
    fn name(&self) -> &'static str {
        "color_correction"
    }

    fn apply(&self, image: &Image) -> Result<Image> {
        trace!(height = image.height(), width = image.width(), "color_correction");
        Ok(Image::from_valid(color_correct_u8(image.view())))
    }
}

// ============================================================================
// Levels Adjustment
// ============================================================================

/// Output value at the mid control point.
pub const MID_OUTPUT: i128 = 128;
/// Output value at the highlight control point.
pub const HIGHLIGHT_OUTPUT: i128 = 255;

/// `y = a*x^2 + b*x + c`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticCurve {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl QuadraticCurve {
    /// Fit through `(black, 0)`, `(mid, 128)` and `(highlight, 255)`.
    ///
    /// Coefficients come from the closed-form solution of the 3x3 system;
    /// numerators and the shared denominator are computed exactly in
    /// `i128` (wide enough for any `i32` points) before the final division.
    pub fn through_levels(black: i32, mid: i32, highlight: i32) -> Result<Self> {
        let (b, m, w) = (i128::from(black), i128::from(mid), i128::from(highlight));
        let denominator = (m - w) * (b * b - b * (m + w) + m * w);
        if denominator == 0 {
            return Err(OpError::Degenerate(format!(
                "levels ({black}, {mid}, {highlight}) give a singular system"
            )));
        }

        let (y1, y2) = (MID_OUTPUT, HIGHLIGHT_OUTPUT);
        let num_a = -b * (y1 - y2) + y1 * w - y2 * m;
        let num_b = b * b * (y1 - y2) + y2 * m * m - y1 * w * w;
        let num_c = b * b * (y2 * m - y1 * w) - b * (y2 * m * m - y1 * w * w);

        let d = denominator as f64;
        Ok(Self {
            a: num_a as f64 / d,
            b: num_b as f64 / d,
            c: num_c as f64 / d,
        })
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.a * x * x + self.b * x + self.c
    }

    /// Floored and clamped output for every 8-bit input.
    pub fn lookup_table(&self) -> [u8; 256] {
        let mut lut = [0u8; 256];
        for (i, slot) in lut.iter_mut().enumerate() {
            *slot = floor_clamp_u8(self.evaluate(i as f64));
        }
        lut
    }
}

/// Remap every sample through a lookup table.
pub fn apply_lut_u8(input: ArrayView3<u8>, lut: &[u8; 256]) -> Array3<u8> {
    map_pixels(input, |px| px.map(|v| lut[v as usize]))
}

/// Levels adjustment operation.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelsAdjustment {
    black: i32,
    mid: i32,
    highlight: i32,
    curve: QuadraticCurve,
    lut: [u8; 256],
}

impl LevelsAdjustment {
    /// Requires `0 <= black < mid < highlight`.
    pub fn new(black: i32, mid: i32, highlight: i32) -> Result<Self> {
        if black < 0 || black >= mid || mid >= highlight {
            return Err(OpError::InvalidParameter(format!(
                "levels must satisfy 0 <= black < mid < highlight, got ({black}, {mid}, {highlight})"
            )));
        }
        let curve = QuadraticCurve::through_levels(black, mid, highlight)?;
        debug!(black, mid, highlight, a = curve.a, b = curve.b, c = curve.c, "levels curve");
        Ok(Self {
            black,
            mid,
            highlight,
            curve,
            lut: curve.lookup_table(),
        })
    }

    pub fn points(&self) -> (i32, i32, i32) {
        (self.black, self.mid, self.highlight)
    }

    pub fn curve(&self) -> &QuadraticCurve {
        &self.curve
    }
}

impl ImageOperation for LevelsAdjustment {
    fn name(&self) -> &'static str {
        "levels_adjustment"
    }

    fn apply(&self, image: &Image) -> Result<Image> {
        trace!(
            height = image.height(),
            width = image.width(),
            black = self.black,
            mid = self.mid,
            highlight = self.highlight,
            "levels_adjustment"
        );
        Ok(Image::from_valid(apply_lut_u8(image.view(), &self.lut)))
    }
}
