//! Per-channel histograms and histogram rendering.
//!
//! [`HistogramStats::compute`] is the read-only first pass shared by color
//! correction and the histogram plot. It never touches pixels, so callers
//! can finish it completely before writing anything.

use ndarray::{Array3, ArrayView3, Axis};
use tracing::trace;

use crate::error::Result;
use crate::image::{Image, CHANNELS};
use crate::operation::ImageOperation;

/// Number of buckets per channel.
pub const BINS: usize = 256;

/// Side length of the rendered histogram canvas.
pub const CANVAS_SIZE: usize = 256;

/// Line color per channel on the rendered canvas.
pub const CHANNEL_COLORS: [[u8; 3]; CHANNELS] = [[255, 0, 0], [0, 255, 0], [0, 0, 255]];

const BACKGROUND: [u8; 3] = [255, 255, 255];

/// Frequency tables and peaks for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramStats {
    counts: [[u32; BINS]; CHANNELS],
    peaks: [usize; CHANNELS],
    peak_counts: [u32; CHANNELS],
}

impl HistogramStats {
    /// Count every sample of every channel.
    pub fn compute(image: &Image) -> Self {
        Self::from_view(image.view())
    }

    /// Same as [`compute`](Self::compute) for a raw `(H, W, 3)` view.
    pub fn from_view(input: ArrayView3<u8>) -> Self {
        let mut counts = [[0u32; BINS]; CHANNELS];
        for px in input.lanes(Axis(2)) {
            for (c, table) in counts.iter_mut().enumerate() {
                table[px[c] as usize] += 1;
            }
        }

        let mut peaks = [0usize; CHANNELS];
        let mut peak_counts = [0u32; CHANNELS];
        for c in 0..CHANNELS {
            let (peak, count) = peak_of(&counts[c]);
            peaks[c] = peak;
            peak_counts[c] = count;
        }

        Self {
            counts,
            peaks,
            peak_counts,
        }
    }

    /// Frequency table of one channel.
    pub fn counts(&self, channel: usize) -> &[u32; BINS] {
        &self.counts[channel]
    }

    /// Most frequent value per channel (lowest value on ties).
    pub fn peaks(&self) -> [usize; CHANNELS] {
        self.peaks
    }

    /// Frequency of each channel's peak.
    pub fn peak_counts(&self) -> [u32; CHANNELS] {
        self.peak_counts
    }

    /// Largest single frequency over all channels.
    pub fn max_frequency(&self) -> u32 {
        self.peak_counts.iter().copied().max().unwrap_or(0)
    }
}

/// First bucket holding the highest count, scanning upward.
fn peak_of(table: &[u32; BINS]) -> (usize, u32) {
    let mut best = (0usize, table[0]);
    for (value, &count) in table.iter().enumerate().skip(1) {
        if count > best.1 {
            best = (value, count);
        }
    }
    best
}

/// Draw a line from (x1, y1) to (x2, y2) using Bresenham's algorithm.
fn draw_line(canvas: &mut Array3<u8>, (x1, y1): (i32, i32), (x2, y2): (i32, i32), color: [u8; 3]) {
    let (height, width, _) = canvas.dim();
    let dx = (x2 - x1).abs();
    let dy = -(y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x1, y1);

    loop {
        if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
            for (c, &v) in color.iter().enumerate() {
                canvas[[y as usize, x as usize, c]] = v;
            }
        }
        if x == x2 && y == y2 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Canvas row for a frequency, with zero at the bottom edge.
fn row_for(count: u32, max: u32) -> i32 {
    let top = (CANVAS_SIZE - 1) as f64;
    let scaled = (f64::from(count) / f64::from(max) * top).round();
    (top - scaled) as i32
}

/// Render the three channel histograms as line plots on a white canvas.
///
/// All channels share one vertical scale: the largest frequency of any
/// channel reaches the top row. An all-zero table leaves the canvas blank.
pub fn render_histogram(stats: &HistogramStats) -> Image {
    let mut canvas = Array3::from_shape_fn((CANVAS_SIZE, CANVAS_SIZE, CHANNELS), |(_, _, c)| {
        BACKGROUND[c]
    });

    let max = stats.max_frequency();
    if max > 0 {
        for (c, color) in CHANNEL_COLORS.iter().enumerate() {
            let table = stats.counts(c);
            for value in 1..BINS {
                let from = ((value - 1) as i32, row_for(table[value - 1], max));
                let to = (value as i32, row_for(table[value], max));
                draw_line(&mut canvas, from, to, *color);
            }
        }
    }

    Image::from_valid(canvas)
}

/// Histogram plot operation; output is always 256x256.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Histogram;

impl Histogram {
    pub fn new() -> Self {
        Self
    }
}

impl ImageOperation for Histogram {
    fn name(&self) -> &'static str {
        "histogram"
    }

    fn apply(&self, image: &Image) -> Result<Image> {
        trace!(height = image.height(), width = image.width(), "histogram");
        let stats = HistogramStats::compute(image);
        Ok(render_histogram(&stats))
    }
}
