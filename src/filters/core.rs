//! Core utilities shared by the filters.
//!
//! This module provides:
//! - Sample clamping/rounding back into the 0-255 domain
//! - A per-pixel map driver (parallel with the `parallel` feature)
//! - Region extraction and pasting used by split previews

use ndarray::{s, Array3, ArrayView1, ArrayView3, ArrayViewMut1, Axis, Zip};

use crate::image::CHANNELS;

/// Clamp an integer sample into 0-255.
#[inline]
pub fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Round to nearest (halves away from zero) and clamp into 0-255.
#[inline]
pub fn round_clamp_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Truncate toward negative infinity and clamp into 0-255.
#[inline]
pub fn floor_clamp_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.floor().clamp(0.0, 255.0) as u8
}

/// Build a new image by mapping every RGB pixel independently.
pub fn map_pixels<F>(input: ArrayView3<u8>, f: F) -> Array3<u8>
where
    F: Fn([u8; CHANNELS]) -> [u8; CHANNELS] + Send + Sync,
{
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    let apply = |mut out: ArrayViewMut1<u8>, px: ArrayView1<u8>| {
        let mapped = f([px[0], px[1], px[2]]);
        for c in 0..CHANNELS {
            out[c] = mapped[c];
        }
    };

    let zip = Zip::from(output.lanes_mut(Axis(2))).and(input.lanes(Axis(2)));
    #[cfg(feature = "parallel")]
    zip.par_for_each(apply);
    #[cfg(not(feature = "parallel"))]
    zip.for_each(apply);

    output
}

/// Copy the top-left `height x width` block.
///
/// The block is clipped to the source bounds.
pub fn extract_region(input: ArrayView3<u8>, height: usize, width: usize) -> Array3<u8> {
    let (h, w, _) = input.dim();
    let height = height.min(h);
    let width = width.min(w);
    input.slice(s![..height, ..width, ..]).to_owned()
}

/// Overwrite the top-left `height x width` corner of `target` with `patch`.
///
/// Any part of `patch` outside that corner, or outside `target`, is dropped.
pub fn paste_region(target: &mut Array3<u8>, patch: ArrayView3<u8>, height: usize, width: usize) {
    let (th, tw, _) = target.dim();
    let (ph, pw, _) = patch.dim();
    let height = height.min(th).min(ph);
    let width = width.min(tw).min(pw);
    target
        .slice_mut(s![..height, ..width, ..])
        .assign(&patch.slice(s![..height, ..width, ..]));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_clamp() {
        assert_eq!(round_clamp_u8(94.31), 94);
        assert_eq!(round_clamp_u8(2.5), 3);
        assert_eq!(round_clamp_u8(-3.7), 0);
        assert_eq!(round_clamp_u8(300.0), 255);
        assert_eq!(round_clamp_u8(f64::NAN), 0);
    }

    #[test]
    fn test_floor_clamp() {
        assert_eq!(floor_clamp_u8(185.99), 185);
        assert_eq!(floor_clamp_u8(-0.5), 0);
        assert_eq!(floor_clamp_u8(255.7), 255);
    }

    #[test]
    fn test_clamp_u8() {
        assert_eq!(clamp_u8(-10), 0);
        assert_eq!(clamp_u8(128), 128);
        assert_eq!(clamp_u8(1000), 255);
    }

    #[test]
    fn test_map_pixels_swaps_channels() {
        let mut img = Array3::<u8>::zeros((2, 2, 3));
        img[[1, 1, 0]] = 7;
        img[[1, 1, 2]] = 9;
        let out = map_pixels(img.view(), |[r, g, b]| [b, g, r]);
        assert_eq!(out[[1, 1, 0]], 9);
        assert_eq!(out[[1, 1, 2]], 7);
        assert_eq!(out.dim(), (2, 2, 3));
    }

    #[test]
    fn test_extract_and_paste_region() {
        let img = Array3::from_shape_fn((2, 4, 3), |(y, x, _)| (y * 10 + x) as u8);
        let left = extract_region(img.view(), 2, 2);
        assert_eq!(left.dim(), (2, 2, 3));
        assert_eq!(left[[1, 1, 0]], 11);

        let mut target = Array3::<u8>::zeros((2, 4, 3));
        paste_region(&mut target, left.view(), 2, 4);
        assert_eq!(target[[1, 1, 2]], 11);
        assert_eq!(target[[1, 2, 0]], 0);
    }

    #[test]
    fn test_paste_region_clips_oversized_patch() {
        let patch = Array3::<u8>::from_elem((3, 3, 3), 5);
        let mut target = Array3::<u8>::zeros((2, 2, 3));
        paste_region(&mut target, patch.view(), 3, 3);
        assert!(target.iter().all(|&v| v == 5));
    }

    #[test]
    fn test_paste_region_respects_bound() {
        let patch = Array3::<u8>::from_elem((4, 4, 3), 9);
        let mut target = Array3::<u8>::zeros((4, 6, 3));
        paste_region(&mut target, patch.view(), 4, 2);
        for x in 0..6 {
            let expected = if x < 2 { 9 } else { 0 };
            assert_eq!(target[[3, x, 1]], expected, "column {x}");
        }
    }
}
