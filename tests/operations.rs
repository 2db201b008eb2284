//! End-to-end checks of the public operation API.

use imagetool_rust::config::PipelineConfig;
use imagetool_rust::{
    Brightness, Channel, ColorCorrection, ColorTransformation, CombineChannels, Compression, Flip,
    FlipAxis, GreyScale, GreyScaleType, Histogram, Image, ImageOperation, KernelKind,
    LevelsAdjustment, Monochrome, MultiImageOperation, OpError, Pipeline, Sharpness, SplitChannels,
    SplitPreview,
};

fn scenario() -> Image {
    Image::new(&[
        vec![vec![145, 203, 132], vec![248, 69, 80], vec![21, 65, 98], vec![19, 11, 211]],
        vec![vec![95, 216, 181], vec![243, 108, 173], vec![97, 13, 96], vec![171, 198, 224]],
        vec![vec![54, 215, 14], vec![103, 87, 31], vec![247, 171, 122], vec![167, 77, 110]],
    ])
    .unwrap()
}

/// Deterministic pseudo-random image.
fn noise(height: usize, width: usize, seed: u32) -> Image {
    let mut state = seed;
    let data: Vec<u8> = (0..height * width * 3)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect();
    Image::from_raw(height, width, data).unwrap()
}

fn all_operations() -> Vec<Box<dyn ImageOperation>> {
    vec![
        Box::new(Brightness::new(40)),
        Box::new(Flip::new(FlipAxis::Vertical)),
        Box::new(Monochrome::new(Channel::Green)),
        Box::new(GreyScale::new(GreyScaleType::Intensity)),
        Box::new(ColorTransformation::sepia()),
        Box::new(Sharpness::new(KernelKind::Sharpen)),
        Box::new(ColorCorrection::new()),
        Box::new(LevelsAdjustment::new(10, 100, 240).unwrap()),
        Box::new(Compression::new(30.0).unwrap()),
        Box::new(Histogram::new()),
    ]
}

// ============================================================================
// Concrete 3x4 scenario
// ============================================================================

#[test]
fn test_scenario_brightness() {
    let out = Brightness::new(30).apply(&scenario()).unwrap();
    assert_eq!(out.pixel(0, 0), Some([175, 233, 162]));
}

#[test]
fn test_scenario_sepia() {
    let out = ColorTransformation::sepia().apply(&scenario()).unwrap();
    assert_eq!(out.pixel(0, 0), Some([238, 212, 165]));
}

#[test]
fn test_scenario_blur() {
    let out = Sharpness::new(KernelKind::Blur).apply(&scenario()).unwrap();
    assert_eq!(out.pixel(0, 0), Some([94, 93, 76]));
}

#[test]
fn test_scenario_luma() {
    let out = GreyScale::new(GreyScaleType::Luma).apply(&scenario()).unwrap();
    assert_eq!(out.pixel(0, 0), Some([185, 185, 185]));
}

#[test]
fn test_scenario_flip_horizontal() {
    let out = Flip::new(FlipAxis::Horizontal).apply(&scenario()).unwrap();
    assert_eq!(
        out.pixels()[0],
        vec![vec![19, 11, 211], vec![21, 65, 98], vec![248, 69, 80], vec![145, 203, 132]]
    );
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_double_flip_is_identity() {
    for (h, w, seed) in [(1, 1, 1), (3, 4, 2), (7, 5, 3), (8, 8, 4)] {
        let img = noise(h, w, seed);
        for axis in [FlipAxis::Horizontal, FlipAxis::Vertical] {
            let flip = Flip::new(axis);
            let twice = flip.apply(&flip.apply(&img).unwrap()).unwrap();
            assert_eq!(twice, img, "{axis:?} on {h}x{w}");
        }
    }
}

#[test]
fn test_brightness_saturates_for_any_delta() {
    let img = noise(6, 9, 11);
    let up = Brightness::new(i32::MAX).apply(&img).unwrap();
    assert!(up.view().iter().all(|&v| v == 255));
    let down = Brightness::new(i32::MIN).apply(&img).unwrap();
    assert!(down.view().iter().all(|&v| v == 0));
    assert_eq!(Brightness::new(0).apply(&img).unwrap(), img);
}

#[test]
fn test_compression_extremes() {
    for (h, w, seed) in [(1, 1, 5), (3, 4, 6), (5, 7, 7), (16, 16, 8)] {
        let img = noise(h, w, seed);
        assert_eq!(Compression::new(0.0).unwrap().apply(&img).unwrap(), img);

        let black = Compression::new(100.0).unwrap().apply(&img).unwrap();
        assert_eq!(black.dimensions(), (h, w));
        assert!(black.view().iter().all(|&v| v == 0));
    }
}

#[test]
fn test_compression_keeps_dimensions() {
    let img = noise(5, 11, 9);
    let out = Compression::new(50.0).unwrap().apply(&img).unwrap();
    assert_eq!(out.dimensions(), (5, 11));
}

#[test]
fn test_color_correction_idempotent() {
    let once = ColorCorrection::new().apply(&scenario()).unwrap();
    let twice = ColorCorrection::new().apply(&once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_split_preview_bounds() {
    let img = noise(4, 9, 13);
    for op in all_operations() {
        let name = op.name();
        let expected = op.apply(&img).unwrap();
        let full = SplitPreview::from_boxed(100.0, op).unwrap();
        assert_eq!(full.apply(&img).unwrap(), expected, "{name} at 100%");
    }
    for op in all_operations() {
        let none = SplitPreview::from_boxed(0.0, op).unwrap();
        assert_eq!(none.apply(&img).unwrap(), img);
    }
}

#[test]
fn test_color_correction_idempotent_with_excluded_peaks() {
    // Red peak 5 is outside 10..=245; the mean of green and blue peaks is 110
    let img = Image::new(&[
        vec![vec![5, 100, 120], vec![5, 100, 120]],
        vec![vec![40, 200, 60], vec![90, 30, 200]],
    ])
    .unwrap();
    let once = ColorCorrection::new().apply(&img).unwrap();
    assert_eq!(once.pixel(0, 0), Some([110, 110, 110]));
    assert_eq!(once.pixel(1, 1), Some([195, 40, 190]));
    let twice = ColorCorrection::new().apply(&once).unwrap();
    assert_eq!(twice, once);
}

#[test]
fn test_color_correction_idempotent_with_tied_peaks() {
    // Every value occurs once, so each peak is the channel minimum
    let img = Image::new(&[vec![vec![30, 60, 90], vec![50, 80, 100], vec![70, 40, 140]]]).unwrap();
    let once = ColorCorrection::new().apply(&img).unwrap();
    // Peaks (30, 40, 90) average to 53
    assert_eq!(once.pixel(0, 0), Some([53, 73, 53]));
    assert_eq!(once.pixel(0, 2), Some([93, 53, 103]));
    let twice = ColorCorrection::new().apply(&once).unwrap();
    assert_eq!(twice, once);
}

#[test]
fn test_split_preview_with_size_changing_operation() {
    let img = Image::filled(4, 10, [3, 50, 100]).unwrap();
    let out = SplitPreview::new(30.0, Histogram::new()).unwrap().apply(&img).unwrap();
    assert_eq!(out.dimensions(), (4, 10));
    for row in 0..4 {
        for col in 3..10 {
            assert_eq!(out.pixel(row, col), img.pixel(row, col), "({row}, {col})");
        }
    }
}

#[test]
fn test_split_preview_right_side_untouched() {
    let img = noise(4, 10, 17);
    let preview = SplitPreview::new(30.0, Brightness::new(255)).unwrap();
    let out = preview.apply(&img).unwrap();
    for row in 0..4 {
        for col in 0..10 {
            if col < 3 {
                assert_eq!(out.pixel(row, col), Some([255, 255, 255]));
            } else {
                assert_eq!(out.pixel(row, col), img.pixel(row, col));
            }
        }
    }
}

#[test]
fn test_split_then_combine_reconstructs() {
    let img = noise(5, 6, 21);
    let parts = SplitChannels::new().apply(&[img.clone()]).unwrap();
    assert_eq!(parts.len(), 3);
    let merged = CombineChannels::new().apply(&parts).unwrap();
    assert_eq!(merged, vec![img]);
}

#[test]
fn test_combine_rejects_mismatched_sizes() {
    let a = noise(2, 2, 1);
    let b = noise(2, 3, 2);
    let err = CombineChannels::new().apply(&[a.clone(), a, b]).unwrap_err();
    assert!(matches!(err, OpError::SizeMismatch(_)));
}

#[test]
fn test_operations_leave_input_untouched() {
    let img = scenario();
    let before = img.clone();
    for op in all_operations() {
        let _ = op.apply(&img).unwrap();
        assert_eq!(img, before, "{} modified its input", op.name());
    }
}

#[test]
fn test_dimensions_preserved_except_histogram() {
    let img = noise(3, 7, 31);
    for op in all_operations() {
        let out = op.apply(&img).unwrap();
        if op.name() == "histogram" {
            assert_eq!(out.dimensions(), (256, 256));
        } else {
            assert_eq!(out.dimensions(), (3, 7), "{}", op.name());
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_pipeline_matches_manual_pipeline() {
    let config = PipelineConfig::from_json_str(
        r#"{ "steps": [
            { "op": "brightness", "delta": 30 },
            { "op": "flip", "axis": "horizontal" },
            { "op": "levels_adjustment", "black": 20, "mid": 100, "highlight": 255 },
            { "op": "split_preview", "percentage": 50,
              "inner": { "op": "greyscale", "kind": "value" } }
        ] }"#,
    )
    .unwrap();
    let from_config = config.build().unwrap();

    let manual = Pipeline::new()
        .then(Brightness::new(30))
        .then(Flip::new(FlipAxis::Horizontal))
        .then(LevelsAdjustment::new(20, 100, 255).unwrap())
        .then(SplitPreview::new(50.0, GreyScale::new(GreyScaleType::Value)).unwrap());

    let img = scenario();
    assert_eq!(from_config.apply(&img).unwrap(), manual.apply(&img).unwrap());
}

#[test]
fn test_config_rejects_bad_compression() {
    let config =
        PipelineConfig::from_json_str(r#"{ "steps": [ { "op": "compression", "percentage": -3 } ] }"#)
            .unwrap();
    assert!(matches!(config.build(), Err(OpError::InvalidParameter(_))));
}

#[test]
fn test_config_malformed_json() {
    assert!(matches!(
        PipelineConfig::from_json_str("{ steps: "),
        Err(OpError::Config(_))
    ));
}
