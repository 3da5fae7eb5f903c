mod common;

use common::init_logging;
use common::synthetic_image::{fill_rect, solid_rgb, solid_rgba, textured_rgb};
use edit_regions::image::ColorImage;
use edit_regions::report::NO_CHANGES_SENTINEL;
use edit_regions::{
    detect_edit_regions, format_edit_regions_for_prompt, DetectionError, EditDetectionOptions,
    EditDetector, PerceptualDetectionOptions, PerceptualDetector,
};
use std::sync::Arc;
use std::thread;

const GRAY: [u8; 3] = [128, 128, 128];
const WHITE: [u8; 3] = [255, 255, 255];
const BLACK: [u8; 3] = [0, 0, 0];

fn rgb(width: usize, height: usize, data: &[u8]) -> ColorImage<'_> {
    ColorImage::new(width, height, 3, data).expect("valid RGB buffer")
}

#[test]
fn white_square_on_gray_is_located_exactly() {
    init_logging();
    let original = solid_rgb(200, 200, GRAY);
    let mut edited = original.clone();
    fill_rect(&mut edited, 200, 3, (20, 20, 30, 30), WHITE);

    let result = detect_edit_regions(
        rgb(200, 200, &original),
        rgb(200, 200, &edited),
        &EditDetectionOptions::pixel(),
    )
    .unwrap();

    assert_eq!(result.regions.len(), 1, "expected exactly one region");
    let r = &result.regions[0];
    assert_eq!((r.x, r.y), (20, 20));
    assert_eq!((r.x + r.width - 1, r.y + r.height - 1), (49, 49));
    assert_eq!(r.pixel_count, 900);
    assert_eq!((r.center_x, r.center_y), (34, 34));
    assert_eq!(r.avg_color_diff, 46.4);
    assert_eq!(r.significance, 42);
    assert_eq!(result.total_changed, 900);
    assert_eq!((result.image_width, result.image_height), (200, 200));

    let text = format_edit_regions_for_prompt(&result);
    assert!(text.contains(
        "  1. Region from (20, 20) to (49, 49), center: (34, 34), size: 30x30, 900 pixels changed, intensity: avg=46.4, max=46.4, significance: 42/100"
    ), "{text}");
}

#[test]
fn block_strategy_covers_the_same_square() {
    let original = solid_rgb(200, 200, GRAY);
    let mut edited = original.clone();
    fill_rect(&mut edited, 200, 3, (20, 20, 30, 30), WHITE);

    let result = EditDetector::default()
        .detect(rgb(200, 200, &original), rgb(200, 200, &edited))
        .unwrap();
    assert_eq!(result.regions.len(), 1);
    let r = &result.regions[0];
    assert!(r.x <= 20 && r.y <= 20, "block bbox starts at ({}, {})", r.x, r.y);
    assert!(r.x + r.width >= 50 && r.y + r.height >= 50);
    assert_eq!(r.x % 8, 0);
    assert!(r.pixel_count <= 900);
    // total_changed counts every pixel over threshold, not only kept blocks
    assert_eq!(result.total_changed, 900);
}

#[test]
fn disjoint_squares_are_separate_and_ranked() {
    let original = solid_rgb(200, 200, GRAY);
    let mut edited = original.clone();
    fill_rect(&mut edited, 200, 3, (10, 10, 20, 20), WHITE);
    fill_rect(&mut edited, 200, 3, (100, 100, 60, 60), BLACK);

    let result = detect_edit_regions(
        rgb(200, 200, &original),
        rgb(200, 200, &edited),
        &EditDetectionOptions::pixel(),
    )
    .unwrap();
    assert_eq!(result.regions.len(), 2);
    assert_eq!((result.regions[0].x, result.regions[0].width), (100, 60));
    assert_eq!((result.regions[1].x, result.regions[1].width), (10, 20));
    for pair in result.regions.windows(2) {
        assert!(pair[0].significance >= pair[1].significance);
    }
    for r in &result.regions {
        assert!(r.significance <= 100);
    }
}

#[test]
fn two_small_squares_far_apart_are_two_regions() {
    let original = solid_rgb(100, 100, GRAY);
    let mut edited = original.clone();
    fill_rect(&mut edited, 100, 3, (10, 10, 10, 10), WHITE);
    fill_rect(&mut edited, 100, 3, (70, 70, 10, 10), WHITE);

    for options in [EditDetectionOptions::pixel(), EditDetectionOptions::default()] {
        let result =
            detect_edit_regions(rgb(100, 100, &original), rgb(100, 100, &edited), &options).unwrap();
        assert_eq!(result.regions.len(), 2, "{:?}", options.strategy);
        let mut xs: Vec<usize> = result.regions.iter().map(|r| r.x).collect();
        xs.sort_unstable();
        assert!(xs[0] <= 10 && xs[1] >= 64, "{:?}: {xs:?}", options.strategy);
        assert_eq!(result.total_changed, 200);
    }
}

#[test]
fn l_shaped_edit_is_a_single_region() {
    let original = solid_rgb(100, 100, GRAY);
    let mut edited = original.clone();
    fill_rect(&mut edited, 100, 3, (10, 10, 10, 50), WHITE);
    fill_rect(&mut edited, 100, 3, (10, 50, 50, 10), WHITE);

    for options in [EditDetectionOptions::pixel(), EditDetectionOptions::default()] {
        let result =
            detect_edit_regions(rgb(100, 100, &original), rgb(100, 100, &edited), &options).unwrap();
        assert_eq!(result.regions.len(), 1, "{:?}", options.strategy);
    }
}

#[test]
fn identical_images_have_no_regions_in_either_pipeline() {
    let img = textured_rgb(128, 128);

    let det = detect_edit_regions(rgb(128, 128, &img), rgb(128, 128, &img), &EditDetectionOptions::default())
        .unwrap();
    assert!(det.regions.is_empty());
    assert_eq!(det.total_changed, 0);
    assert_eq!(format_edit_regions_for_prompt(&det), NO_CHANGES_SENTINEL);

    let perceptual = PerceptualDetector::new(PerceptualDetectionOptions::default())
        .detect(rgb(128, 128, &img), rgb(128, 128, &img))
        .unwrap();
    assert!(perceptual.regions.is_empty());
    assert_eq!(format_edit_regions_for_prompt(&perceptual), NO_CHANGES_SENTINEL);
}

#[test]
fn constant_colors_give_uniform_delta_e() {
    let a = solid_rgb(16, 9, [200, 30, 40]);
    let b = solid_rgb(16, 9, [20, 160, 90]);
    let field = EditDetector::default().change_field(rgb(16, 9, &a), rgb(16, 9, &b));
    let first = field.data[0];
    assert!(first > 50.0);
    assert!(field.data.iter().all(|&v| v == first));
}

#[test]
fn black_against_white_is_about_one_hundred() {
    let a = solid_rgb(4, 4, BLACK);
    let b = solid_rgb(4, 4, WHITE);
    let field = EditDetector::default().change_field(rgb(4, 4, &a), rgb(4, 4, &b));
    assert!((field.data[0] - 100.0).abs() < 10.0, "delta-e {}", field.data[0]);
}

#[test]
fn mismatched_sizes_report_original_dimensions() {
    let original = solid_rgb(100, 80, GRAY);
    let mut edited = solid_rgb(200, 160, GRAY);
    fill_rect(&mut edited, 200, 3, (40, 40, 60, 60), WHITE);

    let report = EditDetector::new(EditDetectionOptions::pixel())
        .detect_with_diagnostics(rgb(100, 80, &original), rgb(200, 160, &edited))
        .unwrap();
    assert_eq!((report.result.image_width, report.result.image_height), (100, 80));
    assert!(report.trace.input.resampled);
    assert_eq!((report.trace.input.edited_width, report.trace.input.edited_height), (200, 160));
    let r = &report.result.regions[0];
    // the 60px square halves to roughly 30px at (20, 20)
    assert!(r.x >= 18 && r.x <= 21, "x = {}", r.x);
    assert!(r.width >= 29 && r.width <= 33, "width = {}", r.width);
}

#[test]
fn perceptual_mismatched_sizes_report_original_dimensions() {
    let original = textured_rgb(128, 96);
    let edited = textured_rgb(256, 192);

    let report = PerceptualDetector::new(PerceptualDetectionOptions::default())
        .detect_with_diagnostics(rgb(128, 96, &original), rgb(256, 192, &edited))
        .unwrap();
    assert_eq!((report.result.image_width, report.result.image_height), (128, 96));
    assert!(report.trace.input.resampled);
    assert_eq!((report.trace.input.edited_width, report.trace.input.edited_height), (256, 192));
    assert_eq!((report.field.w, report.field.h), (128, 96));
    for r in &report.result.regions {
        let (x, y, w, h) = r.bounding_box;
        assert!(x >= 0 && y >= 0 && x + w <= 128 && y + h <= 96, "{:?}", r.bounding_box);
    }
}

#[test]
fn alpha_channel_is_ignored() {
    let original = solid_rgb(64, 64, GRAY);
    let mut edited_rgb = original.clone();
    fill_rect(&mut edited_rgb, 64, 3, (8, 8, 16, 16), WHITE);
    let mut edited_rgba = solid_rgba(64, 64, [128, 128, 128, 7]);
    fill_rect(&mut edited_rgba, 64, 4, (8, 8, 16, 16), WHITE);

    let options = EditDetectionOptions::pixel();
    let from_rgb = detect_edit_regions(rgb(64, 64, &original), rgb(64, 64, &edited_rgb), &options).unwrap();
    let from_rgba = detect_edit_regions(
        rgb(64, 64, &original),
        ColorImage::new(64, 64, 4, &edited_rgba).unwrap(),
        &options,
    )
    .unwrap();
    assert_eq!(from_rgb, from_rgba);
}

#[test]
fn malformed_inputs_are_rejected() {
    let data = vec![0u8; 10 * 10 * 2];
    let err = ColorImage::from_shape(&[10, 10, 2], &data).unwrap_err();
    assert!(matches!(err, DetectionError::InvalidShape { .. }));
    assert!(err.to_string().contains("[10, 10, 2]"), "{err}");

    let gray = vec![0u8; 100];
    assert!(matches!(
        ColorImage::from_shape(&[10, 10], &gray),
        Err(DetectionError::InvalidShape { .. })
    ));
    assert!(matches!(
        ColorImage::new(10, 10, 3, &gray),
        Err(DetectionError::BufferSize { .. })
    ));
}

#[test]
fn perceptual_returns_empty_result_for_undersized_input() {
    let a = solid_rgb(50, 40, GRAY);
    let b = solid_rgb(50, 40, WHITE);
    let detector = PerceptualDetector::new(PerceptualDetectionOptions::default());

    let result = detector.detect(rgb(50, 40, &a), rgb(50, 40, &b)).unwrap();
    assert!(result.regions.is_empty());
    assert_eq!((result.image_width, result.image_height), (50, 40));

    let heatmap = detector.heatmap(rgb(50, 40, &a), rgb(50, 40, &b)).unwrap();
    assert_eq!((heatmap.field.w, heatmap.field.h), (50, 40));
    assert!(heatmap.field.data.iter().all(|&v| v == 0.0));
}

#[test]
fn perceptual_finds_a_pasted_patch() {
    init_logging();
    let (w, h) = (256usize, 256usize);
    let original = textured_rgb(w, h);
    let mut edited = original.clone();
    fill_rect(&mut edited, w, 3, (96, 96, 64, 64), BLACK);

    let report = PerceptualDetector::new(PerceptualDetectionOptions::default())
        .detect_with_diagnostics(rgb(w, h, &original), rgb(w, h, &edited))
        .unwrap();
    let result = &report.result;
    assert_eq!(report.trace.patch_samples, Some(49));
    assert!(!result.regions.is_empty(), "trace: {}", report.trace.summary());

    let top = &result.regions[0];
    let (x, y, bw, bh) = top.bounding_box;
    assert!(x <= 128 && x + bw > 128 && y <= 128 && y + bh > 128, "{:?}", top.bounding_box);
    assert!(top.significance > 10.0 && top.significance <= 100.0);
    for pair in result.regions.windows(2) {
        assert!(pair[0].significance >= pair[1].significance);
    }
    assert_eq!(result.total_changed, result.regions.iter().map(|r| r.area).sum::<usize>());

    let text = format_edit_regions_for_prompt(result);
    assert!(text.starts_with("DETECTED EDIT LOCATIONS (by perceptual difference, sorted by significance):\n"));
    assert_eq!(text.lines().count(), result.regions.len() + 4);
}

#[test]
fn shared_perceptual_detector_is_deterministic_across_threads() {
    let (w, h) = (192usize, 128usize);
    let original = Arc::new(textured_rgb(w, h));
    let mut edited = (*original).clone();
    fill_rect(&mut edited, w, 3, (70, 30, 50, 50), WHITE);
    let edited = Arc::new(edited);
    let detector = Arc::new(PerceptualDetector::new(PerceptualDetectionOptions::default()));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let (detector, original, edited) =
                (Arc::clone(&detector), Arc::clone(&original), Arc::clone(&edited));
            thread::spawn(move || {
                detector
                    .detect(
                        ColorImage::new(w, h, 3, &original).unwrap(),
                        ColorImage::new(w, h, 3, &edited).unwrap(),
                    )
                    .unwrap()
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results[0], results[1]);
    assert!(detector.scorer().is_initialized());
}

#[test]
fn formatter_output_is_stable() {
    let original = solid_rgb(120, 120, GRAY);
    let mut edited = original.clone();
    fill_rect(&mut edited, 120, 3, (5, 5, 20, 20), WHITE);
    fill_rect(&mut edited, 120, 3, (60, 70, 30, 15), BLACK);

    let options = EditDetectionOptions::pixel();
    let a = detect_edit_regions(rgb(120, 120, &original), rgb(120, 120, &edited), &options).unwrap();
    let b = detect_edit_regions(rgb(120, 120, &original), rgb(120, 120, &edited), &options).unwrap();
    let text = format_edit_regions_for_prompt(&a);
    assert_eq!(text, format_edit_regions_for_prompt(&b));
    assert_eq!(text.lines().count(), a.regions.len() + 4);
    assert!(text.ends_with("Image dimensions: 120x120"));
    assert_eq!(text.lines().nth(a.regions.len() + 1), Some(""));
}
