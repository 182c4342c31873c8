//! Tests for the comparison engine

use super::*;
use crate::formats::StructuredImage;
use crate::models::{Beam, Detector, Goniometer, HeaderRecord, Scan};
use crate::raw_array::RawArray;

fn make_header(pairs: &[(&str, &str)]) -> HeaderRecord {
    let mut header = HeaderRecord::new();
    for (key, value) in pairs {
        header.insert(*key, *value);
    }
    header
}

fn make_image_with_header(header: HeaderRecord, data: Vec<i32>, row_width: usize) -> StructuredImage {
    StructuredImage {
        beam: Beam::from_header(&header),
        detector: Detector::from_header(&header),
        goniometer: Goniometer::from_header(&header),
        scan: Scan::from_header(&header),
        header,
        data,
        row_width,
    }
}

fn make_image(data: Vec<i32>, row_width: usize) -> StructuredImage {
    let size2 = row_width.to_string();
    let header = make_header(&[
        ("TYPE", "unsigned_short"),
        ("SIZE1", "1"),
        ("SIZE2", size2.as_str()),
    ]);
    make_image_with_header(header, data, row_width)
}

/// Write a minimal on-disk image fixture for the path-level entry points
fn write_smv(dir: &tempfile::TempDir, name: &str, size2: usize, data: &[u16]) -> std::path::PathBuf {
    assert_eq!(data.len() % size2, 0);
    let mut head = format!(
        "{{\nHEADER_BYTES=512;\nBYTE_ORDER=little_endian;\nTYPE=unsigned_short;\nSIZE1={};\nSIZE2={};\n}}\n",
        data.len() / size2,
        size2
    );
    head.push('\0');
    let mut bytes = head.into_bytes();
    bytes.resize(512, b' ');
    for value in data {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("fixture should be written");
    path
}

// ========================================================================
// Header-and-image comparator
// ========================================================================

#[test]
fn test_identical_images_pass_with_zero_differences() {
    let reference = make_image(vec![4, 5, 6, 7], 2);
    let test = make_image(vec![4, 5, 6, 7], 2);

    let comparison = compare_images(&reference, &test).expect("comparison should run");

    assert!(comparison.header_identical);
    assert_eq!(comparison.diff_count, 0);
    assert!(comparison.first_diffs.is_empty());
    assert!(comparison.passes(DEFAULT_TOLERANCE));
    assert!(comparison.passes(1));
}

#[test]
fn test_diff_count_against_tolerance_is_strict() {
    let reference = make_image(vec![0; 10], 5);
    let mut data = vec![0; 10];
    data[1] = 3;
    data[4] = 1;
    data[9] = 7;
    let test = make_image(data, 5);

    let comparison = compare_images(&reference, &test).expect("comparison should run");

    assert_eq!(comparison.diff_count, 3);
    assert!(comparison.passes(4));
    // count == tolerance must fail: the bound is exclusive
    assert!(!comparison.passes(3));
}

#[test]
fn test_recorded_diffs_carry_signed_delta_and_coordinates() {
    let reference = make_image(vec![10, 10, 10, 10, 10, 10], 3);
    let mut data = vec![10, 10, 10, 10, 10, 10];
    data[1] = 12;
    data[4] = 7;
    let test = make_image(data, 3);

    let comparison = compare_images(&reference, &test).expect("comparison should run");

    assert_eq!(comparison.diff_count, 2);
    assert_eq!(
        comparison.first_diffs,
        vec![
            PixelDiff {
                index: 1,
                slow: 0,
                fast: 1,
                delta: 2
            },
            PixelDiff {
                index: 4,
                slow: 1,
                fast: 1,
                delta: -3
            },
        ]
    );
}

#[test]
fn test_recorded_diffs_capped_at_200() {
    let reference = make_image(vec![0; 250], 25);
    let test = make_image(vec![1; 250], 25);

    let comparison = compare_images(&reference, &test).expect("comparison should run");

    assert_eq!(comparison.diff_count, 250);
    assert_eq!(comparison.first_diffs.len(), 200);
    assert_eq!(comparison.first_diffs[199].index, 199);
}

#[test]
fn test_flat_to_coordinate_at_row_width_3000() {
    assert_eq!(flat_to_coordinate(0, 3000), (0, 0));
    assert_eq!(flat_to_coordinate(2999, 3000), (0, 2999));
    assert_eq!(flat_to_coordinate(3000, 3000), (1, 0));
    assert_eq!(flat_to_coordinate(5_999_999, 3000), (1999, 2999));
}

#[test]
fn test_sample_count_mismatch_is_fatal() {
    let reference = make_image(vec![0, 1, 2, 3], 2);
    let test = make_image(vec![0, 1, 2], 3);

    let err = compare_images(&reference, &test).expect_err("length mismatch should fail");
    match err {
        CompareError::SampleCountMismatch { reference, test } => {
            assert_eq!(reference, 4);
            assert_eq!(test, 3);
        }
        other => panic!("expected SampleCountMismatch, got {:?}", other),
    }
}

#[test]
fn test_header_diagnostics_are_reference_keyed() {
    let reference_header = make_header(&[("ALPHA", "1"), ("BETA", "2"), ("GAMMA", "3")]);
    // BETA differs, GAMMA is absent, DELTA exists only here
    let test_header = make_header(&[("ALPHA", "1"), ("BETA", "9"), ("DELTA", "7")]);

    let reference = make_image_with_header(reference_header, vec![0], 1);
    let test = make_image_with_header(test_header, vec![0], 1);

    let comparison = compare_images(&reference, &test).expect("comparison should run");

    assert!(!comparison.header_identical);
    assert_eq!(comparison.missing_keys, vec!["GAMMA".to_string()]);
    assert_eq!(
        comparison.value_mismatches,
        vec![HeaderMismatch {
            key: "BETA".to_string(),
            reference: "2".to_string(),
            test: "9".to_string(),
        }]
    );
    // the test-only key DELTA produced no diagnostic
    assert!(!comparison
        .missing_keys
        .iter()
        .chain(comparison.value_mismatches.iter().map(|m| &m.key))
        .any(|k| k == "DELTA"));
    // header diagnostics never affect the verdict
    assert!(comparison.passes(DEFAULT_TOLERANCE));
}

#[test]
fn test_test_only_keys_break_identity_without_diagnostics() {
    let reference = make_image_with_header(make_header(&[("ALPHA", "1")]), vec![0], 1);
    let test = make_image_with_header(
        make_header(&[("ALPHA", "1"), ("EXTRA", "2")]),
        vec![0],
        1,
    );

    let comparison = compare_images(&reference, &test).expect("comparison should run");

    assert!(!comparison.header_identical);
    assert!(comparison.missing_keys.is_empty());
    assert!(comparison.value_mismatches.is_empty());
}

#[test]
fn test_run_image_comparison_verdict_from_files() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let reference = write_smv(&dir, "reference.img", 2, &[5, 5, 5, 5]);
    let test = write_smv(&dir, "test.img", 2, &[5, 6, 5, 4]);

    // two differing samples, tolerance 10: passes
    let comparison =
        run_image_comparison(&reference, &test, 10).expect("within tolerance should pass");
    assert_eq!(comparison.diff_count, 2);

    // tolerance 2: the count is no longer strictly below the bound
    let err = run_image_comparison(&reference, &test, 2)
        .expect_err("at tolerance should fail");
    match &err {
        CompareError::ToleranceExceeded { count, tolerance } => {
            assert_eq!(*count, 2);
            assert_eq!(*tolerance, 2);
        }
        other => panic!("expected ToleranceExceeded, got {:?}", other),
    }
    // the failure message carries the actual count
    assert!(err.to_string().contains("2 differences"), "got: {}", err);
}

#[test]
fn test_run_image_comparison_missing_file_is_a_load_error() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let reference = write_smv(&dir, "reference.img", 1, &[1]);
    let missing = dir.path().join("nope.img");

    let err = run_image_comparison(&reference, &missing, 10)
        .expect_err("missing file should fail");
    assert!(matches!(err, CompareError::Load { .. }), "got {:?}", err);
}

// ========================================================================
// Raw-array comparator
// ========================================================================

#[test]
fn test_raw_identical_arrays_report_zero_differences() {
    let reference = RawArray {
        shape: vec![2, 2],
        data: vec![1.5, 2.5, 3.5, 4.5],
    };
    let test = reference.clone();

    let comparison =
        compare_raw_arrays(&reference, &test).expect("comparison should run");

    assert_eq!(comparison.diff_count, 0);
    assert!(comparison.stats.is_none());
}

#[test]
fn test_raw_constant_offset_collapses_the_statistics() {
    let reference = RawArray {
        shape: vec![4],
        data: vec![1.0, 2.0, 3.0, 4.0],
    };
    let test = RawArray {
        shape: vec![4],
        data: vec![3.5, 4.5, 5.5, 6.5],
    };

    let comparison =
        compare_raw_arrays(&reference, &test).expect("comparison should run");

    assert_eq!(comparison.diff_count, 4);
    let stats = comparison.stats.expect("differences should produce stats");
    assert_eq!(stats.min, 2.5);
    assert_eq!(stats.max, 2.5);
    assert_eq!(stats.mean, 2.5);
    assert_eq!(stats.std_dev, 0.0);
}

#[test]
fn test_raw_statistics_cover_equal_elements_too() {
    // reference [[0,1],[2,3]] vs test [[0,1],[2,5]]: deltas are [0,0,0,2]
    let reference = RawArray {
        shape: vec![2, 2],
        data: vec![0.0, 1.0, 2.0, 3.0],
    };
    let test = RawArray {
        shape: vec![2, 2],
        data: vec![0.0, 1.0, 2.0, 5.0],
    };

    let comparison =
        compare_raw_arrays(&reference, &test).expect("comparison should run");

    assert_eq!(comparison.diff_count, 1);
    let stats = comparison.stats.expect("differences should produce stats");
    assert_eq!(stats.min, 0.0);
    assert_eq!(stats.max, 2.0);
    assert_eq!(stats.mean, 0.5);
    // population std of [0, 0, 0, 2]
    assert!((stats.std_dev - 0.75f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_raw_shape_mismatch_is_fatal() {
    let reference = RawArray {
        shape: vec![2, 2],
        data: vec![0.0; 4],
    };
    let test = RawArray {
        shape: vec![4],
        data: vec![0.0; 4],
    };

    let err =
        compare_raw_arrays(&reference, &test).expect_err("shape mismatch should fail");
    match err {
        CompareError::ShapeMismatch { reference, test } => {
            assert_eq!(reference, vec![2, 2]);
            assert_eq!(test, vec![4]);
        }
        other => panic!("expected ShapeMismatch, got {:?}", other),
    }
}

#[test]
fn test_run_raw_comparison_from_files() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let reference_path = dir.path().join("reference.json");
    let test_path = dir.path().join("test.json");

    RawArray {
        shape: vec![3],
        data: vec![1.0, 2.0, 3.0],
    }
    .save(&reference_path)
    .expect("reference should save");
    RawArray {
        shape: vec![3],
        data: vec![1.0, 2.0, 4.0],
    }
    .save(&test_path)
    .expect("test should save");

    let comparison =
        run_raw_comparison(&reference_path, &test_path).expect("comparison should run");
    assert_eq!(comparison.diff_count, 1);
    assert_eq!(comparison.sample_count, 3);
}

// ========================================================================
// Statistics
// ========================================================================

#[test]
fn test_diff_stats_on_known_values() {
    let stats = diff_stats(&[-1.0, 0.0, 1.0, 4.0]);
    assert_eq!(stats.min, -1.0);
    assert_eq!(stats.max, 4.0);
    assert_eq!(stats.mean, 1.0);
    // population variance of [-1, 0, 1, 4] about mean 1 is (4+1+0+9)/4
    assert!((stats.std_dev - 3.5f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_diff_stats_on_empty_input() {
    let stats = diff_stats(&[]);
    assert_eq!(stats.min, 0.0);
    assert_eq!(stats.max, 0.0);
    assert_eq!(stats.mean, 0.0);
    assert_eq!(stats.std_dev, 0.0);
}
