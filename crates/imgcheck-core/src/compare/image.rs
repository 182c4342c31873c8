//! Header-and-image comparator

use std::path::Path;

use super::output::print_image_report;
use super::{CompareError, HeaderMismatch, ImageComparison, PixelDiff};
use crate::formats::{load_image, StructuredImage};
use crate::models::HeaderRecord;
use crate::verbose_println;

/// Maximum number of differing samples recorded and printed individually
pub(crate) const MAX_REPORTED_DIFFS: usize = 200;

/// Default difference-count tolerance
pub const DEFAULT_TOLERANCE: usize = 10;

/// Map a flat pixel index to its (slow, fast) coordinate
pub fn flat_to_coordinate(index: usize, row_width: usize) -> (usize, usize) {
    (index / row_width, index % row_width)
}

/// Diff two loaded images: header diagnostics plus an element-wise pixel
/// scan. Never applies a tolerance; the only error is a fatal sample-count
/// mismatch.
pub fn compare_images(
    reference: &StructuredImage,
    test: &StructuredImage,
) -> Result<ImageComparison, CompareError> {
    let (header_identical, missing_keys, value_mismatches) =
        diff_headers(&reference.header, &test.header);

    if test.data.len() != reference.data.len() {
        return Err(CompareError::SampleCountMismatch {
            reference: reference.data.len(),
            test: test.data.len(),
        });
    }

    let row_width = test.row_width.max(1);
    let mut diff_count = 0usize;
    let mut first_diffs = Vec::new();

    for (index, (r, t)) in reference.data.iter().zip(test.data.iter()).enumerate() {
        let delta = i64::from(*t) - i64::from(*r);
        if delta != 0 {
            if diff_count < MAX_REPORTED_DIFFS {
                let (slow, fast) = flat_to_coordinate(index, row_width);
                first_diffs.push(PixelDiff {
                    index,
                    slow,
                    fast,
                    delta,
                });
            }
            diff_count += 1;
        }
    }

    Ok(ImageComparison {
        header_identical,
        missing_keys,
        value_mismatches,
        sample_count: reference.data.len(),
        diff_count,
        first_diffs,
    })
}

/// Compare two images by path, print the diagnostic report, and apply the
/// tolerance verdict: the comparison passes only when the difference count
/// is strictly below `tolerance`.
pub fn run_image_comparison<P: AsRef<Path>>(
    reference: P,
    test: P,
    tolerance: usize,
) -> Result<ImageComparison, CompareError> {
    let reference = reference.as_ref();
    let test = test.as_ref();

    println!("Comparing {} {}", reference.display(), test.display());

    let reference_image = load_image(reference).map_err(|message| CompareError::Load {
        path: reference.to_path_buf(),
        message,
    })?;
    let test_image = load_image(test).map_err(|message| CompareError::Load {
        path: test.to_path_buf(),
        message,
    })?;

    for image in [&reference_image, &test_image] {
        verbose_println!("{}", image.beam);
        verbose_println!("{}", image.goniometer);
        verbose_println!("{}", image.detector);
        verbose_println!("{}", image.scan);
    }

    let comparison = compare_images(&reference_image, &test_image)?;
    print_image_report(&comparison);

    if !comparison.passes(tolerance) {
        return Err(CompareError::ToleranceExceeded {
            count: comparison.diff_count,
            tolerance,
        });
    }

    Ok(comparison)
}

/// Header diagnostics, computed relative to the reference key set only.
/// A key present only in the test header produces no diagnostic.
fn diff_headers(
    reference: &HeaderRecord,
    test: &HeaderRecord,
) -> (bool, Vec<String>, Vec<HeaderMismatch>) {
    if reference == test {
        return (true, Vec::new(), Vec::new());
    }

    let mut missing_keys = Vec::new();
    let mut value_mismatches = Vec::new();

    for (key, reference_value) in reference.iter() {
        match test.get(key) {
            None => missing_keys.push(key.to_string()),
            Some(test_value) if test_value != reference_value => {
                value_mismatches.push(HeaderMismatch {
                    key: key.to_string(),
                    reference: reference_value.to_string(),
                    test: test_value.to_string(),
                });
            }
            Some(_) => {}
        }
    }

    (false, missing_keys, value_mismatches)
}
