//! Raw-array comparator
//!
//! Statistics only: the caller interprets the printed numbers. There is no
//! tolerance and no verdict.

use std::path::Path;

use super::output::print_raw_report;
use super::stats::diff_stats;
use super::{CompareError, RawComparison};
use crate::raw_array::RawArray;

/// Diff two loaded arrays element-wise. Shapes must match; the statistics
/// cover the full signed difference array, zeros included.
pub fn compare_raw_arrays(
    reference: &RawArray,
    test: &RawArray,
) -> Result<RawComparison, CompareError> {
    if test.shape != reference.shape {
        return Err(CompareError::ShapeMismatch {
            reference: reference.shape.clone(),
            test: test.shape.clone(),
        });
    }

    let mut deltas = Vec::with_capacity(reference.data.len());
    let mut diff_count = 0usize;
    for (r, t) in reference.data.iter().zip(test.data.iter()) {
        let delta = t - r;
        if delta != 0.0 {
            diff_count += 1;
        }
        deltas.push(delta);
    }

    let stats = if diff_count == 0 {
        None
    } else {
        Some(diff_stats(&deltas))
    };

    Ok(RawComparison {
        sample_count: reference.data.len(),
        diff_count,
        stats,
    })
}

/// Compare two serialized arrays by path and print the statistics block
pub fn run_raw_comparison<P: AsRef<Path>>(
    reference: P,
    test: P,
) -> Result<RawComparison, CompareError> {
    let reference = reference.as_ref();
    let test = test.as_ref();

    let reference_array = RawArray::load(reference).map_err(|message| CompareError::Load {
        path: reference.to_path_buf(),
        message,
    })?;
    let test_array = RawArray::load(test).map_err(|message| CompareError::Load {
        path: test.to_path_buf(),
        message,
    })?;

    println!(
        "\nComparing raw image: '{}' with the reference: '{}'",
        test.display(),
        reference.display()
    );

    let comparison = compare_raw_arrays(&reference_array, &test_array)?;
    print_raw_report(&comparison);

    Ok(comparison)
}
