//! Report rendering for comparison results

use super::{ImageComparison, RawComparison};

/// Print the diagnostic report for a header-and-image comparison:
/// header diagnostics, the first differing samples with their derived
/// coordinates, and the total difference count.
pub fn print_image_report(comparison: &ImageComparison) {
    if comparison.header_identical {
        println!("Both headers identical");
    } else {
        for key in &comparison.missing_keys {
            println!("test header lacks key {}", key);
        }
        for mismatch in &comparison.value_mismatches {
            println!(
                "Key comparison: {} {} {}",
                mismatch.key, mismatch.reference, mismatch.test
            );
        }
    }

    for diff in &comparison.first_diffs {
        println!(
            "difference index {}:({},{}) {}",
            diff.index, diff.slow, diff.fast, diff.delta
        );
    }

    println!("There are {} differences", comparison.diff_count);
}

/// Print the statistics block for a raw-array comparison. Identical arrays
/// get the zero-difference message and nothing else.
pub fn print_raw_report(comparison: &RawComparison) {
    match &comparison.stats {
        None => println!("There are 0 differences\n"),
        Some(stats) => {
            println!(
                "\nThere are differences ranging from {:.2E} to {:.2E}",
                stats.min, stats.max
            );
            println!(
                "Mean difference: {:.2E}; standard deviation: {:.2E}\n",
                stats.mean, stats.std_dev
            );
        }
    }
}
