//! Comparison engine for simulation regression checks
//!
//! Two independent comparators: the header-and-image comparator, which diffs
//! metadata and pixel data and enforces a difference-count tolerance, and the
//! raw-array comparator, which reports aggregate difference statistics
//! without a verdict.

mod image;
mod output;
mod raw;
mod stats;

#[cfg(test)]
mod tests;

pub use image::{compare_images, flat_to_coordinate, run_image_comparison, DEFAULT_TOLERANCE};
pub use output::{print_image_report, print_raw_report};
pub use raw::{compare_raw_arrays, run_raw_comparison};
pub use stats::diff_stats;

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

/// One recorded pixel discrepancy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelDiff {
    /// Flat index into the pixel array
    pub index: usize,

    /// Slow-axis coordinate (index / row width)
    pub slow: usize,

    /// Fast-axis coordinate (index % row width)
    pub fast: usize,

    /// Signed difference, test minus reference
    pub delta: i64,
}

/// Header diagnostic: a key whose value differs between the two images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMismatch {
    pub key: String,
    pub reference: String,
    pub test: String,
}

/// Result of a header-and-image comparison
#[derive(Debug, Clone)]
pub struct ImageComparison {
    /// Whether the two header records were equal in full
    pub header_identical: bool,

    /// Reference keys absent from the test header. Diagnostics are computed
    /// relative to the reference key set only; keys present only in the test
    /// header are not reported.
    pub missing_keys: Vec<String>,

    /// Reference keys whose value differs in the test header
    pub value_mismatches: Vec<HeaderMismatch>,

    /// Total samples compared
    pub sample_count: usize,

    /// Number of samples that differ
    pub diff_count: usize,

    /// The first differing samples, capped at the reporting limit
    pub first_diffs: Vec<PixelDiff>,
}

impl ImageComparison {
    /// Verdict: the difference count must be strictly below the tolerance
    pub fn passes(&self, tolerance: usize) -> bool {
        self.diff_count < tolerance
    }
}

/// Aggregate statistics of a signed difference array
#[derive(Debug, Clone, PartialEq)]
pub struct DiffStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

/// Result of a raw-array comparison. Purely informative: there is no verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct RawComparison {
    /// Total elements compared
    pub sample_count: usize,

    /// Number of elements that differ
    pub diff_count: usize,

    /// Difference statistics, present only when at least one element differs
    pub stats: Option<DiffStats>,
}

/// Failures a comparison can surface.
///
/// Header mismatches are never errors; they are diagnostics on the
/// comparison result.
#[derive(Debug)]
pub enum CompareError {
    /// A file could not be read or decoded
    Load { path: PathBuf, message: String },

    /// The two pixel arrays hold different numbers of samples. Fatal: the
    /// comparison cannot proceed, regardless of tolerance.
    SampleCountMismatch { reference: usize, test: usize },

    /// The two raw arrays have different shapes
    ShapeMismatch {
        reference: Vec<usize>,
        test: Vec<usize>,
    },

    /// The difference count reached the tolerance
    ToleranceExceeded { count: usize, tolerance: usize },
}

impl Display for CompareError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { path, message } => {
                write!(f, "failed to load '{}': {}", path.display(), message)
            }
            Self::SampleCountMismatch { reference, test } => write!(
                f,
                "sample count mismatch: reference holds {} samples, test holds {}",
                reference, test
            ),
            Self::ShapeMismatch { reference, test } => write!(
                f,
                "array shape mismatch: reference {:?}, test {:?}",
                reference, test
            ),
            Self::ToleranceExceeded { count, tolerance } => write!(
                f,
                "there are {} differences (tolerance {})",
                count, tolerance
            ),
        }
    }
}

impl Error for CompareError {}
