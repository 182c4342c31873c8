//! Imgcheck Core Library
//!
//! Core functionality for validating simulated detector images against
//! reference outputs: format loading, element-wise comparison, and
//! diagnostic reporting.

pub mod compare;
pub mod config;
pub mod formats;
pub mod models;
pub mod raw_array;

// Re-export commonly used types
pub use compare::{
    CompareError, DiffStats, ImageComparison, PixelDiff, RawComparison,
};
pub use config::Config;
pub use formats::{load_image, StructuredImage};
pub use models::{Beam, Detector, Goniometer, HeaderRecord, Scan};
pub use raw_array::RawArray;
