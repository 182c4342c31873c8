//! Image loaders for structured detector images
//!
//! The concrete codec is chosen by inspecting file content, not the file
//! extension: each registered loader is asked in turn whether it recognizes
//! the leading bytes.

mod gzip;
mod smv;


use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::models::{Beam, Detector, Goniometer, HeaderRecord, Scan};
use crate::verbose_println;

/// A loaded detector image: metadata header, the instrument descriptors
/// derived from it, and the flat pixel data. Immutable after load.
#[derive(Debug, Clone)]
pub struct StructuredImage {
    /// Metadata header as written in the file
    pub header: HeaderRecord,

    /// Beam geometry derived from the header
    pub beam: Beam,

    /// Detector geometry derived from the header
    pub detector: Detector,

    /// Goniometer state derived from the header
    pub goniometer: Goniometer,

    /// Scan parameters derived from the header
    pub scan: Scan,

    /// Pixel samples in row-major order, slow axis first
    pub data: Vec<i32>,

    /// Fast-axis length, used to map a flat index to a (slow, fast)
    /// coordinate for diagnostics
    pub row_width: usize,
}

/// Capability interface for one concrete image codec.
///
/// `can_load` inspects the leading bytes of a file; `load` reads and decodes
/// the whole file. Loaders are stateless.
pub trait ImageLoader: Sync {
    /// Short codec name for diagnostics
    fn name(&self) -> &'static str;

    /// Whether the leading bytes look like this codec's format
    fn can_load(&self, leading: &[u8]) -> bool;

    /// Read and decode the file at `path`
    fn load(&self, path: &Path) -> Result<StructuredImage, String>;
}

/// Registered loaders, tried in order
const LOADERS: &[&dyn ImageLoader] = &[&gzip::GzipLoader, &smv::SmvLoader];

/// Number of leading bytes needed to identify any registered format
const DETECT_BYTES: usize = 8;

/// Load a structured detector image, auto-detecting the codec from content
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<StructuredImage, String> {
    let path = path.as_ref();

    let mut leading = [0u8; DETECT_BYTES];
    let read = {
        let mut file =
            File::open(path).map_err(|e| format!("Failed to open image file: {}", e))?;
        file.read(&mut leading)
            .map_err(|e| format!("Failed to read image file: {}", e))?
    };

    for loader in LOADERS {
        if loader.can_load(&leading[..read]) {
            verbose_println!("Loading {} as {}", path.display(), loader.name());
            return loader.load(path);
        }
    }

    Err(format!(
        "Unrecognized image format: {}",
        path.display()
    ))
}
