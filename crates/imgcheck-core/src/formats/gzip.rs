//! Gzip-wrapped detector images
//!
//! Simulation outputs are often stored compressed. This loader recognizes the
//! gzip magic, decompresses the stream in memory, and hands the result to the
//! SMV codec.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use super::smv;
use super::{ImageLoader, StructuredImage};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub(crate) struct GzipLoader;

impl ImageLoader for GzipLoader {
    fn name(&self) -> &'static str {
        "smv+gzip"
    }

    fn can_load(&self, leading: &[u8]) -> bool {
        leading.starts_with(&GZIP_MAGIC)
    }

    fn load(&self, path: &Path) -> Result<StructuredImage, String> {
        let file =
            File::open(path).map_err(|e| format!("Failed to open image file: {}", e))?;
        let mut decoder = GzDecoder::new(BufReader::new(file));
        let mut bytes = Vec::new();
        decoder
            .read_to_end(&mut bytes)
            .map_err(|e| format!("Failed to decompress image: {}", e))?;

        smv::parse_smv(&bytes)
    }
}
