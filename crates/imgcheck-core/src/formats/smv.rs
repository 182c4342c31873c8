//! SMV-style detector image codec
//!
//! The format is self-describing: an ASCII header block `{ KEY=VALUE; ... }`
//! padded to `HEADER_BYTES`, followed by binary samples. `SIZE1` is the slow
//! axis, `SIZE2` the fast axis; `TYPE` and `BYTE_ORDER` describe the sample
//! encoding.

use std::path::Path;

use super::{ImageLoader, StructuredImage};
use crate::models::{Beam, Detector, Goniometer, HeaderRecord, Scan};

/// Header length assumed when the header does not state its own size
const DEFAULT_HEADER_BYTES: usize = 512;

/// How far into the file the opening brace may sit
const MAX_LEADING_PAD: usize = 64;

pub(crate) struct SmvLoader;

impl ImageLoader for SmvLoader {
    fn name(&self) -> &'static str {
        "smv"
    }

    fn can_load(&self, leading: &[u8]) -> bool {
        leading
            .iter()
            .find(|b| !b.is_ascii_whitespace())
            .is_some_and(|b| *b == b'{')
    }

    fn load(&self, path: &Path) -> Result<StructuredImage, String> {
        let bytes =
            std::fs::read(path).map_err(|e| format!("Failed to read image file: {}", e))?;
        parse_smv(&bytes)
    }
}

/// Decode an SMV image from raw file bytes
pub(crate) fn parse_smv(bytes: &[u8]) -> Result<StructuredImage, String> {
    let header = parse_header(bytes)?;

    let slow = header
        .get_usize("SIZE1")
        .ok_or_else(|| "Image header lacks SIZE1".to_string())?;
    let fast = header
        .get_usize("SIZE2")
        .ok_or_else(|| "Image header lacks SIZE2".to_string())?;

    let data_offset = header
        .get_usize("HEADER_BYTES")
        .unwrap_or(DEFAULT_HEADER_BYTES);
    if data_offset > bytes.len() {
        return Err(format!(
            "Header claims {} header bytes but the file holds only {}",
            data_offset,
            bytes.len()
        ));
    }

    let sample_type = header.get("TYPE").unwrap_or("unsigned_short");
    let big_endian = match header.get("BYTE_ORDER").unwrap_or("little_endian") {
        "little_endian" => false,
        "big_endian" => true,
        other => return Err(format!("Unsupported byte order: {}", other)),
    };

    let data = decode_samples(&bytes[data_offset..], slow * fast, sample_type, big_endian)?;

    Ok(StructuredImage {
        beam: Beam::from_header(&header),
        detector: Detector::from_header(&header),
        goniometer: Goniometer::from_header(&header),
        scan: Scan::from_header(&header),
        header,
        data,
        row_width: fast,
    })
}

/// Parse the ASCII `{ KEY=VALUE; ... }` block at the start of the file
fn parse_header(bytes: &[u8]) -> Result<HeaderRecord, String> {
    let probe = &bytes[..bytes.len().min(MAX_LEADING_PAD)];
    let open = probe
        .iter()
        .position(|b| *b == b'{')
        .ok_or_else(|| "Image header lacks an opening brace".to_string())?;
    let close = bytes[open..]
        .iter()
        .position(|b| *b == b'}')
        .map(|i| open + i)
        .ok_or_else(|| "Image header lacks a closing brace".to_string())?;

    let text = std::str::from_utf8(&bytes[open + 1..close])
        .map_err(|e| format!("Image header is not ASCII: {}", e))?;

    let mut header = HeaderRecord::new();
    for entry in text.split(';') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| format!("Malformed header entry: '{}'", entry))?;
        header.insert(key.trim(), value.trim());
    }

    Ok(header)
}

/// Decode `count` binary samples according to the header's TYPE / BYTE_ORDER
fn decode_samples(
    bytes: &[u8],
    count: usize,
    sample_type: &str,
    big_endian: bool,
) -> Result<Vec<i32>, String> {
    let width = match sample_type {
        "unsigned_short" => 2,
        "signed_int" | "long" => 4,
        other => return Err(format!("Unsupported sample type: {}", other)),
    };

    let expected = count * width;
    if bytes.len() < expected {
        return Err(format!(
            "Data section truncated: expected {} bytes for {} samples, got {}",
            expected,
            count,
            bytes.len()
        ));
    }

    let data = match width {
        2 => bytes[..expected]
            .chunks_exact(2)
            .map(|c| {
                let raw = [c[0], c[1]];
                let v = if big_endian {
                    u16::from_be_bytes(raw)
                } else {
                    u16::from_le_bytes(raw)
                };
                i32::from(v)
            })
            .collect(),
        _ => bytes[..expected]
            .chunks_exact(4)
            .map(|c| {
                let raw = [c[0], c[1], c[2], c[3]];
                if big_endian {
                    i32::from_be_bytes(raw)
                } else {
                    i32::from_le_bytes(raw)
                }
            })
            .collect(),
    };

    Ok(data)
}
