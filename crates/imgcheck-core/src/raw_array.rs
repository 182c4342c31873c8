//! Serialized raw numeric arrays
//!
//! A raw array carries no instrument metadata: just a shape and the flat
//! sample values, persisted as a JSON document.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A header-less numeric array of fixed shape. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArray {
    /// Dimension lengths, outermost first
    pub shape: Vec<usize>,

    /// Flat sample values in row-major order
    pub data: Vec<f64>,
}

impl RawArray {
    /// Load a raw array from a JSON file, enforcing that the data length
    /// matches the declared shape
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read array file: {}", e))?;
        let array: Self = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse array JSON: {}", e))?;
        array.validate()?;
        Ok(array)
    }

    /// Save a raw array to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize array: {}", e))?;
        std::fs::write(path.as_ref(), json)
            .map_err(|e| format!("Failed to write array file: {}", e))
    }

    /// Total number of elements implied by the shape
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array holds no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn validate(&self) -> Result<(), String> {
        let expected: usize = self.shape.iter().product();
        if self.data.len() != expected {
            return Err(format!(
                "Array length {} does not match shape {:?} (expected {} elements)",
                self.data.len(),
                self.shape,
                expected
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("array.json");

        let array = RawArray {
            shape: vec![2, 3],
            data: vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
        };
        array.save(&path).expect("array should save");

        let loaded = RawArray::load(&path).expect("array should load");
        assert_eq!(loaded, array);
    }

    #[test]
    fn test_load_rejects_shape_length_mismatch() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"shape": [2, 2], "data": [1.0, 2.0, 3.0]}"#)
            .expect("fixture should be written");

        let err = RawArray::load(&path).expect_err("mismatched shape should fail");
        assert!(err.contains("does not match shape"), "got: {}", err);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("garbage.json");
        std::fs::write(&path, "not json at all").expect("fixture should be written");

        let err = RawArray::load(&path).expect_err("malformed file should fail");
        assert!(err.contains("Failed to parse"), "got: {}", err);
    }
}
