//! Utility functions and helpers for esdump.
//!
//! This module provides common utility functions used throughout the
//! application:
//! - Chunk file naming
//! - File system helpers

use std::path::Path;

use crate::error::Result;

/// Chunk naming utilities.
pub mod chunk {
    /// Name of the temporary JSON file for a chunk sequence number.
    ///
    /// Sequence numbers are 1-based and zero-padded to six digits so
    /// lexicographic order matches numeric order.
    pub fn json_name(seq: u32) -> String {
        format!("data_{seq:06}.json")
    }

    /// Name of the compressed archive for a chunk sequence number.
    pub fn archive_name(seq: u32) -> String {
        format!("data_{seq:06}.zip")
    }
}

/// File system helpers.
pub mod fs {
    use super::*;

    /// Create a directory (and parents) if it does not exist.
    pub fn ensure_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_names_are_zero_padded() {
        assert_eq!(chunk::json_name(1), "data_000001.json");
        assert_eq!(chunk::archive_name(42), "data_000042.zip");
        assert_eq!(chunk::archive_name(123456), "data_123456.zip");
    }

    #[test]
    fn test_chunk_names_sort_numerically() {
        let mut names: Vec<String> = [10, 2, 1, 100].iter().map(|&n| chunk::archive_name(n)).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "data_000001.zip",
                "data_000002.zip",
                "data_000010.zip",
                "data_000100.zip"
            ]
        );
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("b");
        fs::ensure_dir(&target).unwrap();
        fs::ensure_dir(&target).unwrap();
        assert!(target.is_dir());
    }
}
