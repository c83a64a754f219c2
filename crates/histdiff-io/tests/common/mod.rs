//! Shared helpers for io integration tests

#![allow(dead_code)]

use std::path::PathBuf;

/// A file in the temp directory removed on drop
pub struct TempFile {
    pub path: PathBuf,
}

impl TempFile {
    pub fn new(name: &str, contents: impl AsRef<[u8]>) -> Self {
        let path = std::env::temp_dir().join(format!(
            "histdiff_io_{}_{name}",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        Self { path }
    }

    pub fn empty(name: &str) -> Self {
        Self::new(name, "")
    }

    pub fn read(&self) -> String {
        std::fs::read_to_string(&self.path).unwrap()
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Cell-by-cell table for the reference example, tab separated
///
/// Control V1 holds values `[1, 1, 9, 9]`, well A01 holds `[1, 1, 1, 1]`.
/// A malformed row and a text row are mixed in and must be skipped.
pub const REFERENCE_TSV: &str = "\
id\tCells_Area\tNuclei_Empty
V1\t1\t
A01\t1\tNaN
V1\t1\t
A01\t1\t
this row\tis\tnot numeric
A01\t1\t
V1\t9\t
short
A01\t1\t
V1\t9\t
";
