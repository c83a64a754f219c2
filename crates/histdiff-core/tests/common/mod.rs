//! Shared utilities for integration tests

use histdiff_core::InMemorySource;

/// Rows for a handful of wells with two features, the second always missing
pub fn sparse_rows() -> Vec<(String, Vec<f64>)> {
    let wells = ["A1", "A2", "B1", "Z99"];
    (0..40)
        .map(|i| {
            let well = wells[i % wells.len()].to_string();
            (well, vec![i as f64 * 0.5, f64::NAN])
        })
        .collect()
}

/// Build an in-memory source over `sparse_rows`
pub fn sparse_source(chunk_size: usize) -> InMemorySource {
    InMemorySource::new(&["area", "empty"], sparse_rows(), chunk_size).unwrap()
}
