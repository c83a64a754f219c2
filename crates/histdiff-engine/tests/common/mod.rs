//! Shared fixtures for engine integration tests

#![allow(dead_code)]

use histdiff_core::InMemorySource;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Build `(well, values)` rows from `(well, cells)` groups
pub fn rows(groups: &[(&str, &[f64])]) -> Vec<(String, Vec<f64>)> {
    groups
        .iter()
        .flat_map(|(well, cells)| cells.iter().map(move |&v| (well.to_string(), vec![v])))
        .collect()
}

/// Single-feature source named `F`
pub fn single_feature(groups: &[(&str, &[f64])], chunk_size: usize) -> InMemorySource {
    InMemorySource::new(&["F"], rows(groups), chunk_size).unwrap()
}

/// Reproducible random plate with a shifted treatment well
///
/// Controls sit in column 1, treated wells in column 2. Features: `low`,
/// `high`, `constant` and `missing`.
pub fn random_plate(seed: u64, cells_per_well: usize) -> Vec<(String, Vec<f64>)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut rows = Vec::new();
    for row in ['A', 'B', 'C', 'D'] {
        for col in 1..=2 {
            let well = format!("{row}{col}");
            let shift = if col == 2 { 2.0 } else { 0.0 };
            for _ in 0..cells_per_well {
                rows.push((
                    well.clone(),
                    vec![
                        rng.gen_range(0.0..10.0) + shift,
                        rng.gen_range(0.0..10.0) - shift,
                        3.0,
                        f64::NAN,
                    ],
                ));
            }
        }
    }
    rows
}

pub const RANDOM_FEATURES: [&str; 4] = ["low", "high", "constant", "missing"];

/// Deterministically shuffle rows
pub fn shuffled(mut rows: Vec<(String, Vec<f64>)>, seed: u64) -> Vec<(String, Vec<f64>)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for i in (1..rows.len()).rev() {
        let j = rng.gen_range(0..=i);
        rows.swap(i, j);
    }
    rows
}

/// Unique path in the system temp directory
pub fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("histdiff_engine_{}_{name}", std::process::id()))
}
