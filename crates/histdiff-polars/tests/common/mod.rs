//! Common test utilities for histdiff-polars tests

#![allow(dead_code)]

use polars::prelude::*;

/// Cells of the reference example: control `V1` and treated `A1`
pub fn reference_cells() -> DataFrame {
    df![
        "well" => ["V1", "A1", "V1", "A1", "V1", "A1", "V1", "A1"],
        "Cells_Area" => [1.0, 1.0, 1.0, 1.0, 9.0, 1.0, 9.0, 1.0],
        "Nuclei_Count" => [Some(2i64), None, Some(2), None, Some(2), None, Some(2), None],
    ]
    .unwrap()
}

/// Extract a single value from a score frame
pub fn score(df: &DataFrame, well: &str, feature: &str) -> f64 {
    let ids = df.column("id").unwrap().str().unwrap();
    let row = ids
        .into_iter()
        .position(|id| id == Some(well))
        .unwrap();
    df.column(feature).unwrap().f64().unwrap().get(row).unwrap()
}
