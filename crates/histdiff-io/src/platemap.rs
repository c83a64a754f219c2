//! Plate maps: which wells exist and which are vehicle controls

use std::path::Path;

use histdiff_core::{canonical_well_label, PlateDefinition};
use tracing::{info, warn};

use crate::error::{column_index, Result};

/// Label marking a vehicle-control well in the reference column
pub const REFERENCE_LABEL: &str = "REFERENCE";

/// Wells listed in a plate map and the controls among them
#[derive(Debug, Clone, PartialEq)]
pub struct PlateMap {
    pub plate: PlateDefinition,
    pub controls: Vec<String>,
}

impl PlateMap {
    /// Read a comma-separated plate map
    ///
    /// Every value of `well_column` becomes part of the plate. Wells whose
    /// `reference_column` reads `REFERENCE` (any case) are the controls.
    pub fn from_csv(
        path: impl AsRef<Path>,
        well_column: &str,
        reference_column: &str,
    ) -> Result<Self> {
        Self::from_delimited(path, b',', well_column, reference_column)
    }

    /// Read a plate map with a custom delimiter
    pub fn from_delimited(
        path: impl AsRef<Path>,
        delimiter: u8,
        well_column: &str,
        reference_column: &str,
    ) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_path(path)?;
        let headers = reader.headers()?.clone();
        let well_idx = column_index(&headers, well_column)?;
        let ref_idx = column_index(&headers, reference_column)?;

        let mut wells = Vec::new();
        let mut controls = Vec::new();
        for record in reader.records() {
            let record = record?;
            let well = canonical_well_label(record.get(well_idx).unwrap_or(""));
            if well.is_empty() {
                continue;
            }
            let is_reference = record
                .get(ref_idx)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(REFERENCE_LABEL));
            if is_reference {
                controls.push(well.clone());
            }
            wells.push(well);
        }

        if controls.is_empty() {
            warn!(path = %path.display(), "plate map lists no {REFERENCE_LABEL} wells");
        }
        info!(
            path = %path.display(),
            wells = wells.len(),
            controls = controls.len(),
            "read plate map"
        );

        Ok(Self {
            plate: PlateDefinition::from_labels(wells),
            controls,
        })
    }
}
