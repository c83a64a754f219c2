//! Plate definitions and well-label canonicalisation
//!
//! Wells are identified by a `LetterNumber` label (`A1`, `P24`). Exports from
//! imaging software often zero-pad the column (`A01`), so every label that
//! enters the pipeline goes through [`canonical_well_label`] first.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Canonicalise a well label to `LetterNumber` form
///
/// `"A01"` becomes `"A1"` and `" b12 "` becomes `"B12"`. Labels whose tail
/// is not an unsigned integer are returned trimmed but otherwise unchanged,
/// so composite ids such as `"plate1_A01"` pass through.
pub fn canonical_well_label(label: &str) -> String {
    let label = label.trim();
    let mut chars = label.chars();
    let Some(letter) = chars.next() else {
        return String::new();
    };
    if !letter.is_ascii_alphabetic() {
        return label.to_string();
    }

    let tail = chars.as_str();
    match tail.parse::<u32>() {
        Ok(number) if !tail.is_empty() => format!("{}{}", letter.to_ascii_uppercase(), number),
        _ => label.to_string(),
    }
}

/// The ordered set of well identifiers considered valid for a run
///
/// Rows whose entity id is not part of the plate definition are discarded
/// before aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PlateDefinition {
    wells: Vec<String>,
    lookup: HashSet<String>,
}

impl PlateDefinition {
    /// Build a plate definition from arbitrary labels
    ///
    /// Labels are canonicalised; duplicates keep their first position.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut wells = Vec::new();
        let mut lookup = HashSet::new();
        for label in labels {
            let well = canonical_well_label(label.as_ref());
            if well.is_empty() {
                continue;
            }
            if lookup.insert(well.clone()) {
                wells.push(well);
            }
        }
        Self { wells, lookup }
    }

    /// A rectangular plate with `rows` lettered rows and `columns` numbered columns
    ///
    /// Rows beyond `Z` are not representable and are truncated.
    pub fn from_dimensions(rows: u8, columns: u32) -> Self {
        let rows = rows.min(26);
        let labels = (0..rows).flat_map(|r| {
            let letter = (b'A' + r) as char;
            (1..=columns).map(move |c| format!("{letter}{c}"))
        });
        Self::from_labels(labels)
    }

    /// Standard 384-well plate: rows `A`-`P`, columns `1`-`24`
    pub fn well_384() -> Self {
        Self::from_dimensions(16, 24)
    }

    /// Standard 96-well plate: rows `A`-`H`, columns `1`-`12`
    pub fn well_96() -> Self {
        Self::from_dimensions(8, 12)
    }

    /// Check whether a (canonical) well id belongs to the plate
    pub fn contains(&self, well: &str) -> bool {
        self.lookup.contains(well)
    }

    /// Wells in definition order
    pub fn wells(&self) -> &[String] {
        &self.wells
    }

    /// Iterate wells in definition order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.wells.iter().map(String::as_str)
    }

    /// Number of wells
    pub fn len(&self) -> usize {
        self.wells.len()
    }

    /// Check if the plate has no wells
    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }
}

impl Default for PlateDefinition {
    fn default() -> Self {
        Self::well_384()
    }
}

impl From<Vec<String>> for PlateDefinition {
    fn from(labels: Vec<String>) -> Self {
        Self::from_labels(labels)
    }
}

impl From<PlateDefinition> for Vec<String> {
    fn from(plate: PlateDefinition) -> Self {
        plate.wells
    }
}
