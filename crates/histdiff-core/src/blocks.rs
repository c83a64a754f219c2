//! Block definitions
//!
//! A block is a group of wells scored against its own pooled control. Wells
//! not covered by any explicit block fall into one trailing remainder block.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::plate::{canonical_well_label, PlateDefinition};
use crate::{Error, Result};

/// Name given to the implicit trailing block
pub const REMAINDER_BLOCK: &str = "remainder";

/// One explicit group of wells, optionally named
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub wells: Vec<String>,
}

impl BlockSpec {
    /// An anonymous block
    pub fn new<I, S>(wells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: None,
            wells: wells.into_iter().map(|w| w.as_ref().to_string()).collect(),
        }
    }

    /// A named block
    pub fn named<I, S>(name: impl Into<String>, wells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: Some(name.into()),
            ..Self::new(wells)
        }
    }
}

/// Ordered collection of explicit blocks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockDefinition {
    groups: Vec<BlockSpec>,
}

/// A resolved block: canonical well ids in scoring order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub name: String,
    pub wells: Vec<String>,
}

impl BlockDefinition {
    /// No explicit blocks: the whole plate is scored as one block
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from anonymous well groups
    pub fn from_groups<I, G, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            groups: groups.into_iter().map(BlockSpec::new).collect(),
        }
    }

    /// Append an explicit block
    pub fn with_block(mut self, block: BlockSpec) -> Self {
        self.groups.push(block);
        self
    }

    /// Explicit blocks in definition order
    pub fn groups(&self) -> &[BlockSpec] {
        &self.groups
    }

    /// Check if no explicit block is defined
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Check that no well is claimed by two explicit blocks
    pub fn validate(&self) -> Result<()> {
        let mut owner: HashMap<String, usize> = HashMap::new();
        for (idx, group) in self.groups.iter().enumerate() {
            for well in &group.wells {
                let well = canonical_well_label(well);
                if let Some(&first) = owner.get(&well) {
                    if first != idx {
                        return Err(Error::Configuration(format!(
                            "well {well} appears in blocks {} and {}",
                            block_name(&self.groups[first], first),
                            block_name(group, idx),
                        )));
                    }
                } else {
                    owner.insert(well, idx);
                }
            }
        }
        Ok(())
    }

    /// Resolve the explicit blocks against a plate and append the remainder
    ///
    /// Well labels are canonicalised. The remainder holds every plate well not
    /// claimed by an explicit block, in plate order, and is omitted when empty.
    pub fn resolve(&self, plate: &PlateDefinition) -> Result<Vec<Block>> {
        self.validate()?;

        let mut claimed = std::collections::HashSet::new();
        let mut blocks = Vec::with_capacity(self.groups.len() + 1);
        for (idx, group) in self.groups.iter().enumerate() {
            let mut wells = Vec::with_capacity(group.wells.len());
            for well in &group.wells {
                let well = canonical_well_label(well);
                if claimed.insert(well.clone()) {
                    wells.push(well);
                }
            }
            blocks.push(Block {
                name: block_name(group, idx),
                wells,
            });
        }

        let remainder: Vec<String> = plate
            .iter()
            .filter(|w| !claimed.contains(*w))
            .map(str::to_string)
            .collect();
        if !remainder.is_empty() {
            blocks.push(Block {
                name: REMAINDER_BLOCK.to_string(),
                wells: remainder,
            });
        }

        Ok(blocks)
    }
}

fn block_name(spec: &BlockSpec, idx: usize) -> String {
    spec.name.clone().unwrap_or_else(|| format!("block_{idx}"))
}
