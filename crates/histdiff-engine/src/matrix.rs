//! Score matrix: one row per scored well, one column per good feature

use std::collections::HashMap;
use std::sync::Arc;

use histdiff_core::{Error, Result};

/// Dense row-major score table
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    features: Arc<[String]>,
    entities: Vec<String>,
    index: HashMap<String, usize>,
    values: Vec<f64>,
}

impl ScoreMatrix {
    /// Empty matrix over the given features
    pub fn new(features: Arc<[String]>) -> Self {
        Self {
            features,
            entities: Vec::new(),
            index: HashMap::new(),
            values: Vec::new(),
        }
    }

    /// Append the scores of one well
    pub fn push_row(&mut self, entity: impl Into<String>, scores: Vec<f64>) -> Result<()> {
        let entity = entity.into();
        if scores.len() != self.features.len() {
            return Err(Error::size_mismatch(
                self.features.len(),
                scores.len(),
                "score row",
            ));
        }
        if self.index.contains_key(&entity) {
            return Err(Error::InvalidInput(format!(
                "well {entity} scored more than once"
            )));
        }
        self.index.insert(entity.clone(), self.entities.len());
        self.entities.push(entity);
        self.values.extend(scores);
        Ok(())
    }

    /// Append every row of another matrix over the same features
    pub fn extend(&mut self, other: ScoreMatrix) -> Result<()> {
        if self.features != other.features {
            return Err(Error::InvalidInput(
                "score matrices have different features".to_string(),
            ));
        }
        let width = other.features.len();
        for (i, entity) in other.entities.into_iter().enumerate() {
            let row = other.values[i * width..(i + 1) * width].to_vec();
            self.push_row(entity, row)?;
        }
        Ok(())
    }

    /// Score of one well and feature
    pub fn get(&self, entity: &str, feature: &str) -> Option<f64> {
        let row = self.row(entity)?;
        let f = self.features.iter().position(|name| name == feature)?;
        Some(row[f])
    }

    /// Scores of one well, in feature order
    pub fn row(&self, entity: &str) -> Option<&[f64]> {
        let i = *self.index.get(entity)?;
        let width = self.features.len();
        Some(&self.values[i * width..(i + 1) * width])
    }

    /// Iterate `(well, scores)` in output order
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        let width = self.features.len();
        self.entities
            .iter()
            .enumerate()
            .map(move |(i, e)| (e.as_str(), &self.values[i * width..(i + 1) * width]))
    }

    /// One feature's scores, in row order
    pub fn column(&self, feature: &str) -> Option<Vec<f64>> {
        let f = self.features.iter().position(|name| name == feature)?;
        let width = self.features.len();
        Some(
            (0..self.entities.len())
                .map(|i| self.values[i * width + f])
                .collect(),
        )
    }

    /// Scored wells, in row order
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Feature columns
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check for no rows
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
