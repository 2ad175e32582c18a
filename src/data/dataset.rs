use anyhow::{ensure, Result};
use burn::data::dataset::Dataset;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::data::pairing::PairedSplit;

/// One (embedding, country, match flag) training example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairedSample {
    pub features: Vec<f32>,
    pub country:  i64,
    pub flag:     f32,
}

/// Parallel arrays of embeddings, country indices and match flags.
pub struct PairedDataset {
    features:  Array2<f32>,
    countries: Vec<i64>,
    flags:     Vec<f32>,
}

impl PairedDataset {
    /// All three arrays must have the same number of rows.
    pub fn new(features: Array2<f32>, countries: Vec<i64>, flags: Vec<f32>) -> Result<Self> {
        ensure!(
            features.nrows() == countries.len(),
            "feature rows ({}) do not match country indices ({})",
            features.nrows(),
            countries.len()
        );
        ensure!(
            features.nrows() == flags.len(),
            "feature rows ({}) do not match match flags ({})",
            features.nrows(),
            flags.len()
        );
        Ok(Self { features, countries, flags })
    }

    pub fn embedding_size(&self) -> usize { self.features.ncols() }
}

impl TryFrom<PairedSplit> for PairedDataset {
    type Error = anyhow::Error;

    fn try_from(split: PairedSplit) -> Result<Self> {
        let countries = split.countries.iter().map(|&c| c as i64).collect();
        Self::new(split.features, countries, split.flags)
    }
}

impl Dataset<PairedSample> for PairedDataset {
    fn get(&self, index: usize) -> Option<PairedSample> {
        if index >= self.len() {
            return None;
        }
        Some(PairedSample {
            features: self.features.row(index).to_vec(),
            country:  self.countries[index],
            flag:     self.flags[index],
        })
    }

    fn len(&self) -> usize {
        self.features.nrows()
    }
}
