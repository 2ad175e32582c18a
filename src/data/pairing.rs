// ============================================================
// Layer 4 — Pair Construction
// ============================================================
// Turns a RawSplit into paired (embedding, country, match)
// rows with an equal number of true and corrupted pairings:
//
//   features   [n, d]  ──vstack(self, self)──▶  [2n, d]
//   labels     [n, c]  ──vstack(labels, augment(labels))──▶ [2n, c]
//   countries          argmax of each stacked label row   ──▶ [2n]
//   flags              [1; n] ++ [0; n]                   ──▶ [2n]
//
// Row i and row n + i share the same embedding; the first
// carries its true country, the second a corrupted one.

use anyhow::{Context, Result};
use ndarray::{concatenate, Array2, Axis};
use rand::Rng;

use crate::data::augmenter::augment_labels;
use crate::domain::labels::country_indices;
use crate::domain::split::RawSplit;

/// A split expanded into true and corrupted pairings.
#[derive(Debug, Clone)]
pub struct PairedSplit {
    /// Embeddings, repeated twice — shape: [2n, embedding_size]
    pub features: Array2<f32>,

    /// Country index per row (true first half, corrupted second half)
    pub countries: Vec<usize>,

    /// 1.0 for a genuine pairing, 0.0 for a corrupted one
    pub flags: Vec<f32>,
}

impl PairedSplit {
    pub fn rows(&self) -> usize { self.features.nrows() }

    /// Largest country index present, if any rows exist
    pub fn max_country(&self) -> Option<usize> {
        self.countries.iter().copied().max()
    }
}

/// Stack a matrix on top of itself.
pub fn double_rows(features: &Array2<f32>) -> Result<Array2<f32>> {
    concatenate(Axis(0), &[features.view(), features.view()])
        .context("cannot stack feature matrix")
}

/// `n` ones followed by `n` zeros.
pub fn match_flags(n: usize) -> Vec<f32> {
    let mut flags = vec![1.0f32; n];
    flags.resize(2 * n, 0.0);
    flags
}

/// Expand one split into true + corrupted pairings.
pub fn pair_split<R: Rng + ?Sized>(raw: &RawSplit, rng: &mut R) -> Result<PairedSplit> {
    let n = raw.rows();

    let features  = double_rows(&raw.features)?;
    let corrupted = augment_labels(&raw.labels, rng);
    let stacked   = concatenate(Axis(0), &[raw.labels.view(), corrupted.view()])
        .context("cannot stack label matrices")?;
    let countries = country_indices(&stacked);
    let flags     = match_flags(n);

    tracing::debug!(
        "Paired split: {} true + {} corrupted rows, {} classes",
        n, n, raw.num_classes(),
    );

    Ok(PairedSplit { features, countries, flags })
}
