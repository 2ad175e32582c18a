// ============================================================
// Layer 3 — One-Hot Label Helpers
// ============================================================
// A one-hot row encodes a country as the position of its
// single set bit. These helpers recover that position.
//
// argmax follows the usual convention: the FIRST maximal
// column wins, and an all-zero row maps to column 0.

use std::collections::BTreeSet;

use ndarray::{Array2, ArrayView1};

/// Index of the first maximal entry in a row.
pub fn argmax(row: ArrayView1<'_, f32>) -> usize {
    let mut best_idx = 0;
    let mut best_val = f32::NEG_INFINITY;
    for (idx, &val) in row.iter().enumerate() {
        if val > best_val {
            best_idx = idx;
            best_val = val;
        }
    }
    best_idx
}

/// Country index for every row of a one-hot label matrix.
pub fn country_indices(labels: &Array2<f32>) -> Vec<usize> {
    labels.rows().into_iter().map(argmax).collect()
}

/// Number of distinct country indices present.
pub fn distinct_count(indices: &[usize]) -> usize {
    indices.iter().collect::<BTreeSet<_>>().len()
}
