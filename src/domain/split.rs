// ============================================================
// Layer 3 — Split Types
// ============================================================
// A split is one of the two fixed partitions of the
// precomputed data: train or test. Each split is stored on
// disk as two arrays:
//
//   X_<split>.npy  — embedding matrix  [rows, embedding_size]
//   y_<split>.npy  — one-hot labels    [rows, num_classes]
//
// RawSplit is the pair as read, before any augmentation.

use std::fmt;

use anyhow::{ensure, Result};
use ndarray::Array2;

/// Which partition of the data an array belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    /// File name of the embedding matrix for this split
    pub fn features_file(self) -> &'static str {
        match self {
            Split::Train => "X_train.npy",
            Split::Test  => "X_test.npy",
        }
    }

    /// File name of the one-hot label matrix for this split
    pub fn labels_file(self) -> &'static str {
        match self {
            Split::Train => "y_train.npy",
            Split::Test  => "y_test.npy",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Split::Train => f.write_str("train"),
            Split::Test  => f.write_str("test"),
        }
    }
}

/// Embedding rows and their one-hot country labels, row-aligned.
#[derive(Debug, Clone)]
pub struct RawSplit {
    /// Precomputed text embeddings — shape: [rows, embedding_size]
    pub features: Array2<f32>,

    /// One-hot country labels — shape: [rows, num_classes]
    pub labels: Array2<f32>,
}

impl RawSplit {
    /// Build a split, rejecting arrays that are not row-aligned.
    pub fn new(features: Array2<f32>, labels: Array2<f32>) -> Result<Self> {
        ensure!(
            features.nrows() == labels.nrows(),
            "feature rows ({}) do not match label rows ({})",
            features.nrows(),
            labels.nrows()
        );
        ensure!(labels.ncols() > 0, "label matrix has no class columns");
        Ok(Self { features, labels })
    }

    pub fn rows(&self) -> usize { self.features.nrows() }

    pub fn embedding_size(&self) -> usize { self.features.ncols() }

    pub fn num_classes(&self) -> usize { self.labels.ncols() }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(Split::Train.features_file(), "X_train.npy");
        assert_eq!(Split::Train.labels_file(),   "y_train.npy");
        assert_eq!(Split::Test.features_file(),  "X_test.npy");
        assert_eq!(Split::Test.labels_file(),    "y_test.npy");
    }

    #[test]
    fn test_misaligned_rows_rejected() {
        let features = Array2::<f32>::zeros((3, 4));
        let labels   = Array2::<f32>::zeros((2, 5));
        assert!(RawSplit::new(features, labels).is_err());
    }

    #[test]
    fn test_zero_classes_rejected() {
        let features = Array2::<f32>::zeros((3, 4));
        let labels   = Array2::<f32>::zeros((3, 0));
        assert!(RawSplit::new(features, labels).is_err());
    }

    #[test]
    fn test_dimensions() {
        let split = RawSplit::new(
            Array2::<f32>::zeros((6, 8)),
            Array2::<f32>::zeros((6, 3)),
        ).unwrap();
        assert_eq!(split.rows(), 6);
        assert_eq!(split.embedding_size(), 8);
        assert_eq!(split.num_classes(), 3);
    }
}
