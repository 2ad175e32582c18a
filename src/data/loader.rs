// ============================================================
// Layer 4 — Embedding Loader
// ============================================================
// Reads the four precomputed arrays from a directory using
// the ndarray-npy crate:
//
//   <dir>/X_train.npy   <dir>/y_train.npy
//   <dir>/X_test.npy    <dir>/y_test.npy
//
// How .npy files work:
//   A small header records dtype, memory order and shape,
//   followed by the raw element bytes. ndarray-npy checks the
//   header against the requested element type, so we read the
//   file once and try the dtypes we accept in turn, widening
//   or narrowing everything to f32.
//
// A missing or unreadable file is fatal: the error carries
// the path and propagates to main.
//
// Reference: ndarray-npy crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{anyhow, Context, Result};
use ndarray::Array2;
use ndarray_npy::ReadNpyExt;
use std::{fs, path::{Path, PathBuf}};

use crate::domain::split::{RawSplit, Split};
use crate::domain::traits::EmbeddingSource;

/// Loads X_*.npy / y_*.npy pairs from a directory.
/// Implements the EmbeddingSource trait from Layer 3.
pub struct NpyLoader {
    dir: PathBuf,
}

impl NpyLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl EmbeddingSource for NpyLoader {
    fn load_split(&self, split: Split) -> Result<RawSplit> {
        let features = read_matrix(&self.dir.join(split.features_file()))?;
        let labels   = read_matrix(&self.dir.join(split.labels_file()))?;

        tracing::info!(
            "Loaded {} split: features {:?}, labels {:?}",
            split,
            features.dim(),
            labels.dim(),
        );

        RawSplit::new(features, labels)
            .with_context(|| format!("inconsistent {split} split in '{}'", self.dir.display()))
    }
}

/// Read a 2-D .npy file into an f32 matrix.
pub fn read_matrix(path: &Path) -> Result<Array2<f32>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    decode_matrix(&bytes)
        .with_context(|| format!("Cannot decode '{}'", path.display()))
}

/// Decode .npy bytes, accepting f32, f64, i64, i32 and u8 elements.
fn decode_matrix(bytes: &[u8]) -> Result<Array2<f32>> {
    if let Ok(a) = Array2::<f32>::read_npy(bytes) {
        return Ok(a);
    }
    if let Ok(a) = Array2::<f64>::read_npy(bytes) {
        return Ok(a.mapv(|v| v as f32));
    }
    if let Ok(a) = Array2::<i64>::read_npy(bytes) {
        return Ok(a.mapv(|v| v as f32));
    }
    if let Ok(a) = Array2::<i32>::read_npy(bytes) {
        return Ok(a.mapv(|v| v as f32));
    }
    Array2::<u8>::read_npy(bytes)
        .map(|a| a.mapv(f32::from))
        .map_err(|e| anyhow!("not a 2-D f32/f64/i64/i32/u8 array ({e})"))
}
