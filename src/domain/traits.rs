// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer asks for splits through this trait
// and never touches the file format directly.
//
// Implementations:
//   - NpyLoader → reads X_*.npy / y_*.npy from a directory
//   - (tests)   → in-memory splits
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::split::{RawSplit, Split};

// ─── EmbeddingSource ──────────────────────────────────────────────────────────
/// Any component that can supply the raw arrays for a split.
pub trait EmbeddingSource {
    /// Load the embedding matrix and one-hot labels for `split`.
    fn load_split(&self, split: Split) -> Result<RawSplit>;
}
