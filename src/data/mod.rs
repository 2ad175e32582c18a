// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from .npy files on disk to tensor batches.
//
//   X_*.npy / y_*.npy
//       │
//       ▼
//   NpyLoader         → reads the four matrices (RawSplit)
//       │
//       ▼
//   augmenter         → corrupts one-hot labels (negatives)
//       │
//       ▼
//   pairing           → doubles rows, stacks labels, builds
//                       country indices and match flags
//       │
//       ▼
//   PairedDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   PairedBatcher     → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads .npy embedding and label matrices with ndarray-npy
pub mod loader;

/// Random one-hot label corruption
pub mod augmenter;

/// True + corrupted pair construction
pub mod pairing;

/// Implements Burn's Dataset trait for paired samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
