// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records per-epoch training metrics to a CSV file, and the
// run configuration to JSON, when a metrics directory is set.
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: mean binary cross-entropy over training batches
//   - train_acc:  mean batch accuracy (%) over training batches
//   - val_acc:    mean batch accuracy (%) over validation batches
//
// Output files:
//   <metrics_dir>/metrics.csv
//   <metrics_dir>/run_config.json
//
// Example CSV output:
//   epoch,train_loss,train_acc,val_acc
//   1,0.693100,50.000000,52.000000
//   2,0.681200,57.333333,58.500000
//   ...
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

const CSV_HEADER: &str = "epoch,train_loss,train_acc,val_acc";

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean of per-batch losses
    pub train_loss: f64,

    /// Mean of per-batch accuracies, in percent
    pub train_acc: f64,

    /// Mean of per-batch validation accuracies, in percent
    pub val_acc: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, train_acc: f64, val_acc: f64) -> Self {
        Self { epoch, train_loss, train_acc, val_acc }
    }

    /// The console line printed after each epoch.
    pub fn summary_line(&self) -> String {
        format!(
            "Epoch {:03}: | Loss: {:.5} | Acc: {:.3} | Val Acc: {:.3}",
            self.epoch, self.train_loss, self.train_acc, self.val_acc,
        )
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    dir:      PathBuf,
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the directory and write the CSV header if the file is new.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "{CSV_HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { dir, csv_path })
    }

    /// Write any serialisable run configuration as pretty JSON.
    pub fn save_config<T: Serialize>(&self, config: &T) -> Result<()> {
        let path = self.dir.join("run_config.json");
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        Ok(())
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.epoch, m.train_loss, m.train_acc, m.val_acc,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_acc={:.2}",
            m.epoch, m.train_loss, m.val_acc,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
