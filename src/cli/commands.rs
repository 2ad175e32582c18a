// ============================================================
// Layer 1 — CLI Arguments
// ============================================================
// Only run-environment settings are exposed here. Training
// hyperparameters (epochs, batch size, learning rate, layer
// widths) stay fixed at the TrainConfig defaults.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, ValueEnum};
use crate::application::train_use_case::{BackendKind, TrainConfig};

/// Compute backend choice on the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BackendArg {
    /// wgpu if an adapter is available, else ndarray
    Auto,
    /// wgpu: best available GPU adapter
    Wgpu,
    /// ndarray: CPU only
    Ndarray,
}

impl From<BackendArg> for BackendKind {
    fn from(b: BackendArg) -> Self {
        match b {
            BackendArg::Auto    => BackendKind::Auto,
            BackendArg::Wgpu    => BackendKind::Wgpu,
            BackendArg::Ndarray => BackendKind::Ndarray,
        }
    }
}

/// Arguments for a training run.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory holding X_train.npy, y_train.npy, X_test.npy, y_test.npy
    #[arg(long, default_value = ".")]
    pub data_dir: String,

    /// Write metrics.csv and run_config.json into this directory
    #[arg(long)]
    pub metrics_dir: Option<String>,

    /// Seed for label corruption and batch shuffling (unseeded if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Compute backend
    #[arg(long, value_enum, default_value_t = BackendArg::Auto)]
    pub backend: BackendArg,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:    a.data_dir,
            metrics_dir: a.metrics_dir,
            seed:        a.seed,
            backend:     a.backend.into(),
            ..TrainConfig::default()
        }
    }
}
