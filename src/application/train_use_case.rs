// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full experiment in order:
//
//   Step 1: Seed the run's random source
//   Step 2: Load train and test arrays    (Layer 4 - data)
//   Step 3: Check split compatibility
//   Step 4: Build true + corrupted pairs  (Layer 4 - data)
//   Step 5: Size the country table
//   Step 6: Build datasets                (Layer 4 - data)
//   Step 7: Open metrics output           (Layer 6 - infra)
//   Step 8: Run training loop             (Layer 5 - ml)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{bail, ensure, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::PairedDataset,
    loader::NpyLoader,
    pairing::{pair_split, PairedSplit},
};
use crate::domain::{
    labels::distinct_count,
    split::Split,
    traits::EmbeddingSource,
};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::trainer::run_training;

/// Where the training loop runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// wgpu when an adapter can be opened, otherwise ndarray
    Auto,
    /// GPU through wgpu
    Wgpu,
    /// Pure-Rust CPU backend
    Ndarray,
}

// ─── Training Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:     String,
    pub metrics_dir:  Option<String>,
    pub seed:         Option<u64>,
    pub backend:      BackendKind,
    pub epochs:       usize,
    pub batch_size:   usize,
    pub lr:           f64,
    pub hidden_size:  usize,
    pub compare_dim:  usize,
    pub adam_epsilon: f32,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:     ".".to_string(),
            metrics_dir:  None,
            seed:         None,
            backend:      BackendKind::Auto,
            epochs:       100,
            batch_size:   44,
            lr:           1e-3,
            hidden_size:  64,
            compare_dim:  32,
            adam_epsilon: 1e-8,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run the experiment against the .npy files in `data_dir`.
    pub fn execute(&self) -> Result<Vec<EpochMetrics>> {
        tracing::info!("Loading .npy arrays from '{}'", self.config.data_dir);
        let loader = NpyLoader::new(&self.config.data_dir);
        self.execute_with(&loader)
    }

    /// Run the experiment against any source of raw splits.
    pub fn execute_with(&self, source: &impl EmbeddingSource) -> Result<Vec<EpochMetrics>> {
        let cfg = &self.config;

        // ── Step 1: Random source ─────────────────────────────────────────────
        let mut rng = match cfg.seed {
            Some(seed) => {
                tracing::info!("Seeding run with {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        // ── Step 2: Load raw splits ───────────────────────────────────────────
        let raw_train = source.load_split(Split::Train)?;
        let raw_test  = source.load_split(Split::Test)?;

        // ── Step 3: Splits must describe the same feature and label space ────
        ensure!(
            raw_train.embedding_size() == raw_test.embedding_size(),
            "train embeddings have {} columns but test embeddings have {}",
            raw_train.embedding_size(),
            raw_test.embedding_size()
        );
        ensure!(
            raw_train.num_classes() == raw_test.num_classes(),
            "train labels have {} classes but test labels have {}",
            raw_train.num_classes(),
            raw_test.num_classes()
        );

        // ── Step 4: True + corrupted pairings ─────────────────────────────────
        let train = pair_split(&raw_train, &mut rng)?;
        let test  = pair_split(&raw_test,  &mut rng)?;
        tracing::info!("Paired rows: {} train, {} validation", train.rows(), test.rows());

        // ── Step 5: Country table size ────────────────────────────────────────
        let num_countries = country_table_size(&train, &test)?;
        tracing::info!("Country table size: {}", num_countries);

        // ── Step 6: Burn datasets ─────────────────────────────────────────────
        let train_dataset = PairedDataset::try_from(train)?;
        let val_dataset   = PairedDataset::try_from(test)?;

        // ── Step 7: Optional metrics output ───────────────────────────────────
        let metrics = match &cfg.metrics_dir {
            Some(dir) => {
                let logger = MetricsLogger::new(dir)?;
                logger.save_config(cfg)?;
                tracing::info!("Writing epoch metrics to '{}'", logger.csv_path().display());
                Some(logger)
            }
            None => None,
        };

        // ── Step 8: Training loop (Layer 5) ───────────────────────────────────
        let shuffle_seed: u64 = rng.gen();
        run_training(cfg, train_dataset, val_dataset, num_countries, shuffle_seed, metrics.as_ref())
    }
}

/// Distinct training countries plus one spare row; every index must fit.
fn country_table_size(train: &PairedSplit, test: &PairedSplit) -> Result<usize> {
    let size = distinct_count(&train.countries) + 1;
    let max  = train.max_country().into_iter().chain(test.max_country()).max();
    if let Some(max) = max {
        if max >= size {
            bail!(
                "country index {} does not fit a table of {} rows \
                 ({} distinct training countries + 1)",
                max, size, size - 1
            );
        }
    }
    Ok(size)
}
