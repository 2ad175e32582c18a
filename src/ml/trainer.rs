// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Train + validation loop using Burn's DataLoader and Adam.
//
// Per epoch:
//   TRAIN  shuffled batches on the autodiff backend:
//          forward → BCE loss → backward → Adam step,
//          accumulating batch loss and batch accuracy
//   EVAL   fixed-order batches on the inner backend via
//          model.valid() (no gradient tracking), accuracy only
//
// Epoch figures are means over batches, not over samples, so
// a short final batch weighs as much as a full one.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use std::{panic, sync::Arc};

use anyhow::Result;
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, Autodiff, NdArray, Wgpu},
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::{BackendKind, TrainConfig};
use crate::data::{
    batcher::{PairedBatch, PairedBatcher},
    dataset::{PairedDataset, PairedSample},
};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{CompatibilityModel, CompatibilityModelConfig};

type WgpuBackend    = Autodiff<Wgpu>;
type NdArrayBackend = Autodiff<NdArray>;

/// Backend the run actually uses once `Auto` is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compute {
    Wgpu,
    Ndarray,
}

/// Settle the configured backend. `Auto` opens a wgpu device and
/// falls back to ndarray when no adapter can be initialised.
pub fn resolve_backend(kind: BackendKind) -> Compute {
    match kind {
        BackendKind::Wgpu    => Compute::Wgpu,
        BackendKind::Ndarray => Compute::Ndarray,
        BackendKind::Auto if wgpu_available() => Compute::Wgpu,
        BackendKind::Auto => {
            tracing::warn!("No usable wgpu adapter, falling back to the NdArray CPU backend");
            Compute::Ndarray
        }
    }
}

/// Run one tiny tensor round-trip on the default wgpu device.
/// cubecl panics during runtime setup when no adapter exists.
fn wgpu_available() -> bool {
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let outcome = panic::catch_unwind(|| {
        let device = WgpuDevice::default();
        Tensor::<Wgpu, 1>::zeros([1], &device).into_data();
    });
    panic::set_hook(previous_hook);
    outcome.is_ok()
}

/// Shuffled loader, reshuffled on every `iter()` from `shuffle_seed`.
pub fn train_loader<B: Backend>(
    dataset:      PairedDataset,
    batch_size:   usize,
    shuffle_seed: u64,
    device:       &B::Device,
) -> Arc<dyn DataLoader<B, PairedBatch<B>>> {
    DataLoaderBuilder::<B, PairedSample, PairedBatch<B>>::new(PairedBatcher)
        .batch_size(batch_size)
        .shuffle(shuffle_seed)
        .set_device(device.clone())
        .build(dataset)
}

/// Fixed-order loader.
pub fn val_loader<B: Backend>(
    dataset:    PairedDataset,
    batch_size: usize,
    device:     &B::Device,
) -> Arc<dyn DataLoader<B, PairedBatch<B>>> {
    DataLoaderBuilder::<B, PairedSample, PairedBatch<B>>::new(PairedBatcher)
        .batch_size(batch_size)
        .set_device(device.clone())
        .build(dataset)
}

/// Pick the device once and run the full training loop on it.
pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: PairedDataset,
    val_dataset:   PairedDataset,
    num_countries: usize,
    shuffle_seed:  u64,
    metrics:       Option<&MetricsLogger>,
) -> Result<Vec<EpochMetrics>> {
    match resolve_backend(cfg.backend) {
        Compute::Wgpu => {
            let device = WgpuDevice::default();
            tracing::info!("Using WGPU device: {:?}", device);
            train::<WgpuBackend>(cfg, train_dataset, val_dataset, num_countries, shuffle_seed, device, metrics)
        }
        Compute::Ndarray => {
            let device = NdArrayDevice::default();
            tracing::info!("Using NdArray device: {:?}", device);
            train::<NdArrayBackend>(cfg, train_dataset, val_dataset, num_countries, shuffle_seed, device, metrics)
        }
    }
}

pub fn train<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    train_dataset: PairedDataset,
    val_dataset:   PairedDataset,
    num_countries: usize,
    shuffle_seed:  u64,
    device:        B::Device,
    metrics:       Option<&MetricsLogger>,
) -> Result<Vec<EpochMetrics>> {

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = CompatibilityModelConfig::new(train_dataset.embedding_size(), num_countries)
        .with_hidden_size(cfg.hidden_size)
        .with_compare_dim(cfg.compare_dim);
    let mut model: CompatibilityModel<B> = model_cfg.init(&device);
    tracing::info!("{}", model);
    tracing::info!(
        "Model ready: embedding_size={}, countries={}, {} parameters",
        model_cfg.embedding_size, num_countries, model.num_params(),
    );

    let mut optim = AdamConfig::new().with_epsilon(cfg.adam_epsilon).init();

    // ── Training data loader (AutodiffBackend, reshuffled every epoch) ────────
    let train_loader = train_loader::<B>(train_dataset, cfg.batch_size, shuffle_seed, &device);

    // ── Validation data loader (InnerBackend, fixed order) ────────────────────
    let val_loader = val_loader::<B::InnerBackend>(val_dataset, cfg.batch_size, &device);

    let mut history = Vec::with_capacity(cfg.epochs);

    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_acc_sum  = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, output) = model.forward_loss(
                batch.features,
                batch.countries,
                batch.flags.clone(),
            );

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_acc_sum  += batch_accuracy(output, batch.flags);
            train_batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();

        let mut val_acc_sum = 0.0f64;
        let mut val_batches = 0usize;

        for batch in val_loader.iter() {
            let output = model_valid.forward(batch.features, batch.countries);
            val_acc_sum += batch_accuracy(output, batch.flags);
            val_batches += 1;
        }

        let m = EpochMetrics::new(
            epoch,
            mean(train_loss_sum, train_batches),
            mean(train_acc_sum, train_batches),
            mean(val_acc_sum, val_batches),
        );
        println!("{}", m.summary_line());

        if let Some(logger) = metrics {
            logger.log(&m)?;
        }
        history.push(m);
    }

    tracing::info!("Training complete!");
    Ok(history)
}

/// Percentage of rounded predictions equal to the 0/1 flags, rounded to a whole percent.
pub fn batch_accuracy<B: Backend>(output: Tensor<B, 1>, flags: Tensor<B, 1, Int>) -> f64 {
    let [batch_size] = flags.dims();
    let correct: i64 = output
        .greater_elem(0.5)
        .int()
        .equal(flags)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    percent(correct as usize, batch_size)
}

fn percent(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (100.0 * correct as f64 / total as f64).round_ties_even()
}

fn mean(sum: f64, count: usize) -> f64 {
    if count > 0 { sum / count as f64 } else { f64::NAN }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    type TestBackend = NdArray;

    #[test]
    fn test_percent_rounds_half_to_even() {
        assert_eq!(percent(1, 8), 12.0);   // 12.5
        assert_eq!(percent(3, 8), 38.0);   // 37.5
        assert_eq!(percent(2, 3), 67.0);
        assert_eq!(percent(0, 0), 0.0);
    }

    #[test]
    fn test_mean_of_empty_is_nan() {
        assert!(mean(3.0, 0).is_nan());
        assert_eq!(mean(3.0, 2), 1.5);
    }

    #[test]
    fn test_batch_accuracy_thresholds_at_half() {
        let device = NdArrayDevice::default();
        let output = Tensor::<TestBackend, 1>::from_floats([0.9f32, 0.4, 0.6, 0.5], &device);
        let flags  = Tensor::<TestBackend, 1, Int>::from_ints([1, 0, 0, 1], &device);
        // 0.9→1 ✓, 0.4→0 ✓, 0.6→1 ✗, 0.5→0 ✗
        assert_eq!(batch_accuracy(output, flags), 50.0);
    }

    fn toy_dataset(rows: usize, num_countries: usize) -> PairedDataset {
        let features = Array2::from_shape_fn((rows, 6), |(r, c)| ((r + c) % 5) as f32 / 5.0);
        let countries = (0..rows).map(|r| (r % num_countries) as i64).collect();
        let flags = (0..rows).map(|r| if r < rows / 2 { 1.0 } else { 0.0 }).collect();
        PairedDataset::new(features, countries, flags).unwrap()
    }

    #[test]
    fn test_short_run_reports_bounded_metrics() {
        let cfg = TrainConfig {
            epochs:     2,
            batch_size: 8,
            backend:    BackendKind::Ndarray,
            ..TrainConfig::default()
        };
        let history = train::<NdArrayBackend>(
            &cfg,
            toy_dataset(20, 4),
            toy_dataset(12, 4),
            5,
            9,
            NdArrayDevice::default(),
            None,
        ).unwrap();

        assert_eq!(history.len(), 2);
        for (i, m) in history.iter().enumerate() {
            assert_eq!(m.epoch, i + 1);
            assert!(m.train_loss.is_finite() && m.train_loss >= 0.0);
            assert!((0.0..=100.0).contains(&m.train_acc));
            assert!((0.0..=100.0).contains(&m.val_acc));
        }
    }

    #[test]
    fn test_metrics_logged_per_epoch() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        let cfg = TrainConfig {
            epochs:     3,
            batch_size: 44,
            backend:    BackendKind::Ndarray,
            ..TrainConfig::default()
        };
        run_training(&cfg, toy_dataset(10, 3), toy_dataset(6, 3), 4, 1, Some(&logger)).unwrap();

        let csv = std::fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }

    fn pass_countries(loader: &Arc<dyn DataLoader<TestBackend, PairedBatch<TestBackend>>>) -> Vec<i64> {
        loader
            .iter()
            .flat_map(|b| b.countries.into_data().convert::<i64>().to_vec::<i64>().unwrap())
            .collect()
    }

    #[test]
    fn test_val_loader_keeps_dataset_order() {
        let device = NdArrayDevice::default();
        let loader = val_loader::<TestBackend>(toy_dataset(24, 24), 5, &device);

        let first  = pass_countries(&loader);
        let second = pass_countries(&loader);
        assert_eq!(first, (0..24).collect::<Vec<i64>>());
        assert_eq!(first, second);
    }

    #[test]
    fn test_train_loader_reshuffles_each_pass() {
        let device = NdArrayDevice::default();
        let loader = train_loader::<TestBackend>(toy_dataset(24, 24), 5, 31, &device);

        let epoch_1 = pass_countries(&loader);
        let epoch_2 = pass_countries(&loader);
        assert_ne!(epoch_1, epoch_2);

        // each pass is still a permutation of every row
        for pass in [&epoch_1, &epoch_2] {
            let mut sorted = pass.clone();
            sorted.sort();
            assert_eq!(sorted, (0..24).collect::<Vec<i64>>());
        }
    }

    #[test]
    fn test_same_seed_same_batch_order() {
        let device = NdArrayDevice::default();
        let a = train_loader::<TestBackend>(toy_dataset(24, 24), 5, 31, &device);
        let b = train_loader::<TestBackend>(toy_dataset(24, 24), 5, 31, &device);

        assert_eq!(pass_countries(&a), pass_countries(&b));
        assert_eq!(pass_countries(&a), pass_countries(&b));
    }

    #[test]
    fn test_explicit_backends_resolve_without_detection() {
        assert_eq!(resolve_backend(BackendKind::Ndarray), Compute::Ndarray);
        assert_eq!(resolve_backend(BackendKind::Wgpu), Compute::Wgpu);
    }

    #[test]
    fn test_auto_backend_trains() {
        let compute = resolve_backend(BackendKind::Auto);
        assert!(matches!(compute, Compute::Wgpu | Compute::Ndarray));

        let cfg = TrainConfig {
            epochs:     1,
            batch_size: 8,
            backend:    BackendKind::Auto,
            ..TrainConfig::default()
        };
        let history = run_training(&cfg, toy_dataset(20, 6), toy_dataset(8, 6), 7, 1, None).unwrap();
        assert_eq!(history.len(), 1);
        assert!((0.0..=100.0).contains(&history[0].val_acc));
    }
}
