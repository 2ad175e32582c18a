// ============================================================
// Layer 4 — Paired Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<PairedSample>
// into tensors on the target device.
//
//   Input:  N samples, each with an embedding of length D
//   Output: PairedBatch with
//             features  [N, D]  Float
//             countries [N]     Int
//             flags     [N]     Int (0 / 1)
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::PairedSample;

// ─── PairedBatch ──────────────────────────────────────────────────────────────
/// A batch of paired samples ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct PairedBatch<B: Backend> {
    /// Text embeddings — shape: [batch_size, embedding_size]
    pub features: Tensor<B, 2>,

    /// Candidate country indices — shape: [batch_size]
    pub countries: Tensor<B, 1, Int>,

    /// Match targets — shape: [batch_size], 1 = true pairing
    pub flags: Tensor<B, 1, Int>,
}

// ─── PairedBatcher ────────────────────────────────────────────────────────────
#[derive(Clone, Debug, Default)]
pub struct PairedBatcher;

impl<B: Backend> Batcher<B, PairedSample, PairedBatch<B>> for PairedBatcher {
    fn batch(&self, items: Vec<PairedSample>, device: &B::Device) -> PairedBatch<B> {
        let batch_size     = items.len();
        let embedding_size = items.first().map_or(0, |s| s.features.len());

        let features_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();

        let countries: Vec<i32> = items.iter().map(|s| s.country as i32).collect();

        // flags are exactly 0.0 or 1.0
        let flags: Vec<i32> = items.iter().map(|s| s.flag.round() as i32).collect();

        let features = Tensor::<B, 1>::from_floats(features_flat.as_slice(), device)
            .reshape([batch_size, embedding_size]);
        let countries = Tensor::<B, 1, Int>::from_ints(countries.as_slice(), device);
        let flags     = Tensor::<B, 1, Int>::from_ints(flags.as_slice(), device);

        PairedBatch { features, countries, flags }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    type TestBackend = NdArray;

    #[test]
    fn test_batch_shapes_and_values() {
        let device = NdArrayDevice::default();
        let items = vec![
            PairedSample { features: vec![1.0, 2.0, 3.0], country: 4, flag: 1.0 },
            PairedSample { features: vec![4.0, 5.0, 6.0], country: 0, flag: 0.0 },
        ];
        let batch: PairedBatch<TestBackend> = PairedBatcher.batch(items, &device);

        assert_eq!(batch.features.dims(), [2, 3]);
        assert_eq!(batch.countries.dims(), [2]);

        let features: Vec<f32> = batch.features.into_data().to_vec().unwrap();
        assert_eq!(features, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let countries: Vec<i64> = batch.countries.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(countries, vec![4, 0]);

        let flags: Vec<i64> = batch.flags.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(flags, vec![1, 0]);
    }
}
