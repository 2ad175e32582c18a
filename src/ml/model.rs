use burn::{
    nn::{
        loss::BinaryCrossEntropyLossConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::sigmoid,
};

/// Lower bound on the product of norms in the cosine denominator.
const COSINE_EPS: f64 = 1e-8;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct CompatibilityModelConfig {
    /// Width of the precomputed text embedding
    pub embedding_size: usize,
    /// Rows in the learned country table
    pub num_countries:  usize,
    #[config(default = 64)]
    pub hidden_size:    usize,
    /// Shared width of the text projection and country vectors
    #[config(default = 32)]
    pub compare_dim:    usize,
}

impl CompatibilityModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> CompatibilityModel<B> {
        let text_layer        = LinearConfig::new(self.embedding_size, self.hidden_size).init(device);
        let text_projection   = LinearConfig::new(self.hidden_size, self.compare_dim).init(device);
        let country_embedding = EmbeddingConfig::new(self.num_countries, self.compare_dim).init(device);
        CompatibilityModel { text_layer, text_projection, country_embedding }
    }
}

/// Scores how well a text embedding matches a candidate country.
///
/// text    → Linear → sigmoid → Linear ─┐
///                                      ├→ cosine → sigmoid → p(match)
/// country → Embedding ─────────────────┘
#[derive(Module, Debug)]
pub struct CompatibilityModel<B: Backend> {
    pub text_layer:        Linear<B>,
    pub text_projection:   Linear<B>,
    pub country_embedding: Embedding<B>,
}

impl<B: Backend> CompatibilityModel<B> {
    /// text: [batch, embedding_size], countries: [batch] → p(match): [batch]
    pub fn forward(&self, text: Tensor<B, 2>, countries: Tensor<B, 1, Int>) -> Tensor<B, 1> {
        let [batch_size] = countries.dims();

        let x = sigmoid(self.text_layer.forward(text));
        let x = self.text_projection.forward(x); // [batch, compare_dim]

        // Embedding expects [batch, seq]; each row looks up a single country.
        let y = self.country_embedding.forward(countries.reshape([batch_size, 1]));
        let [_, _, compare_dim] = y.dims();
        let y = y.reshape([batch_size, compare_dim]);

        sigmoid(cosine_similarity(x, y))
    }

    /// Binary cross-entropy of the match probability against 0/1 flags.
    pub fn forward_loss(
        &self,
        text:      Tensor<B, 2>,
        countries: Tensor<B, 1, Int>,
        flags:     Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 1>) {
        let output = self.forward(text, countries);
        let bce = BinaryCrossEntropyLossConfig::new().init(&output.device());
        let loss = bce.forward(output.clone(), flags);
        (loss, output)
    }
}

/// Row-wise cosine similarity of two [batch, dim] tensors → [batch].
pub fn cosine_similarity<B: Backend>(a: Tensor<B, 2>, b: Tensor<B, 2>) -> Tensor<B, 1> {
    let [batch_size, _] = a.dims();
    let dot    = (a.clone() * b.clone()).sum_dim(1);
    let norm_a = a.powf_scalar(2.0).sum_dim(1).sqrt();
    let norm_b = b.powf_scalar(2.0).sum_dim(1).sqrt();
    (dot / (norm_a * norm_b).clamp_min(COSINE_EPS)).reshape([batch_size])
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};
    use burn::tensor::Distribution;

    type TestBackend = NdArray;

    fn to_vec(t: Tensor<TestBackend, 1>) -> Vec<f32> {
        t.into_data().to_vec().unwrap()
    }

    #[test]
    fn test_cosine_similarity_known_angles() {
        let device = NdArrayDevice::default();
        let a = Tensor::<TestBackend, 2>::from_floats(
            [[1.0f32, 0.0], [1.0, 1.0], [2.0, 0.0], [0.0, 0.0]], &device,
        );
        let b = Tensor::<TestBackend, 2>::from_floats(
            [[0.0f32, 3.0], [2.0, 2.0], [-1.0, 0.0], [1.0, 0.0]], &device,
        );
        let sim = to_vec(cosine_similarity(a, b));

        assert!(sim[0].abs() < 1e-6, "orthogonal: {}", sim[0]);
        assert!((sim[1] - 1.0).abs() < 1e-6, "parallel: {}", sim[1]);
        assert!((sim[2] + 1.0).abs() < 1e-6, "opposite: {}", sim[2]);
        // zero vector stays finite
        assert_eq!(sim[3], 0.0);
    }

    #[test]
    fn test_forward_shape_and_range() {
        let device = NdArrayDevice::default();
        let model: CompatibilityModel<TestBackend> =
            CompatibilityModelConfig::new(16, 6).init(&device);

        let text      = Tensor::<TestBackend, 2>::random([5, 16], Distribution::Default, &device);
        let countries = Tensor::<TestBackend, 1, Int>::from_ints([0, 1, 2, 3, 5], &device);
        let out = model.forward(text, countries);

        assert_eq!(out.dims(), [5]);
        // sigmoid of a cosine lies in [sigmoid(-1), sigmoid(1)]
        let lo = 1.0 / (1.0 + 1f32.exp());
        let hi = 1.0 / (1.0 + (-1f32).exp());
        for p in to_vec(out) {
            assert!(p >= lo - 1e-5 && p <= hi + 1e-5, "p = {p}");
        }
    }

    #[test]
    fn test_default_dimensions() {
        let device = NdArrayDevice::default();
        let model: CompatibilityModel<TestBackend> =
            CompatibilityModelConfig::new(10, 4).init(&device);
        assert_eq!(model.text_layer.weight.dims(), [10, 64]);
        assert_eq!(model.text_projection.weight.dims(), [64, 32]);
        assert_eq!(model.country_embedding.weight.dims(), [4, 32]);
    }

    #[test]
    fn test_loss_is_non_negative() {
        let device = NdArrayDevice::default();
        let model: CompatibilityModel<TestBackend> =
            CompatibilityModelConfig::new(8, 3).init(&device);

        let text      = Tensor::<TestBackend, 2>::random([4, 8], Distribution::Default, &device);
        let countries = Tensor::<TestBackend, 1, Int>::from_ints([0, 1, 2, 1], &device);
        let flags     = Tensor::<TestBackend, 1, Int>::from_ints([1, 1, 0, 0], &device);
        let (loss, out) = model.forward_loss(text, countries, flags);

        let loss: f64 = loss.into_scalar().elem::<f64>();
        assert!(loss.is_finite() && loss >= 0.0, "loss = {loss}");
        assert_eq!(out.dims(), [4]);
    }
}
