use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Dropout, DropoutConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::backend::AutodiffBackend,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct DenseClassifierConfig {
    pub resolution:  usize,
    pub num_classes: usize,
    pub hidden_size: usize,
    pub dropout:     f64,
}

impl DenseClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> DenseClassifier<B> {
        let input_size = self.resolution * self.resolution * 3;
        let hidden  = LinearConfig::new(input_size, self.hidden_size).init(device);
        let output  = LinearConfig::new(self.hidden_size, self.num_classes).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        DenseClassifier { hidden, output, dropout }
    }
}

/// Flatten → dense hidden layer → dropout → class logits.
/// Dropout only fires on an autodiff backend, so inference on
/// the inner backend is the identity path through it.
#[derive(Module, Debug)]
pub struct DenseClassifier<B: Backend> {
    pub hidden:  Linear<B>,
    pub output:  Linear<B>,
    pub dropout: Dropout,
}

impl<B: Backend> DenseClassifier<B> {
    /// images: [batch, H, W, 3] → logits: [batch, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = images.flatten::<2>(1, 3);
        let x = burn::tensor::activation::relu(self.hidden.forward(x));
        let x = self.dropout.forward(x);
        self.output.forward(x)
    }

    /// Softmax-normalised class distribution: rows sum to 1.
    pub fn probabilities(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        burn::tensor::activation::softmax(self.forward(images), 1)
    }

    /// Predicted label index per sample: [batch].
    /// Ties resolve to the lowest index (argmax keeps the first
    /// occurrence of the maximum).
    pub fn predict(&self, images: Tensor<B, 4>) -> Tensor<B, 1, Int> {
        self.probabilities(images).argmax(1).flatten::<1>(0, 1)
    }

    pub fn forward_loss(
        &self,
        images:  Tensor<B, 4>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>)
    where
        B: AutodiffBackend,
    {
        let logits = self.forward(images);
        let ce = CrossEntropyLossConfig::new().init(&logits.device());
        let loss = ce.forward(logits.clone(), targets);
        (loss, logits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn tiny_model() -> DenseClassifier<TestBackend> {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        DenseClassifierConfig::new(4, 2, 8, 0.5).init(&device)
    }

    #[test]
    fn test_forward_shape() {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let model = tiny_model();
        let input = Tensor::<TestBackend, 4>::zeros([3, 4, 4, 3], &device);
        assert_eq!(model.forward(input).dims(), [3, 2]);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let model = tiny_model();
        let input = Tensor::<TestBackend, 4>::ones([2, 4, 4, 3], &device);
        let rows: Vec<f32> = model
            .probabilities(input)
            .sum_dim(1)
            .into_data()
            .to_vec()
            .unwrap();
        assert!(rows.iter().all(|&s| (s - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_predict_is_in_range() {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let model = tiny_model();
        let input = Tensor::<TestBackend, 4>::zeros([5, 4, 4, 3], &device);
        let predictions: Vec<i64> = model.predict(input).into_data().to_vec().unwrap();
        assert_eq!(predictions.len(), 5);
        assert!(predictions.iter().all(|&p| p == 0 || p == 1));
    }
}
