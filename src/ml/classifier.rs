// ============================================================
// Layer 5 — Classifier (Inference)
// ============================================================
// The value the boundary holds for the lifetime of the process:
// loaded weights plus the label set they were trained against.
// Pure per call — no learning, no mutation — so one instance
// can serve every request (share it behind Arc if the serving
// layer is concurrent).

use anyhow::{ensure, Result};
use burn::prelude::*;

use crate::data::preprocessor::ImageTensor;
use crate::domain::label::LabelSet;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{DenseClassifier, DenseClassifierConfig};

type InferBackend = burn::backend::NdArray;

#[derive(Debug)]
pub struct Classifier {
    model:      DenseClassifier<InferBackend>,
    labels:     LabelSet,
    resolution: usize,
    device:     burn::backend::ndarray::NdArrayDevice,
}

impl Classifier {
    pub fn new(
        model:      DenseClassifier<InferBackend>,
        labels:     LabelSet,
        resolution: usize,
        device:     burn::backend::ndarray::NdArrayDevice,
    ) -> Self {
        Self { model, labels, resolution, device }
    }

    /// Rebuild the trained model from a checkpoint directory.
    /// The persisted config fixes the architecture; the persisted
    /// label set fixes the output mapping. Dropout is passed as
    /// 0.0 — it is identity at inference either way.
    pub fn from_checkpoint(ckpt: &CheckpointManager) -> Result<Self> {
        let cfg    = ckpt.load_config()?;
        let labels = ckpt.load_labels()?;
        let device = burn::backend::ndarray::NdArrayDevice::default();

        let model_cfg =
            DenseClassifierConfig::new(cfg.resolution, labels.len(), cfg.hidden_size, 0.0);
        let model: DenseClassifier<InferBackend> = model_cfg.init(&device);
        let model = ckpt.load_model(model, &device)?;

        tracing::info!(
            "Classifier ready: {} classes ({}), {}x{} input",
            labels.len(),
            labels.names().join(", "),
            cfg.resolution,
            cfg.resolution,
        );
        Ok(Self { model, labels, resolution: cfg.resolution, device })
    }

    /// Classify one preprocessed image. Always returns a member
    /// of this classifier's label set.
    pub fn classify(&self, tensor: &ImageTensor) -> Result<&str> {
        let [_, height, width, channels] = tensor.shape();
        ensure!(
            height == self.resolution && width == self.resolution,
            "input is {height}x{width} but the model expects {0}x{0}",
            self.resolution,
        );

        let input = Tensor::<InferBackend, 1>::from_floats(tensor.pixels(), &self.device)
            .reshape([1, height, width, channels]);

        let index = self.model.predict(input).into_scalar().elem::<i64>() as usize;

        // predict() argmaxes over exactly labels.len() logits, so
        // the index is always in range; the lookup keeps the
        // invariant explicit instead of panicking on a bug.
        self.labels
            .get(index)
            .ok_or_else(|| anyhow::anyhow!("model produced out-of-range class index {index}"))
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }
}
