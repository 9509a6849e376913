// ============================================================
// Layer 4 — Classification Batcher
// ============================================================
// Implements Burn's Batcher trait to stack a Vec<PixelSample>
// into the tensors one training or validation step consumes.
//
//   Input:  N samples, each H*W*3 floats + a label index
//   Output: images  [N, H, W, 3]  (Float)
//           targets [N]           (Int)
//
// All samples are preprocessed to the same resolution before
// they reach the dataset, so no padding is needed here — the
// flatten-then-reshape is exact.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::PixelSample;

// ─── ClassBatch ───────────────────────────────────────────────────────────────
/// A batch of image samples ready for a forward pass.
#[derive(Debug, Clone)]
pub struct ClassBatch<B: Backend> {
    /// Pixel values — shape: [batch, height, width, 3]
    pub images: Tensor<B, 4>,

    /// Ground-truth label indices — shape: [batch]
    pub targets: Tensor<B, 1, Int>,
}

// ─── ClassBatcher ─────────────────────────────────────────────────────────────
/// Holds the target device and the sample resolution so the
/// flat pixel Vec can be reshaped back into [N, H, W, 3].
#[derive(Clone, Debug)]
pub struct ClassBatcher<B: Backend> {
    pub device: B::Device,
    height: usize,
    width:  usize,
}

impl<B: Backend> ClassBatcher<B> {
    pub fn new(device: B::Device, resolution: usize) -> Self {
        Self { device, height: resolution, width: resolution }
    }
}

impl<B: Backend> Batcher<PixelSample, ClassBatch<B>> for ClassBatcher<B> {
    fn batch(&self, items: Vec<PixelSample>) -> ClassBatch<B> {
        let batch_size = items.len();

        let pixel_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.pixels.iter().copied())
            .collect();

        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let images = Tensor::<B, 1>::from_floats(pixel_flat.as_slice(), &self.device)
            .reshape([batch_size, self.height, self.width, 3]);

        let targets = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        ClassBatch { images, targets }
    }
}
