use burn::data::dataset::Dataset;

/// One decoded, normalised training sample: the flattened
/// H × W × 3 pixel values in [0,1] plus the label index.
#[derive(Debug, Clone)]
pub struct PixelSample {
    pub pixels: Vec<f32>,
    pub label:  usize,
}

/// In-memory dataset of decoded corpus images, in corpus scan
/// order. Fold membership is expressed with `subset`.
pub struct ImageDataset {
    samples: Vec<PixelSample>,
}

impl ImageDataset {
    pub fn new(samples: Vec<PixelSample>) -> Self {
        Self { samples }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// A new dataset holding clones of the samples at `indices`,
    /// in the given order. Out-of-range indices are a bug in the
    /// fold planner, so they panic rather than silently skip.
    pub fn subset(&self, indices: &[usize]) -> ImageDataset {
        let samples = indices.iter().map(|&i| self.samples[i].clone()).collect();
        ImageDataset::new(samples)
    }
}

impl Dataset<PixelSample> for ImageDataset {
    fn get(&self, index: usize) -> Option<PixelSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(label: usize) -> PixelSample {
        PixelSample { pixels: vec![label as f32; 12], label }
    }

    #[test]
    fn test_subset_selects_in_order() {
        let dataset = ImageDataset::new((0..5).map(sample).collect());
        let sub = dataset.subset(&[4, 0, 2]);
        assert_eq!(sub.sample_count(), 3);
        assert_eq!(sub.get(0).unwrap().label, 4);
        assert_eq!(sub.get(1).unwrap().label, 0);
        assert_eq!(sub.get(2).unwrap().label, 2);
    }

    #[test]
    fn test_get_out_of_range_is_none() {
        let dataset = ImageDataset::new(vec![sample(0)]);
        assert!(dataset.get(1).is_none());
    }
}
