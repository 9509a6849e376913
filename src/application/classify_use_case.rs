// ============================================================
// Layer 2 — Classify Use Case
// ============================================================
// The per-request workflow the boundary invokes: preprocess the
// uploaded file, run one forward pass, return the label string.
// A decode failure propagates as `ClassifierError::Decode` so
// the boundary can reject that request and keep serving.

use std::path::Path;

use anyhow::Result;

use crate::data::preprocessor::ImagePreprocessor;
use crate::domain::traits::LabelPredictor;
use crate::ml::classifier::Classifier;

pub struct ClassifyUseCase {
    preprocessor: ImagePreprocessor,
    classifier:   Classifier,
}

impl ClassifyUseCase {
    /// Wrap a resolved Classifier. The preprocessor target size
    /// comes from the classifier so the two can never disagree.
    pub fn new(classifier: Classifier) -> Self {
        let preprocessor = ImagePreprocessor::new(classifier.resolution());
        Self { preprocessor, classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }
}

impl LabelPredictor for ClassifyUseCase {
    fn classify_file(&self, path: &Path) -> Result<String> {
        let tensor = self.preprocessor.preprocess(path)?;
        let label = self.classifier.classify(&tensor)?;
        tracing::debug!("Classified '{}' as '{}'", path.display(), label);
        Ok(label.to_string())
    }
}
