// ============================================================
// Layer 3 — Corpus Domain Types
// ============================================================
// A training corpus, in domain terms, is an ordered label set
// plus a list of image paths each tagged with its label index.
// Nothing here has been decoded yet — these are pointers into
// the corpus directory, produced by the data layer's scan.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::label::LabelSet;

/// One corpus entry: where the image lives and which class it
/// belongs to. The label is an index into the run's LabelSet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledImage {
    pub path:  PathBuf,
    pub label: usize,
}

impl LabeledImage {
    pub fn new(path: impl Into<PathBuf>, label: usize) -> Self {
        Self { path: path.into(), label }
    }
}

/// The result of scanning a corpus directory: the label set
/// derived from (or validated against) the subdirectory layout,
/// and every image file found under it.
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    pub labels: LabelSet,
    pub images: Vec<LabeledImage>,
}

impl CorpusIndex {
    /// Number of images carrying the given label index.
    pub fn count_for(&self, label: usize) -> usize {
        self.images.iter().filter(|i| i.label == label).count()
    }
}
