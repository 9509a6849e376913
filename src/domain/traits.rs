// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams other layers implement. By programming against
// these instead of concrete types, implementations can be
// swapped without touching the callers:
//   - CorpusLoader implements CorpusSource
//   - ClassifyUseCase implements LabelPredictor
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::path::Path;

use anyhow::Result;

use crate::domain::error::ClassifierError;
use crate::domain::sample::CorpusIndex;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can enumerate a labelled training corpus.
///
/// Implementations:
///   - CorpusLoader → scans a labelled-image-folder directory tree
pub trait CorpusSource {
    /// Enumerate the corpus: derive the label set and list every
    /// image file. Fails with `ClassifierError::Corpus` when the
    /// corpus is missing or empty.
    fn scan(&self) -> Result<CorpusIndex, ClassifierError>;
}

// ─── LabelPredictor ───────────────────────────────────────────────────────────
/// Any component that can classify an image file into a label.
///
/// Implementations:
///   - ClassifyUseCase → preprocess + neural forward pass
pub trait LabelPredictor {
    /// Classify the image at `path`. The returned string is
    /// always a member of the model's label set.
    fn classify_file(&self, path: &Path) -> Result<String>;
}
