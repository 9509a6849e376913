// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Three failure classes cross this core's seams:
//
//   Decode            — a request-level failure; the boundary
//                       rejects the upload and keeps serving
//   Corpus            — fatal at startup; training cannot begin
//   CheckpointCorrupt — fatal at startup; persisted weights are
//                       unreadable and there is NO automatic
//                       retrain fallback (operator must act)
//
// All failure paths are fail-fast; no retries anywhere.
// Layers above wrap these with anyhow context; matching on the
// variant stays possible through the anyhow chain.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The file could not be read or is not a decodable image.
    #[error("cannot decode image '{path}': {reason}")]
    Decode { path: PathBuf, reason: String },

    /// The training corpus directory is missing, unreadable,
    /// or contains no usable images.
    #[error("training corpus unusable at '{dir}': {reason}")]
    Corpus { dir: PathBuf, reason: String },

    /// A persisted checkpoint artifact exists but cannot be
    /// deserialized. Deliberately not recovered from: delete the
    /// checkpoint directory to force a retrain.
    #[error("checkpoint artifact '{path}' is corrupt: {reason}")]
    CheckpointCorrupt { path: PathBuf, reason: String },
}

impl ClassifierError {
    pub fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Decode { path: path.into(), reason: reason.to_string() }
    }

    pub fn corpus(dir: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Corpus { dir: dir.into(), reason: reason.to_string() }
    }

    pub fn checkpoint_corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::CheckpointCorrupt { path: path.into(), reason: reason.to_string() }
    }
}
