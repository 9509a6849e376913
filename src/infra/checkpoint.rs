// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores the winning model snapshot using Burn's
// CompactRecorder, plus the sidecar files inference needs to
// rebuild it:
//
//   checkpoints/
//     model.mpk.gz       ← the winning weights (one slot; the
//                          trainer writes it exactly once, after
//                          cross-fold selection)
//     labels.json        ← ordered label set the model maps to
//     train_config.json  ← architecture + hyperparameters
//     best.json          ← which fold/epoch won, and its metrics
//
// Without the config sidecar the exact architecture (resolution,
// hidden size) can't be reconstructed before loading weights;
// without labels.json the output indices would be meaningless.
//
// Load failures are `CheckpointCorrupt` and deliberately fatal
// upstream: a half-readable checkpoint never silently falls back
// to retraining.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::domain::error::ClassifierError;
use crate::domain::label::LabelSet;
use crate::ml::model::{DenseClassifier, DenseClassifierRecord};

/// Weights file stem — CompactRecorder appends `.mpk.gz`.
const MODEL_STEM: &str = "model";
const MODEL_ARCHIVE: &str = "model.mpk.gz";
const LABELS_FILE: &str = "labels.json";
const CONFIG_FILE: &str = "train_config.json";
const BEST_FILE: &str = "best.json";

/// Metadata for the persisted snapshot: where in the run it came
/// from and how it scored at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestSnapshotMeta {
    pub fold:         usize,
    pub epoch:        usize,
    pub val_loss:     f64,
    pub val_accuracy: f64,
}

/// Manages the checkpoint directory. All artifacts live flat in
/// the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager, creating the directory if
    /// it doesn't already exist.
    pub fn new(dir: impl Into<String>) -> Self {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Whether a persisted model snapshot exists. Only the weights
    /// archive matters here — sidecar problems surface as
    /// `CheckpointCorrupt` at load time.
    pub fn exists(&self) -> bool {
        self.dir.join(MODEL_ARCHIVE).exists()
    }

    /// Persist the winning weight record. Called exactly once per
    /// training run, after cross-fold selection.
    pub fn save_model<B: Backend>(&self, record: DenseClassifierRecord<B>) -> Result<()> {
        let path = self.dir.join(MODEL_STEM);
        CompactRecorder::new()
            .record(record, path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;
        tracing::debug!("Saved model snapshot to '{}'", path.display());
        Ok(())
    }

    /// Load the persisted weights into `model`. The model must
    /// already have the matching architecture (rebuild it from
    /// `load_config` first) or deserialization fails.
    pub fn load_model<B: Backend>(
        &self,
        model:  DenseClassifier<B>,
        device: &B::Device,
    ) -> Result<DenseClassifier<B>, ClassifierError> {
        let path = self.dir.join(MODEL_STEM);
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .map_err(|e| {
                ClassifierError::checkpoint_corrupt(self.dir.join(MODEL_ARCHIVE), e)
            })?;
        Ok(model.load_record(record))
    }

    pub fn save_labels(&self, labels: &LabelSet) -> Result<()> {
        let path = self.dir.join(LABELS_FILE);
        fs::write(&path, serde_json::to_string_pretty(labels)?)
            .with_context(|| format!("Cannot write labels to '{}'", path.display()))?;
        Ok(())
    }

    pub fn load_labels(&self) -> Result<LabelSet, ClassifierError> {
        self.read_json(LABELS_FILE)
    }

    /// Save the training configuration. Called before training
    /// starts so inference can rebuild the exact architecture.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        fs::write(&path, serde_json::to_string_pretty(cfg)?)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig, ClassifierError> {
        self.read_json(CONFIG_FILE)
    }

    pub fn save_best(&self, meta: &BestSnapshotMeta) -> Result<()> {
        let path = self.dir.join(BEST_FILE);
        fs::write(&path, serde_json::to_string_pretty(meta)?)
            .with_context(|| format!("Cannot write snapshot metadata to '{}'", path.display()))?;
        Ok(())
    }

    pub fn load_best(&self) -> Result<BestSnapshotMeta, ClassifierError> {
        self.read_json(BEST_FILE)
    }

    /// Read and deserialize one JSON sidecar; any failure —
    /// missing file included — means the checkpoint as a whole is
    /// unusable.
    fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        file: &str,
    ) -> Result<T, ClassifierError> {
        let path = self.dir.join(file);
        let json = fs::read_to_string(&path)
            .map_err(|e| ClassifierError::checkpoint_corrupt(&path, e))?;
        serde_json::from_str(&json)
            .map_err(|e| ClassifierError::checkpoint_corrupt(&path, e))
    }
}
