// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Scan the corpus directory   (Layer 4 - data)
//   Step 2: Decode + normalise images   (Layer 4 - data)
//   Step 3: Save config + labels        (Layer 6 - infra)
//   Step 4: Run cross-validation loop   (Layer 5 - ml)
//
// The corpus scan runs FIRST: a missing or empty corpus must
// abort before any fold starts and before anything is written
// to the checkpoint directory.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::corpus::CorpusLoader;
use crate::data::dataset::{ImageDataset, PixelSample};
use crate::data::preprocessor::ImagePreprocessor;
use crate::domain::error::ClassifierError;
use crate::domain::sample::CorpusIndex;
use crate::domain::traits::CorpusSource;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::MetricsLogger;
use crate::ml::trainer::{run_training, FoldOutcome};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Serialisable so it can
// be saved next to the checkpoint and reloaded for inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub corpus_dir:          String,
    pub checkpoint_dir:      String,
    /// Explicit ordered label list; None derives it from the
    /// sorted corpus subdirectory names.
    pub labels:              Option<Vec<String>>,
    pub resolution:          usize,
    pub hidden_size:         usize,
    pub dropout:             f64,
    pub batch_size:          usize,
    pub epochs:              usize,
    pub lr:                  f64,
    pub folds:               usize,
    pub fold_seed:           u64,
    pub early_stop_patience: usize,
    pub lr_patience:         usize,
    pub lr_factor:           f64,
    pub min_lr:              f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            corpus_dir:          "data/corpus".to_string(),
            checkpoint_dir:      "checkpoints".to_string(),
            labels:              None,
            resolution:          150,
            hidden_size:         512,
            dropout:             0.5,
            batch_size:          16,
            epochs:              20,
            lr:                  1e-3,
            folds:               5,
            fold_seed:           42,
            early_stop_patience: 5,
            lr_patience:         3,
            lr_factor:           0.2,
            min_lr:              1e-6,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end. Returns the
    /// per-fold best records for observability.
    pub fn execute(&self) -> Result<Vec<FoldOutcome>> {
        let cfg = &self.config;

        // ── Step 1: Scan the corpus ───────────────────────────────────────────
        tracing::info!("Scanning corpus at '{}'", cfg.corpus_dir);
        let loader = CorpusLoader::new(&cfg.corpus_dir, cfg.labels.clone());
        let corpus = loader.scan()?;

        // ── Step 2: Decode every image up front ───────────────────────────────
        // Undecodable files are skipped with a warning, matching
        // how the serving path treats them: one bad image is a
        // request-level problem, not a fatal one. A corpus with
        // NOTHING decodable is fatal, though.
        let dataset = self.decode_corpus(&corpus)?;
        tracing::info!(
            "Decoded {} of {} corpus images at {}x{}",
            dataset.sample_count(),
            corpus.images.len(),
            cfg.resolution,
            cfg.resolution,
        );

        // ── Step 3: Persist config + labels for inference ─────────────────────
        let ckpt = CheckpointManager::new(cfg.checkpoint_dir.clone());
        ckpt.save_config(cfg)?;
        ckpt.save_labels(&corpus.labels)?;

        // ── Step 4: Run the cross-validation loop ─────────────────────────────
        let history = MetricsLogger::new(cfg.checkpoint_dir.clone())?;
        let (_model, outcomes) =
            run_training(cfg, &corpus.labels, dataset, &ckpt, &history)?;

        for outcome in &outcomes {
            tracing::info!(
                "Fold {}: best epoch {} — val_loss={:.4}, val_acc={:.1}%",
                outcome.fold + 1,
                outcome.best_epoch,
                outcome.best_val_loss,
                outcome.best_val_accuracy * 100.0,
            );
        }
        Ok(outcomes)
    }

    fn decode_corpus(&self, corpus: &CorpusIndex) -> Result<ImageDataset, ClassifierError> {
        let preprocessor = ImagePreprocessor::new(self.config.resolution);
        let mut samples = Vec::with_capacity(corpus.images.len());

        for image in &corpus.images {
            match preprocessor.preprocess(&image.path) {
                Ok(tensor) => samples.push(PixelSample {
                    pixels: tensor.pixels().to_vec(),
                    label:  image.label,
                }),
                Err(e) => tracing::warn!("Skipping '{}': {}", image.path.display(), e),
            }
        }

        if samples.is_empty() {
            return Err(ClassifierError::corpus(
                &self.config.corpus_dir,
                "no image in the corpus could be decoded",
            ));
        }
        Ok(ImageDataset::new(samples))
    }
}
