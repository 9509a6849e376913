// ============================================================
// Layer 2 — Model Lifecycle
// ============================================================
// Resolves the model exactly once at process start:
//
//   CHECK ──checkpoint exists──▶ LOAD ──▶ READY
//     │                           │
//     └──────no checkpoint──▶ TRAIN ──▶ READY
//
// LOAD failures (corrupt artifacts) are fatal: the process must
// not silently fall back to retraining — an operator deletes the
// checkpoint directory deliberately if that is what they want.
// TRAIN failures (missing/empty corpus) are equally fatal: there
// is no model to serve with.
//
// READY hands back a Classifier VALUE. Callers own it and pass
// it into their request handlers explicitly — there is no
// process-wide global here.

use anyhow::{Context, Result};

use crate::application::train_use_case::{TrainConfig, TrainUseCase};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::classifier::Classifier;

pub struct ModelLifecycle {
    config: TrainConfig,
}

impl ModelLifecycle {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Produce the one Classifier this process will serve with.
    pub fn resolve(&self) -> Result<Classifier> {
        let ckpt = CheckpointManager::new(self.config.checkpoint_dir.clone());

        if ckpt.exists() {
            // LOAD
            let best = ckpt.load_best()?;
            tracing::info!(
                "Checkpoint found in '{}' — serving fold {} epoch {} snapshot \
                 (val_loss={:.4}, val_acc={:.1}%)",
                self.config.checkpoint_dir,
                best.fold + 1,
                best.epoch,
                best.val_loss,
                best.val_accuracy * 100.0,
            );
            Classifier::from_checkpoint(&ckpt)
                .context("existing checkpoint could not be loaded; refusing to retrain implicitly")
        } else {
            // TRAIN
            tracing::info!(
                "No checkpoint in '{}' — training from corpus '{}'",
                self.config.checkpoint_dir,
                self.config.corpus_dir,
            );
            TrainUseCase::new(self.config.clone()).execute()?;
            Classifier::from_checkpoint(&ckpt)
                .context("training finished but the written checkpoint could not be loaded")
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::preprocessor::ImagePreprocessor;
    use crate::domain::error::ClassifierError;
    use image::{Rgb, RgbImage};
    use std::fs;
    use std::path::{Path, PathBuf};

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("petlens-lifecycle-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn tiny_config(dir: &Path) -> TrainConfig {
        TrainConfig {
            corpus_dir:     dir.join("corpus").to_string_lossy().into_owned(),
            checkpoint_dir: dir.join("ckpt").to_string_lossy().into_owned(),
            resolution:     8,
            hidden_size:    8,
            batch_size:     4,
            epochs:         2,
            folds:          2,
            ..TrainConfig::default()
        }
    }

    /// A toy corpus: dark cats, bright dogs, six of each.
    fn write_corpus(corpus_dir: &Path) {
        for (name, value) in [("cat", 40u8), ("dog", 220u8)] {
            let label_dir = corpus_dir.join(name);
            fs::create_dir_all(&label_dir).unwrap();
            for i in 0..6 {
                let shade = value + i as u8;
                RgbImage::from_pixel(8, 8, Rgb([shade, shade, shade]))
                    .save(label_dir.join(format!("{i}.png")))
                    .unwrap();
            }
        }
    }

    #[test]
    fn test_missing_corpus_is_fatal_and_writes_no_checkpoint() {
        let dir = scratch_dir("nocorpus");
        let cfg = tiny_config(&dir);

        let err = ModelLifecycle::new(cfg.clone()).resolve().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClassifierError>(),
            Some(ClassifierError::Corpus { .. })
        ));
        assert!(!CheckpointManager::new(cfg.checkpoint_dir).exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_trains_then_serves_when_no_checkpoint_exists() {
        let dir = scratch_dir("train");
        let cfg = tiny_config(&dir);
        write_corpus(Path::new(&cfg.corpus_dir));

        let classifier = ModelLifecycle::new(cfg.clone()).resolve().unwrap();
        assert_eq!(classifier.labels().names(), &["cat".to_string(), "dog".to_string()]);

        // classify a fresh image end to end: preprocess + predict
        let probe = dir.join("probe.png");
        RgbImage::from_pixel(8, 8, Rgb([50, 50, 50])).save(&probe).unwrap();
        let tensor = ImagePreprocessor::new(8).preprocess(&probe).unwrap();
        let label = classifier.classify(&tensor).unwrap();
        assert!(classifier.labels().contains(label));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_existing_checkpoint_skips_training_entirely() {
        let dir = scratch_dir("skip");
        let cfg = tiny_config(&dir);
        write_corpus(Path::new(&cfg.corpus_dir));

        // first resolution trains and writes the checkpoint
        ModelLifecycle::new(cfg.clone()).resolve().unwrap();

        // remove the corpus: a second resolution can only succeed
        // by loading — any training attempt would fail
        fs::remove_dir_all(&cfg.corpus_dir).unwrap();
        let classifier = ModelLifecycle::new(cfg).resolve().unwrap();
        assert_eq!(classifier.labels().len(), 2);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_corrupt_checkpoint_is_fatal_not_a_retrain() {
        let dir = scratch_dir("corrupt");
        let cfg = tiny_config(&dir);
        write_corpus(Path::new(&cfg.corpus_dir));

        ModelLifecycle::new(cfg.clone()).resolve().unwrap();

        // truncate the weights archive in place
        let archive = Path::new(&cfg.checkpoint_dir).join("model.mpk.gz");
        fs::write(&archive, b"garbage").unwrap();

        let err = ModelLifecycle::new(cfg).resolve().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClassifierError>(),
            Some(ClassifierError::CheckpointCorrupt { .. })
        ));

        fs::remove_dir_all(&dir).ok();
    }
}
