// ============================================================
// Layer 5 — Cross-Validation Training Loop
// ============================================================
// Full k-fold train + validation loop using Burn's DataLoader
// and Adam.
//
// Per fold: a FRESH model (folds share no learned state), up to
// cfg.epochs passes over the fold's training partition, and a
// validation pass per epoch. Three monitors watch validation
// loss in a fixed order: snapshotting, lr decay, early stop.
//
// Snapshot selection is explicit and in-memory: each fold keeps
// its best weight record, the fold bests are compared after all
// folds complete, and exactly one winner is written to disk.
// Early stopping therefore "rolls back" for free — a halted
// fold's result is its best snapshot, not its final weights.
//
// Backend split:
//   - Training uses TrainBackend (Autodiff<NdArray>) for gradients
//   - model.valid() returns the model on ValidBackend (NdArray)
//   - Validation batches must also use ValidBackend
//   - argmax(1) returns [batch,1] so we flatten before .equal()

use anyhow::{ensure, Context, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::batcher::ClassBatcher;
use crate::data::dataset::ImageDataset;
use crate::data::splitter::{plan_folds, Fold};
use crate::domain::label::LabelSet;
use crate::infra::checkpoint::{BestSnapshotMeta, CheckpointManager};
use crate::infra::metrics::{EpochRow, MetricsLogger};
use crate::ml::model::{DenseClassifier, DenseClassifierConfig, DenseClassifierRecord};
use crate::ml::monitors::{
    Action, EarlyStopping, EpochMonitor, EpochStats, ReduceLrOnPlateau, Snapshotting,
};

type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
type ValidBackend = burn::backend::NdArray;

/// Best-epoch record for one fold — kept for observability, not
/// for selection (the snapshot comparison below does that).
#[derive(Debug, Clone)]
pub struct FoldOutcome {
    pub fold:              usize,
    pub best_epoch:        usize,
    pub best_val_loss:     f64,
    pub best_val_accuracy: f64,
}

/// A fold's best weights plus the metrics at capture time.
struct FoldBest {
    record:  DenseClassifierRecord<TrainBackend>,
    outcome: FoldOutcome,
}

/// Run the full cross-validation, persist the single best
/// snapshot across all folds, and return it loaded into a fresh
/// inference-backend model.
pub fn run_training(
    cfg:     &TrainConfig,
    labels:  &LabelSet,
    dataset: ImageDataset,
    ckpt:    &CheckpointManager,
    history: &MetricsLogger,
) -> Result<(DenseClassifier<ValidBackend>, Vec<FoldOutcome>)> {
    ensure!(cfg.folds >= 2, "cross-validation needs at least 2 folds");
    ensure!(
        dataset.sample_count() >= cfg.folds,
        "corpus has {} usable images but {} folds were requested",
        dataset.sample_count(),
        cfg.folds,
    );

    let device = burn::backend::ndarray::NdArrayDevice::default();
    let folds = plan_folds(dataset.sample_count(), cfg.folds, cfg.fold_seed);

    let mut outcomes: Vec<FoldOutcome> = Vec::with_capacity(folds.len());
    let mut run_best: Option<FoldBest> = None;

    for (fold_index, fold) in folds.iter().enumerate() {
        tracing::info!(
            "Fold {}/{}: {} train / {} validation samples",
            fold_index + 1,
            folds.len(),
            fold.train.len(),
            fold.validation.len(),
        );

        let fold_best = train_fold(cfg, labels, &dataset, fold, fold_index, history, &device)?;

        match fold_best {
            Some(best) => {
                tracing::info!(
                    "Fold {} best: epoch {} val_loss={:.4} val_acc={:.1}%",
                    fold_index + 1,
                    best.outcome.best_epoch,
                    best.outcome.best_val_loss,
                    best.outcome.best_val_accuracy * 100.0,
                );
                outcomes.push(best.outcome.clone());
                let improves = run_best
                    .as_ref()
                    .map(|b| best.outcome.best_val_loss < b.outcome.best_val_loss)
                    .unwrap_or(true);
                if improves {
                    run_best = Some(best);
                }
            }
            None => {
                tracing::warn!(
                    "Fold {} produced no usable snapshot (validation loss never settled)",
                    fold_index + 1,
                );
            }
        }
    }

    let winner = run_best.context("no fold produced a usable snapshot")?;
    let meta = BestSnapshotMeta {
        fold:         winner.outcome.fold,
        epoch:        winner.outcome.best_epoch,
        val_loss:     winner.outcome.best_val_loss,
        val_accuracy: winner.outcome.best_val_accuracy,
    };
    tracing::info!(
        "Winning snapshot: fold {} epoch {} (val_loss={:.4}) — writing checkpoint",
        meta.fold + 1,
        meta.epoch,
        meta.val_loss,
    );
    ckpt.save_model(winner.record)?;
    ckpt.save_best(&meta)?;

    // Reload the persisted winner into an inference-backend model
    // so what we return is exactly what later processes will load.
    let model_cfg =
        DenseClassifierConfig::new(cfg.resolution, labels.len(), cfg.hidden_size, cfg.dropout);
    let model: DenseClassifier<ValidBackend> = model_cfg.init(&device);
    let model = ckpt.load_model(model, &device)?;

    Ok((model, outcomes))
}

/// One fold: fresh model, epoch loop, monitors, in-memory best.
fn train_fold(
    cfg:        &TrainConfig,
    labels:     &LabelSet,
    dataset:    &ImageDataset,
    fold:       &Fold,
    fold_index: usize,
    history:    &MetricsLogger,
    device:     &burn::backend::ndarray::NdArrayDevice,
) -> Result<Option<FoldBest>> {
    // ── Fresh model and optimiser — no state crosses folds ────────────────────
    let model_cfg =
        DenseClassifierConfig::new(cfg.resolution, labels.len(), cfg.hidden_size, cfg.dropout);
    let mut model: DenseClassifier<TrainBackend> = model_cfg.init(device);

    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();
    let mut lr = cfg.lr;

    // ── Data loaders over this fold's partitions ──────────────────────────────
    let train_batcher = ClassBatcher::<TrainBackend>::new(device.clone(), cfg.resolution);
    let train_loader = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.fold_seed)
        .num_workers(1)
        .build(dataset.subset(&fold.train));

    let val_batcher = ClassBatcher::<ValidBackend>::new(device.clone(), cfg.resolution);
    let val_loader = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(dataset.subset(&fold.validation));

    // ── Monitors, fresh per fold, applied in this order ───────────────────────
    let mut snapshotting = Snapshotting::new();
    let mut lr_decay =
        ReduceLrOnPlateau::new(cfg.lr, cfg.lr_patience, cfg.lr_factor, cfg.min_lr);
    let mut early_stopping = EarlyStopping::new(cfg.early_stop_patience);

    let mut fold_best: Option<FoldBest> = None;

    for epoch in 1..=cfg.epochs {
        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.images, batch.targets);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            train_batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else {
            f64::NAN
        };

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → DenseClassifier<ValidBackend>,
        // dropout disabled for deterministic evaluation
        let model_valid = model.valid();

        let mut val_loss_sum  = 0.0f64;
        let mut val_batches   = 0usize;
        let mut correct       = 0usize;
        let mut total_samples = 0usize;

        for batch in val_loader.iter() {
            let logits = model_valid.forward(batch.images);

            let ce = burn::nn::loss::CrossEntropyLossConfig::new()
                .init(&logits.device());
            let batch_loss: f64 = ce
                .forward(logits.clone(), batch.targets.clone())
                .into_scalar()
                .elem::<f64>();
            val_loss_sum += batch_loss;
            val_batches  += 1;

            // argmax(1) returns shape [batch, 1] — flatten to [batch]
            // before comparing with targets which is [batch]
            let predictions = logits.argmax(1).flatten::<1>(0, 1);
            total_samples += batch.targets.dims()[0];
            let batch_correct: i64 = predictions
                .equal(batch.targets)
                .int()
                .sum()
                .into_scalar()
                .elem::<i64>();
            correct += batch_correct as usize;
        }

        let avg_val_loss = if val_batches > 0 { val_loss_sum / val_batches as f64 } else { f64::NAN };
        let val_accuracy = if total_samples > 0 { correct as f64 / total_samples as f64 } else { 0.0 };

        tracing::info!(
            "Fold {} epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | val_acc={:.1}%",
            fold_index + 1, epoch, cfg.epochs, avg_train_loss, avg_val_loss, val_accuracy * 100.0,
        );

        let stats = EpochStats {
            fold: fold_index,
            epoch,
            train_loss: avg_train_loss,
            val_loss: avg_val_loss,
            val_accuracy,
        };
        history.log(&EpochRow::from_stats(&stats))?;

        // ── Apply the monitors in their fixed order ───────────────────────────
        let mut halt = false;
        for action in [
            snapshotting.on_epoch_end(&stats),
            lr_decay.on_epoch_end(&stats),
            early_stopping.on_epoch_end(&stats),
        ] {
            match action {
                Action::Continue => {}
                Action::Snapshot => {
                    fold_best = Some(FoldBest {
                        record: model.clone().into_record(),
                        outcome: FoldOutcome {
                            fold:              fold_index,
                            best_epoch:        epoch,
                            best_val_loss:     avg_val_loss,
                            best_val_accuracy: val_accuracy,
                        },
                    });
                }
                Action::AdjustLr(next) => {
                    tracing::info!(
                        "Fold {} epoch {}: plateau — learning rate {:.2e} → {:.2e}",
                        fold_index + 1, epoch, lr, next,
                    );
                    lr = next;
                }
                Action::Stop => {
                    tracing::info!(
                        "Fold {} epoch {}: early stop — keeping best snapshot",
                        fold_index + 1, epoch,
                    );
                    halt = true;
                }
            }
        }

        if halt {
            break;
        }
    }

    Ok(fold_best)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::PixelSample;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("petlens-trainer-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Two well-separated clusters: class 0 is dark, class 1 is
    /// bright. Trivially learnable, so even two epochs on a tiny
    /// model make training loss move.
    fn synthetic_dataset(resolution: usize, per_class: usize) -> ImageDataset {
        let pixel_count = resolution * resolution * 3;
        let mut samples = Vec::new();
        for i in 0..per_class {
            let jitter = (i % 5) as f32 * 0.01;
            samples.push(PixelSample { pixels: vec![0.1 + jitter; pixel_count], label: 0 });
            samples.push(PixelSample { pixels: vec![0.9 - jitter; pixel_count], label: 1 });
        }
        ImageDataset::new(samples)
    }

    fn tiny_config(dir: &PathBuf) -> TrainConfig {
        TrainConfig {
            corpus_dir:          dir.join("corpus").to_string_lossy().into_owned(),
            checkpoint_dir:      dir.join("ckpt").to_string_lossy().into_owned(),
            labels:              None,
            resolution:          4,
            hidden_size:         8,
            dropout:             0.5,
            batch_size:          4,
            epochs:              2,
            lr:                  1e-2,
            folds:               2,
            fold_seed:           42,
            early_stop_patience: 5,
            lr_patience:         3,
            lr_factor:           0.2,
            min_lr:              1e-6,
        }
    }

    #[test]
    fn test_run_training_writes_one_checkpoint_and_returns_model() {
        let dir = scratch_dir("full");
        let cfg = tiny_config(&dir);
        let labels = LabelSet::new(["cat", "dog"]);
        let dataset = synthetic_dataset(cfg.resolution, 8);

        let ckpt = CheckpointManager::new(cfg.checkpoint_dir.clone());
        let history = MetricsLogger::new(cfg.checkpoint_dir.clone()).unwrap();

        let (model, outcomes) =
            run_training(&cfg, &labels, dataset, &ckpt, &history).unwrap();

        assert!(ckpt.exists());
        assert_eq!(outcomes.len(), 2);

        // the persisted winner is the minimum of the fold bests
        let best = ckpt.load_best().unwrap();
        let min_loss = outcomes
            .iter()
            .map(|o| o.best_val_loss)
            .fold(f64::INFINITY, f64::min);
        assert!((best.val_loss - min_loss).abs() < 1e-9);

        // the returned model predicts in label range
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let probe = Tensor::<ValidBackend, 4>::zeros([1, 4, 4, 3], &device);
        let prediction: i64 = model.predict(probe).into_scalar().elem::<i64>();
        assert!(prediction == 0 || prediction == 1);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_few_samples_for_folds_is_an_error() {
        let dir = scratch_dir("small");
        let mut cfg = tiny_config(&dir);
        cfg.folds = 5;
        let labels = LabelSet::new(["cat", "dog"]);
        let dataset = synthetic_dataset(cfg.resolution, 1); // 2 samples, 5 folds

        let ckpt = CheckpointManager::new(cfg.checkpoint_dir.clone());
        let history = MetricsLogger::new(cfg.checkpoint_dir.clone()).unwrap();

        assert!(run_training(&cfg, &labels, dataset, &ckpt, &history).is_err());
        assert!(!ckpt.exists());

        fs::remove_dir_all(&dir).ok();
    }
}
