// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `classify`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the classifier on a labelled image corpus
    Train(TrainArgs),

    /// Classify one image file using the resolved model
    Classify(ClassifyArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Corpus root: one subdirectory per label, images inside
    #[arg(long, default_value = "data/corpus")]
    pub corpus_dir: String,

    /// Directory for the checkpoint and its sidecar files
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Explicit ordered label list (e.g. --labels cat,dog).
    /// Defaults to the sorted corpus subdirectory names.
    #[arg(long, value_delimiter = ',')]
    pub labels: Option<Vec<String>>,

    /// Square input resolution images are resized to
    #[arg(long, default_value_t = 150)]
    pub resolution: usize,

    /// Width of the dense hidden layer
    #[arg(long, default_value_t = 512)]
    pub hidden_size: usize,

    /// Dropout probability applied after the hidden layer
    /// during training (identity at inference)
    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 16)]
    pub batch_size: usize,

    /// Maximum epochs per fold (early stopping may end sooner)
    #[arg(long, default_value_t = 20)]
    pub epochs: usize,

    /// Initial Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Number of cross-validation folds
    #[arg(long, default_value_t = 5)]
    pub folds: usize,

    /// Seed for the deterministic fold shuffle — same corpus and
    /// seed always yield the same partition
    #[arg(long, default_value_t = 42)]
    pub fold_seed: u64,

    /// Epochs without validation improvement before a fold halts
    #[arg(long, default_value_t = 5)]
    pub early_stop_patience: usize,

    /// Epochs without improvement before the learning rate decays
    #[arg(long, default_value_t = 3)]
    pub lr_patience: usize,

    /// Multiplier applied to the learning rate on plateau
    #[arg(long, default_value_t = 0.2)]
    pub lr_factor: f64,

    /// Learning rate floor
    #[arg(long, default_value_t = 1e-6)]
    pub min_lr: f64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            corpus_dir:          a.corpus_dir,
            checkpoint_dir:      a.checkpoint_dir,
            labels:              a.labels,
            resolution:          a.resolution,
            hidden_size:         a.hidden_size,
            dropout:             a.dropout,
            batch_size:          a.batch_size,
            epochs:              a.epochs,
            lr:                  a.lr,
            folds:               a.folds,
            fold_seed:           a.fold_seed,
            early_stop_patience: a.early_stop_patience,
            lr_patience:         a.lr_patience,
            lr_factor:           a.lr_factor,
            min_lr:              a.min_lr,
        }
    }
}

/// All arguments for the `classify` command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// The image file to classify
    #[arg(long)]
    pub image: PathBuf,

    /// Corpus root, used only if no checkpoint exists yet
    #[arg(long, default_value = "data/corpus")]
    pub corpus_dir: String,

    /// Directory where a checkpoint was (or will be) saved
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

impl ClassifyArgs {
    /// Lifecycle config for the classify path: the given
    /// directories over the default hyperparameters. A fresh
    /// training run triggered from here uses those defaults; an
    /// existing checkpoint carries its own persisted config.
    pub fn config(&self) -> TrainConfig {
        TrainConfig {
            corpus_dir:     self.corpus_dir.clone(),
            checkpoint_dir: self.checkpoint_dir.clone(),
            ..TrainConfig::default()
        }
    }
}
