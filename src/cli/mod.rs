// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// The entry point for all user interaction, and the in-repo
// stand-in for the web boundary: `classify` does exactly what a
// request handler would — resolve the model once, preprocess
// the file, print the label. All business logic is delegated to
// Layer 2 (application).
//
// Two commands are supported:
//   1. `train`    — runs cross-validated training on a corpus
//   2. `classify` — resolves the model (load or train) and
//                   classifies one image file

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{ClassifyArgs, Commands, TrainArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "petlens",
    version = "0.1.0",
    about = "Train a two-class pet photo classifier with cross-validation, then classify images."
)]
pub struct Cli {
    /// The subcommand to run (train or classify)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => Self::run_train(args),
            Commands::Classify(args) => Self::run_classify(args),
        }
    }

    /// Handles the `train` subcommand.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on corpus: {}", args.corpus_dir);

        // Convert CLI args → application config (separates presentation from domain)
        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Checkpoint saved.");
        Ok(())
    }

    /// Handles the `classify` subcommand.
    /// Resolves the model exactly once (LOAD if a checkpoint
    /// exists, TRAIN otherwise), then classifies the given file.
    fn run_classify(args: ClassifyArgs) -> Result<()> {
        use crate::application::classify_use_case::ClassifyUseCase;
        use crate::application::lifecycle::ModelLifecycle;
        use crate::domain::traits::LabelPredictor;

        let classifier = ModelLifecycle::new(args.config()).resolve()?;
        let use_case = ClassifyUseCase::new(classifier);

        let label = use_case.classify_file(&args.image)?;
        println!("\nPrediction: {}", label);
        Ok(())
    }
}
