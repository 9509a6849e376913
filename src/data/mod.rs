// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the corpus directory on disk and the
// tensor batches the training loop consumes:
//
//   corpus directory (one subdir per label)
//       │
//       ▼
//   CorpusLoader      → derives the label set, lists image files
//       │
//       ▼
//   ImagePreprocessor → decodes, resizes, normalises to [0,1]
//       │
//       ▼
//   ImageDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   ClassBatcher      → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Each module is responsible for exactly one step.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Scans the labelled-image-folder corpus layout
pub mod corpus;

/// Decodes, resizes, and normalises image files
pub mod preprocessor;

/// Implements Burn's Dataset trait for decoded samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Plans the deterministic k-fold cross-validation partition
pub mod splitter;
