// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence concerns:
//
//   checkpoint.rs — saving and loading the winning model
//                   snapshot (Burn CompactRecorder) plus its
//                   JSON sidecars: label set, train config, and
//                   best-epoch metadata
//
//   metrics.rs    — per-epoch training metrics appended to a
//                   CSV file for later analysis
//
// Reference: Burn Book §5 (Records and Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
