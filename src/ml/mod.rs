// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn framework specific code lives in this layer (plus
// the batcher and checkpoint modules it hands tensors to).
//
//   model.rs      — the dense classifier architecture:
//                   flatten → Linear(512) + ReLU → Dropout(0.5)
//                   → Linear(num_classes), cross-entropy loss
//
//   monitors.rs   — the epoch-end policies (snapshotting,
//                   learning-rate decay, early stopping) as
//                   explicit objects with one shared interface
//
//   trainer.rs    — the k-fold cross-validation loop: fresh
//                   model per fold, in-memory best snapshots,
//                   single winning checkpoint write
//
//   classifier.rs — the inference value handed to the boundary:
//                   loaded weights + label set, classify()
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// Dense image classifier architecture
pub mod model;

/// Epoch-end policy objects keyed on validation loss
pub mod monitors;

/// Cross-validation training loop with checkpoint selection
pub mod trainer;

/// Inference-side classifier: weights + label lookup
pub mod classifier;
