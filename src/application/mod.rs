// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each:
// training a model, resolving the model at startup, and
// classifying a single image. Workflow coordination only —
// no ML math, no printing, no direct tensor handling.
//
// Reference: Clean Architecture pattern

// The cross-validated training workflow
pub mod train_use_case;

// Startup model resolution: load a checkpoint or train fresh
pub mod lifecycle;

// The per-request classification workflow
pub mod classify_use_case;
