// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs, enums, and traits that define the core
// concepts of the system.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - NO ML-specific code
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// The ordered, fixed set of class names
pub mod label;

// A corpus entry: an image path tagged with its label index
pub mod sample;

// The error taxonomy shared by all layers
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
