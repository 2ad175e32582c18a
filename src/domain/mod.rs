// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing the experiment:
// which split an array belongs to, what a raw split looks
// like after it is read from disk, and how one-hot label rows
// map to country indices.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain structs, enums, traits and pure functions
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Train / test split identifiers and the raw array pair
pub mod split;

// One-hot label helpers (argmax, distinct classes)
pub mod labels;

// Core abstractions (traits) that other layers implement
pub mod traits;
