// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong to a business layer:
//
//   metrics.rs — Training metrics logging
//                Per-epoch console line, optional CSV of
//                epoch metrics and a JSON copy of the run
//                configuration.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Training metrics CSV logger
pub mod metrics;
