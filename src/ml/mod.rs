// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model and optimisation code lives here.
//
//   model.rs     — The compatibility model
//                  • Text branch: Linear → sigmoid → Linear
//                  • Country branch: learned Embedding table
//                  • Cosine similarity squashed by a sigmoid
//
//   trainer.rs   — The training loop
//                  Forward pass, BCE loss, backward pass,
//                  Adam step, per-epoch validation accuracy
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Two-branch text / country compatibility model
pub mod model;

/// Training loop with per-epoch validation
pub mod trainer;
