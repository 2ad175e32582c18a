// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses command line arguments with clap and hands a
// TrainConfig to Layer 2. The per-epoch report is printed by
// the training loop; this layer prints the final summary.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::TrainArgs;

use crate::application::train_use_case::TrainUseCase;

#[derive(Parser, Debug)]
#[command(
    name = "country-compat",
    version,
    about = "Train a place-name / country compatibility classifier on precomputed embeddings."
)]
pub struct Cli {
    #[command(flatten)]
    pub args: TrainArgs,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        tracing::info!("Starting training with arrays from: {}", self.args.data_dir);

        let use_case = TrainUseCase::new(self.args.into());
        let history  = use_case.execute()?;

        if let Some(last) = history.last() {
            tracing::info!(
                "Final epoch {}: loss={:.5}, acc={:.3}, val_acc={:.3}",
                last.epoch, last.train_loss, last.train_acc, last.val_acc,
            );
        }
        Ok(())
    }
}
