//! Tiers command - Train and save the easy, medium and hard models

use anyhow::{Context, Result, bail};
use clap::Parser;

use super::train::{build_model, print_report};
use crate::{
    app::TrainingConfig,
    cli::{
        config::StorageArgs,
        output::{format_number, print_kv, print_section, print_subsection},
    },
    model::Difficulty,
    policy::Trainer,
    ports::ModelRepository,
};

#[derive(Parser, Debug)]
#[command(about = "Train all difficulty tiers")]
pub struct TiersArgs {
    /// Base random seed; tier k uses seed + k
    #[arg(long, env = "TICTREE_SEED")]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub storage: StorageArgs,

    /// Multiply every tier's iteration count by this factor (0 < F <= 1)
    #[arg(long, default_value_t = 1.0)]
    pub scale: f64,

    /// Hide progress bars
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

/// Iterations for a tier after scaling, never below one game
pub fn scaled_iterations(difficulty: Difficulty, scale: f64) -> u64 {
    ((difficulty.iterations() as f64 * scale).round() as u64).max(1)
}

pub fn execute(args: TiersArgs) -> Result<()> {
    if !(args.scale > 0.0 && args.scale <= 1.0) {
        bail!("--scale must be in (0, 1], got {}", args.scale);
    }
    let repo = args.storage.repository();

    print_section("Training difficulty tiers");
    for (k, difficulty) in Difficulty::all().into_iter().enumerate() {
        let iterations = scaled_iterations(difficulty, args.scale);
        let mut config = TrainingConfig::new(iterations).with_progress(!args.no_progress);
        if let Some(seed) = args.seed {
            config = config.with_seed(seed.wrapping_add(k as u64));
        }

        let name = difficulty.artifact_name();
        log::info!("training {difficulty} tier ({iterations} games) as '{name}'");

        let mut model = build_model(config.progress)?;
        let report = Trainer::new(config)?.train(&mut model)?;
        repo.save(&model, name)
            .with_context(|| format!("failed to save {difficulty} model"))?;

        print_subsection(&format!("{difficulty} ({} games)", format_number(iterations)));
        print_report(&report);
        print_kv("Saved to", &repo.path_for(name).display().to_string());
    }
    Ok(())
}
