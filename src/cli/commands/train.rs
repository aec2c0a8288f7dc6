//! Train command - Train a model by self-play and save it

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::TrainingConfig,
    cli::{
        config::StorageArgs,
        output::{create_spinner, format_number, print_kv, print_section},
    },
    model::{Difficulty, PersistedModel},
    policy::{Trainer, TrainingReport},
    ports::ModelRepository,
};

/// Name used for models trained with an explicit iteration count
pub const CUSTOM_MODEL_NAME: &str = "custom_game_model";

#[derive(Parser, Debug)]
#[command(about = "Train a model by self-play")]
pub struct TrainArgs {
    /// Training tier (easy, medium or hard); defaults to easy
    #[arg(long, short = 'd', conflicts_with = "iterations")]
    pub difficulty: Option<Difficulty>,

    /// Number of self-play games, instead of a tier
    #[arg(long, short = 'n')]
    pub iterations: Option<u64>,

    /// Random seed for reproducibility
    #[arg(long, env = "TICTREE_SEED")]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub storage: StorageArgs,

    /// Name to save the model under (defaults to the tier's artifact name)
    #[arg(long)]
    pub name: Option<String>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Clamp updated weights so they never drop below this value
    #[arg(long)]
    pub weight_floor: Option<f64>,

    /// Log running tallies every N games
    #[arg(long)]
    pub log_every: Option<u64>,

    /// Continue training the saved model with the same name, if any
    #[arg(long, default_value_t = false)]
    pub resume: bool,
}

impl TrainArgs {
    /// Resolve the training configuration and model name
    pub fn config(&self) -> (TrainingConfig, String) {
        let (mut config, default_name) = match self.iterations {
            Some(iterations) => (TrainingConfig::new(iterations), CUSTOM_MODEL_NAME),
            None => {
                let difficulty = self.difficulty.unwrap_or(Difficulty::Easy);
                (
                    TrainingConfig::for_difficulty(difficulty),
                    difficulty.artifact_name(),
                )
            }
        };

        config = config.with_progress(!self.no_progress);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(floor) = self.weight_floor {
            config = config.with_weight_floor(floor);
        }
        if let Some(every) = self.log_every {
            config = config.with_log_every(every);
        }

        let name = self
            .name
            .clone()
            .unwrap_or_else(|| default_name.to_string());
        (config, name)
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let (config, name) = args.config();
    let repo = args.storage.repository();

    let mut model = if args.resume && repo.exists(&name) {
        repo.load(&name)
            .with_context(|| format!("failed to load model '{name}' to resume"))?
    } else {
        build_model(config.progress)?
    };

    let mut trainer = Trainer::new(config).context("invalid training configuration")?;
    let report = trainer.train(&mut model)?;

    repo.save(&model, &name)
        .with_context(|| format!("failed to save model '{name}'"))?;

    print_section(&format!("Trained model '{name}'"));
    print_report(&report);
    print_kv("Total iterations", &format_number(model.iteration_count()));
    print_kv("Saved to", &repo.path_for(&name).display().to_string());
    Ok(())
}

/// Build a fresh tree, with a spinner when progress output is enabled
pub(crate) fn build_model(progress: bool) -> Result<PersistedModel> {
    if !progress {
        return Ok(PersistedModel::new());
    }
    let spinner = create_spinner("Building game tree...")?;
    let model = PersistedModel::new();
    spinner.finish_with_message(format!(
        "Game tree ready ({} nodes)",
        format_number(model.tree().len() as u64)
    ));
    Ok(model)
}

pub(crate) fn print_report(report: &TrainingReport) {
    print_kv("Games", &format_number(report.games));
    print_kv(
        "Player one wins",
        &format!("{:.1}%", report.player_one_win_rate() * 100.0),
    );
    print_kv(
        "Player two wins",
        &format!("{:.1}%", report.player_two_win_rate() * 100.0),
    );
    print_kv("Draws", &format!("{:.1}%", report.draw_rate() * 100.0));
    if report.non_positive_weights > 0 {
        print_kv(
            "Non-positive updates",
            &format_number(report.non_positive_weights),
        );
    }
}
