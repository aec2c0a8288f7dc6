//! tictree CLI - Self-play trained Tic-Tac-Toe opponent
//!
//! This CLI provides:
//! - Training a model for a difficulty tier or a fixed number of games
//! - Training all tiers in one run
//! - Selecting a move for a board with a saved model
//! - Inspecting a saved model's move distribution

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tictree")]
#[command(version, about = "Self-play trained Tic-Tac-Toe opponent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model by self-play and save it
    Train(tictree::cli::commands::train::TrainArgs),

    /// Train and save the easy, medium and hard models
    Tiers(tictree::cli::commands::tiers::TiersArgs),

    /// Select the next move for a board
    Select(tictree::cli::commands::select::SelectArgs),

    /// Show a saved model's statistics and move distribution
    Inspect(tictree::cli::commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => tictree::cli::commands::train::execute(args),
        Commands::Tiers(args) => tictree::cli::commands::tiers::execute(args),
        Commands::Select(args) => tictree::cli::commands::select::execute(args),
        Commands::Inspect(args) => tictree::cli::commands::inspect::execute(args),
    }
}
