//! Select command - Pick the model's next move for a board

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::config::{StorageArgs, rng_from_seed},
    model::Difficulty,
    policy::parse_observed_board,
    ports::ModelRepository,
    tictactoe::Coord,
};

#[derive(Parser, Debug)]
#[command(about = "Select a move for a board")]
pub struct SelectArgs {
    /// Saved model to use (defaults to the easy tier)
    #[arg(long)]
    pub name: Option<String>,

    /// Board as nine cells, rows optionally separated by '/' or '|' (e.g. "XO./.X./...")
    #[arg(long, short = 'b')]
    pub board: String,

    /// Marker of the player who moved first (X or O)
    #[arg(long, short = 'f', default_value_t = 'X')]
    pub first: char,

    /// Random seed for reproducibility
    #[arg(long, env = "TICTREE_SEED")]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub storage: StorageArgs,
}

pub fn execute(args: SelectArgs) -> Result<()> {
    let coord = run(&args)?;
    println!("{} {}", coord.row, coord.col);
    Ok(())
}

/// Resolve the move without printing it
pub fn run(args: &SelectArgs) -> Result<Coord> {
    let name = args
        .name
        .clone()
        .unwrap_or_else(|| Difficulty::Easy.artifact_name().to_string());
    let observed = parse_observed_board(&args.board)?;

    let model = args
        .storage
        .repository()
        .load(&name)
        .with_context(|| format!("failed to load model '{name}'"))?;

    let mut rng = rng_from_seed(args.seed);
    let coord = model
        .select_move(&observed, args.first, &mut rng)
        .with_context(|| format!("no move for board '{}'", args.board))?;
    Ok(coord)
}
