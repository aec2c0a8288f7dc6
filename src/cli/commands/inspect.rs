//! Inspect command - Summarize a saved model

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::{
    cli::{
        config::StorageArgs,
        output::{format_number, print_distribution, print_kv, print_section, print_subsection},
    },
    model::{Difficulty, PersistedModel},
    policy::{child_distribution, normalize, parse_observed_board},
    ports::ModelRepository,
    tictactoe::Coord,
};

#[derive(Parser, Debug)]
#[command(about = "Show a saved model's statistics and move distribution")]
pub struct InspectArgs {
    /// Saved model to inspect (defaults to the easy tier)
    #[arg(long)]
    pub name: Option<String>,

    /// Board to show the distribution for (defaults to the empty board)
    #[arg(long, short = 'b')]
    pub board: Option<String>,

    /// Marker of the player who moved first (X or O)
    #[arg(long, short = 'f', default_value_t = 'X')]
    pub first: char,

    /// Print JSON instead of a table
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[command(flatten)]
    pub storage: StorageArgs,
}

#[derive(Debug, Serialize)]
pub struct MoveProbability {
    pub row: u8,
    pub col: u8,
    pub probability: f64,
}

#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub name: String,
    pub iteration_count: u64,
    pub nodes: usize,
    pub terminal_nodes: usize,
    pub distinct_boards: usize,
    pub board: String,
    pub moves: Vec<MoveProbability>,
}

/// Summarize `model`, with the move distribution at `board` (empty if `None`)
pub fn summarize(
    model: &PersistedModel,
    name: &str,
    board: Option<&str>,
    first: char,
) -> Result<ModelSummary> {
    let tree = model.tree();
    let node = match board {
        Some(text) => {
            let state = normalize(&parse_observed_board(text)?, first)?;
            tree.find_subtree(state.key())?
        }
        None => tree.root(),
    };

    let moves = child_distribution(tree, node)?
        .into_iter()
        .map(|(coord, probability)| MoveProbability {
            row: coord.row,
            col: coord.col,
            probability,
        })
        .collect();

    Ok(ModelSummary {
        name: name.to_string(),
        iteration_count: model.iteration_count(),
        nodes: tree.len(),
        terminal_nodes: tree.terminal_count(),
        distinct_boards: tree.distinct_boards(),
        board: tree.node(node).state().key().to_string(),
        moves,
    })
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let name = args
        .name
        .clone()
        .unwrap_or_else(|| Difficulty::Easy.artifact_name().to_string());
    let model = args
        .storage
        .repository()
        .load(&name)
        .with_context(|| format!("failed to load model '{name}'"))?;

    let summary = summarize(&model, &name, args.board.as_deref(), args.first)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_section(&format!("Model '{}'", summary.name));
    print_kv("Iterations", &format_number(summary.iteration_count));
    print_kv("Nodes", &format_number(summary.nodes as u64));
    print_kv("Terminal nodes", &format_number(summary.terminal_nodes as u64));
    print_kv("Distinct boards", &format_number(summary.distinct_boards as u64));

    print_subsection(&format!("Move distribution at {}", summary.board));
    let distribution: Vec<_> = summary
        .moves
        .iter()
        .map(|m| {
            (
                Coord {
                    row: m.row,
                    col: m.col,
                },
                m.probability,
            )
        })
        .collect();
    print_distribution(&distribution);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_fresh_model_is_uniform() {
        let model = PersistedModel::new();
        let summary = summarize(&model, "fresh", None, 'X').unwrap();

        assert_eq!(summary.iteration_count, 0);
        assert_eq!(summary.nodes, crate::tictactoe::FULL_TREE_NODES);
        assert_eq!(summary.moves.len(), 9);
        for m in &summary.moves {
            assert!((m.probability - 1.0 / 9.0).abs() < 1e-12);
        }
    }

    #[test]
    fn summary_at_board_lists_only_empty_cells() {
        let model = PersistedModel::new();
        let summary = summarize(&model, "fresh", Some("XO./.../..."), 'X').unwrap();
        assert_eq!(summary.moves.len(), 7);
        assert!(!summary.moves.iter().any(|m| m.row == 0 && m.col < 2));
    }
}
