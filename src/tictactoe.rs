//! Tic-Tac-Toe board model and exhaustive game tree

pub mod board;
pub mod game_tree;
pub mod lines;

pub use board::{BoardKey, CELL_COUNT, Cell, Coord, GameResult, GameState, Player};
pub use game_tree::{FULL_TREE_NODES, GameTree, Node, NodeId};
pub use lines::{LineAnalyzer, WINNING_LINES};
