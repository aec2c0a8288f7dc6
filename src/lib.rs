//! Tic-Tac-Toe move policy learned by self-play over the full game tree
//!
//! This crate provides:
//! - Exhaustive Tic-Tac-Toe game tree with a canonical board index
//! - Ply-weighted reinforcement from uniform self-play games
//! - Weighted move selection for boards given in caller markers
//! - Model persistence through a repository port (MessagePack on disk)
//! - Difficulty tiers and a small command-line front end

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod model;
pub mod policy;
pub mod ports;
pub mod tictactoe;
pub mod utils;

pub use app::TrainingConfig;
pub use error::{Error, Result};
pub use model::{Difficulty, PersistedModel};
pub use policy::{Marker, ObservedBoard, ReinforcementSchedule, Trainer, TrainingReport};
pub use tictactoe::{BoardKey, Coord, GameResult, GameState, GameTree, NodeId, Player};
