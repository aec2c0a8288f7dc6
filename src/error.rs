//! Error types for the tictree crate

use thiserror::Error;

use crate::tictactoe::{BoardKey, Coord, NodeId};

/// Main error type for the tictree crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: cell {coord} is already occupied")]
    InvalidMove { coord: Coord },

    #[error("position {index} is out of bounds (must be 0-8)")]
    InvalidPosition { index: usize },

    #[error("invalid first-player identifier '{value}' (expected 'X' or 'O')")]
    InvalidPlayerIdentifier { value: String },

    #[error("invalid character '{character}' at row {row}, column {col}")]
    InvalidCellCharacter { character: char, row: usize, col: usize },

    #[error("board must have {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("no subtree matches board {board}")]
    SubtreeNotFound { board: BoardKey },

    #[error("node {node} does not belong to this game tree")]
    UnknownNode { node: NodeId },

    #[error("cannot select a move from terminal board {board}")]
    TerminalNodeSelection { board: BoardKey },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {message}")]
    Persistence { operation: String, message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

impl Error {
    /// Whether the error came from storage or (de)serialization
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Persistence { .. } | Error::Io { .. })
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
