//! Weighted move selection against an observed board
//!
//! Callers describe the board with their own markers. The board is rewritten
//! relative to whoever opened the game, matched against the tree and a child
//! is drawn in proportion to its weight.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    tictactoe::{BoardKey, Cell, Coord, GameState, GameTree, NodeId},
    utils::weighted_sample,
};

/// Board as supplied by the caller, one character per cell
pub type ObservedBoard = [[char; 3]; 3];

/// A caller-side player marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    X,
    O,
}

impl Marker {
    pub fn from_char(c: char) -> Option<Marker> {
        match c {
            'X' | 'x' => Some(Marker::X),
            'O' | 'o' => Some(Marker::O),
            _ => None,
        }
    }

    /// Parse the identifier of the player who moved first
    pub fn parse_first_player(value: char) -> Result<Marker> {
        Self::from_char(value).ok_or_else(|| Error::InvalidPlayerIdentifier {
            value: value.to_string(),
        })
    }

    pub fn to_char(self) -> char {
        match self {
            Marker::X => 'X',
            Marker::O => 'O',
        }
    }

    pub fn opponent(self) -> Marker {
        match self {
            Marker::X => Marker::O,
            Marker::O => Marker::X,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

fn is_empty_char(c: char) -> bool {
    matches!(c, ' ' | '.' | '_' | '-')
}

/// Parse a board such as `"XO./.X./..."` or `"XO. .X. ..."`.
///
/// `/`, `|` and whitespace between cells are ignored; empty cells are written
/// as `.`, `_` or `-`.
pub fn parse_observed_board(text: &str) -> Result<ObservedBoard> {
    let cells: Vec<char> = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '/' && *c != '|')
        .collect();
    if cells.len() != 9 {
        return Err(Error::InvalidBoardLength {
            expected: 9,
            got: cells.len(),
            context: text.to_string(),
        });
    }

    let mut board = [[' '; 3]; 3];
    for (i, &c) in cells.iter().enumerate() {
        if Marker::from_char(c).is_none() && !is_empty_char(c) {
            return Err(Error::InvalidCellCharacter {
                character: c,
                row: i / 3,
                col: i % 3,
            });
        }
        board[i / 3][i % 3] = c;
    }
    Ok(board)
}

/// Rewrite the observed board relative to the opening player.
///
/// Cells of `first_player` become [`Cell::PlayerOne`], the other marker
/// becomes [`Cell::PlayerTwo`] and empty cells stay empty.
pub fn normalize(observed: &ObservedBoard, first_player: char) -> Result<GameState> {
    let first = Marker::parse_first_player(first_player)?;

    let mut cells = [[Cell::Empty; 3]; 3];
    for (row, line) in observed.iter().enumerate() {
        for (col, &c) in line.iter().enumerate() {
            cells[row][col] = match Marker::from_char(c) {
                Some(marker) if marker == first => Cell::PlayerOne,
                Some(_) => Cell::PlayerTwo,
                None if is_empty_char(c) => Cell::Empty,
                None => {
                    return Err(Error::InvalidCellCharacter {
                        character: c,
                        row,
                        col,
                    });
                }
            };
        }
    }
    Ok(GameState::from_cells(cells))
}

/// Choose the next move for the observed board
pub fn select_move<R: Rng>(
    tree: &GameTree,
    observed: &ObservedBoard,
    first_player: char,
    rng: &mut R,
) -> Result<Coord> {
    let state = normalize(observed, first_player)?;
    let node = tree.find_subtree(state.key())?;
    select_child(tree, node, rng)
}

/// Draw a child of `node` in proportion to its weight and return its move
pub fn select_child<R: Rng>(tree: &GameTree, node: NodeId, rng: &mut R) -> Result<Coord> {
    let (board, items) = child_moves(tree, node)?;
    weighted_sample(rng, &items).ok_or(Error::TerminalNodeSelection { board })
}

/// Selection probability of each child move of `node`.
///
/// Non-positive weights count as zero; if nothing is left the distribution
/// is uniform, matching [`weighted_sample`].
pub fn child_distribution(tree: &GameTree, node: NodeId) -> Result<Vec<(Coord, f64)>> {
    let (_, items) = child_moves(tree, node)?;
    let total: f64 = items.iter().map(|&(_, w)| w.max(0.0)).sum();

    let distribution = if total > 0.0 && total.is_finite() {
        items
            .into_iter()
            .map(|(coord, w)| (coord, w.max(0.0) / total))
            .collect()
    } else {
        let uniform = 1.0 / items.len().max(1) as f64;
        items.into_iter().map(|(coord, _)| (coord, uniform)).collect()
    };
    Ok(distribution)
}

/// Board of `node` and the move and weight of each of its children
fn child_moves(tree: &GameTree, node: NodeId) -> Result<(BoardKey, Vec<(Coord, f64)>)> {
    let parent = tree.get(node).ok_or(Error::UnknownNode { node })?;
    let items = parent
        .children()
        .iter()
        .filter_map(|&child| {
            let child = tree.get(child)?;
            child.state().last_move().map(|coord| (coord, child.weight()))
        })
        .collect();
    Ok((parent.state().key(), items))
}
