//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::LineAnalyzer;

/// Number of cells on the 3x3 board
pub const CELL_COUNT: usize = 9;

/// Number of distinct boards representable by [`BoardKey`] (3^9)
const KEY_SPACE: u16 = 19_683;

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    PlayerOne,
    PlayerTwo,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::PlayerOne => '1',
            Cell::PlayerTwo => '2',
        }
    }

    /// Base-3 digit used by [`BoardKey`]
    pub fn to_digit(self) -> u16 {
        match self {
            Cell::Empty => 0,
            Cell::PlayerOne => 1,
            Cell::PlayerTwo => 2,
        }
    }

    pub fn from_digit(digit: u16) -> Option<Cell> {
        match digit {
            0 => Some(Cell::Empty),
            1 => Some(Cell::PlayerOne),
            2 => Some(Cell::PlayerTwo),
            _ => None,
        }
    }

    /// The player owning this cell, if any
    pub fn to_player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::PlayerOne => Some(Player::One),
            Cell::PlayerTwo => Some(Player::Two),
        }
    }
}

/// A player in the game. `One` always makes the opening move in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::One => Cell::PlayerOne,
            Player::Two => Cell::PlayerTwo,
        }
    }

    /// Parity of the plies this player makes (0 for `One`, 1 for `Two`)
    pub fn ply_parity(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// The player making the move at the given 0-based ply
    pub fn for_ply(ply: usize) -> Player {
        if ply % 2 == 0 { Player::One } else { Player::Two }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "player 1"),
            Player::Two => write!(f, "player 2"),
        }
    }
}

/// A cell coordinate on the board.
///
/// Stored as its row-major position, so a decoded coordinate is always on
/// the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    /// Create a coordinate, rejecting anything off the 3x3 board
    pub fn new(row: usize, col: usize) -> Result<Self, crate::Error> {
        if row >= 3 || col >= 3 {
            return Err(crate::Error::InvalidPosition {
                index: row.saturating_mul(3).saturating_add(col),
            });
        }
        Ok(Coord {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Create a coordinate from a row-major position (0-8)
    pub fn from_index(index: usize) -> Result<Self, crate::Error> {
        if index >= CELL_COUNT {
            return Err(crate::Error::InvalidPosition { index });
        }
        Ok(Coord {
            row: (index / 3) as u8,
            col: (index % 3) as u8,
        })
    }

    /// Row-major position (0-8)
    pub fn index(self) -> usize {
        self.row as usize * 3 + self.col as usize
    }

    /// All coordinates in row-major order
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..3u8).flat_map(|row| (0..3u8).map(move |col| Coord { row, col }))
    }
}

impl TryFrom<u8> for Coord {
    type Error = crate::Error;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Coord::from_index(index as usize)
    }
}

impl From<Coord> for u8 {
    fn from(coord: Coord) -> u8 {
        coord.index() as u8
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Status of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    Draw,
    Win(Player),
}

impl GameResult {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameResult::Ongoing)
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::Win(player) => Some(player),
            _ => None,
        }
    }
}

/// Compact base-3 encoding of the nine cells in row-major order.
///
/// The first cell is the most significant digit. Two boards have the same key
/// iff their cells are structurally equal, so the key doubles as the lookup
/// key for the game tree index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct BoardKey(u16);

impl BoardKey {
    /// Key of the empty board
    pub const EMPTY: BoardKey = BoardKey(0);

    pub fn from_cells(cells: &[[Cell; 3]; 3]) -> Self {
        let raw = cells
            .iter()
            .flatten()
            .fold(0u16, |acc, cell| acc * 3 + cell.to_digit());
        BoardKey(raw)
    }

    pub fn raw(self) -> u16 {
        self.0
    }

    /// Decode the key back into cells
    pub fn cells(self) -> [[Cell; 3]; 3] {
        let mut cells = [[Cell::Empty; 3]; 3];
        let mut rest = self.0;
        for index in (0..CELL_COUNT).rev() {
            // Digits are always < 3 because construction is checked
            cells[index / 3][index % 3] = Cell::from_digit(rest % 3).unwrap_or(Cell::Empty);
            rest /= 3;
        }
        cells
    }
}

impl TryFrom<u16> for BoardKey {
    type Error = crate::Error;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        if raw >= KEY_SPACE {
            return Err(crate::Error::Persistence {
                operation: "decode board key".to_string(),
                message: format!("{raw} is outside the 3x3 key space"),
            });
        }
        Ok(BoardKey(raw))
    }
}

impl From<BoardKey> for u16 {
    fn from(key: BoardKey) -> Self {
        key.0
    }
}

impl fmt::Display for BoardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = self.cells();
        for (i, row) in cells.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            for cell in row {
                write!(f, "{}", cell.to_char())?;
            }
        }
        Ok(())
    }
}

/// Snapshot of a 3x3 board plus the move that produced it.
///
/// States are values: [`GameState::extend`] returns a new state and never
/// touches the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    cells: [[Cell; 3]; 3],
    last_move: Option<Coord>,
}

impl GameState {
    /// Create the empty board with no previous move
    pub fn new() -> Self {
        GameState {
            cells: [[Cell::Empty; 3]; 3],
            last_move: None,
        }
    }

    /// Create a state from raw cells. The last move is unknown.
    pub fn from_cells(cells: [[Cell; 3]; 3]) -> Self {
        GameState {
            cells,
            last_move: None,
        }
    }

    /// Rebuild a state from its key and recorded last move
    pub fn from_parts(key: BoardKey, last_move: Option<Coord>) -> Self {
        GameState {
            cells: key.cells(),
            last_move,
        }
    }

    pub fn cells(&self) -> &[[Cell; 3]; 3] {
        &self.cells
    }

    pub fn cell(&self, coord: Coord) -> Cell {
        self.cells[coord.row as usize][coord.col as usize]
    }

    pub fn last_move(&self) -> Option<Coord> {
        self.last_move
    }

    pub fn key(&self) -> BoardKey {
        BoardKey::from_cells(&self.cells)
    }

    /// Count the number of occupied cells on the board.
    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell != Cell::Empty)
            .count()
    }

    /// Empty cells in row-major order
    pub fn empty_coords(&self) -> Vec<Coord> {
        Coord::all().filter(|&c| self.cell(c) == Cell::Empty).collect()
    }

    /// Scan rows, columns and diagonals for a completed line.
    ///
    /// Row `i` is checked before column `i`, and all rows and columns are
    /// checked before the two diagonals.
    pub fn evaluate(&self) -> GameResult {
        if let Some(winner) = LineAnalyzer::winner(&self.cells) {
            return GameResult::Win(winner);
        }
        if self.cells.iter().flatten().any(|&cell| cell == Cell::Empty) {
            GameResult::Ongoing
        } else {
            GameResult::Draw
        }
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.evaluate().is_terminal()
    }

    /// Place `player`'s marker at `coord` and return the resulting state
    #[must_use = "extend returns a new state; the original is unchanged"]
    pub fn extend(&self, coord: Coord, player: Player) -> Result<GameState, crate::Error> {
        if self.cell(coord) != Cell::Empty {
            return Err(crate::Error::InvalidMove { coord });
        }

        let mut next = *self;
        next.cells[coord.row as usize][coord.col as usize] = player.to_cell();
        next.last_move = Some(coord);
        Ok(next)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{}", cell.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
