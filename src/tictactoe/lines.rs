//! Winning line analysis for Tic-Tac-Toe

use super::{Cell, Player};

/// Winning lines as (row, col) triples, in scan order.
///
/// Row `i` is immediately followed by column `i`; the diagonals come last.
pub const WINNING_LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(1, 0), (1, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)], // diagonals
    [(0, 2), (1, 1), (2, 0)],
];

/// Utility for analyzing winning lines in Tic-Tac-Toe
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Owner of the first completed line in scan order, if any
    pub fn winner(cells: &[[Cell; 3]; 3]) -> Option<Player> {
        WINNING_LINES
            .iter()
            .find_map(|line| Self::line_owner(cells, line))
    }

    /// Check if a player has won by having three in a row
    pub fn has_won(cells: &[[Cell; 3]; 3], player: Player) -> bool {
        WINNING_LINES
            .iter()
            .any(|line| Self::line_owner(cells, line) == Some(player))
    }

    fn line_owner(cells: &[[Cell; 3]; 3], line: &[(usize, usize); 3]) -> Option<Player> {
        let [a, b, c] = line.map(|(row, col)| cells[row][col]);
        if a == b && b == c { a.to_player() } else { None }
    }
}
