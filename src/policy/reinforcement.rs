//! Ply-weighted reinforcement applied after each self-play game

use serde::{Deserialize, Serialize};

use crate::tictactoe::GameResult;

/// Rates and shape of the per-ply weight multiplier.
///
/// For ply `i` of an `n`-ply game the growth factor is
/// `base ^ ((span / n) * (i + offset))`, so late plies move much more than
/// early ones. The multiplier applied to the node reached at ply `i` is
/// `rate * factor(i) + 1`, where `rate` is `win` for the winner's plies,
/// `loss` for the loser's and `draw` for every ply of a drawn game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementSchedule {
    pub win: f64,
    pub loss: f64,
    pub draw: f64,
    pub base: f64,
    pub span: f64,
    pub offset: f64,
}

impl Default for ReinforcementSchedule {
    fn default() -> Self {
        ReinforcementSchedule {
            win: 0.00003,
            loss: -0.00003,
            draw: 0.00001,
            base: 3.0,
            span: 10.0,
            offset: 0.2,
        }
    }
}

impl ReinforcementSchedule {
    /// Growth factor for ply `ply` (0-based) of a game with `plies` moves
    pub fn factor(&self, ply: usize, plies: usize) -> f64 {
        let exponent = (self.span / plies as f64) * (ply as f64 + self.offset);
        self.base.powf(exponent)
    }

    /// Weight multiplier for the node reached at `ply`.
    ///
    /// Returns `1.0` for an unfinished game.
    pub fn multiplier(&self, result: GameResult, ply: usize, plies: usize) -> f64 {
        let rate = match result {
            GameResult::Ongoing => return 1.0,
            GameResult::Draw => self.draw,
            GameResult::Win(winner) if ply % 2 == winner.ply_parity() => self.win,
            GameResult::Win(_) => self.loss,
        };
        rate * self.factor(ply, plies) + 1.0
    }

    pub fn validate(&self) -> crate::Result<()> {
        let fields = [
            ("win", self.win),
            ("loss", self.loss),
            ("draw", self.draw),
            ("base", self.base),
            ("span", self.span),
            ("offset", self.offset),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("reinforcement {name} must be finite, got {value}"),
            });
        }
        if self.base <= 0.0 {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("reinforcement base must be positive, got {}", self.base),
            });
        }
        Ok(())
    }
}
