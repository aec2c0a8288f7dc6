//! Persisted model: a trained game tree plus its training count
//!
//! Models are encoded as MessagePack via rmp_serde. Decoding validates the
//! tree structure and rebuilds the board index, so a loaded model behaves
//! exactly like the one that was saved.

use std::{
    fmt,
    io::{Read, Write},
    str::FromStr,
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    policy::{ObservedBoard, ReinforcementSchedule, TrainingReport, selection, training},
    tictactoe::{Coord, GameTree},
};

/// A game tree together with the number of training games applied to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedModel {
    version: u32,
    iteration_count: u64,
    tree: GameTree,
}

impl PersistedModel {
    /// Current save format version
    pub const VERSION: u32 = 1;

    /// Build a fresh, untrained model
    pub fn new() -> Self {
        Self::from_parts(0, GameTree::build())
    }

    pub fn from_parts(iteration_count: u64, tree: GameTree) -> Self {
        PersistedModel {
            version: Self::VERSION,
            iteration_count,
            tree,
        }
    }

    pub fn into_parts(self) -> (u64, GameTree) {
        (self.iteration_count, self.tree)
    }

    /// Number of self-play games applied so far. Informational only.
    pub fn iteration_count(&self) -> u64 {
        self.iteration_count
    }

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut GameTree {
        &mut self.tree
    }

    pub(crate) fn record_iterations(&mut self, iterations: u64) {
        self.iteration_count = self.iteration_count.saturating_add(iterations);
    }

    /// Run `iterations` self-play games against this model's tree
    pub fn train<R: Rng>(
        &mut self,
        iterations: u64,
        schedule: &ReinforcementSchedule,
        rng: &mut R,
    ) -> TrainingReport {
        let report = training::train(&mut self.tree, schedule, iterations, rng);
        self.record_iterations(iterations);
        report
    }

    /// Pick a move for the observed board; see [`selection::select_move`]
    pub fn select_move<R: Rng>(
        &self,
        observed: &ObservedBoard,
        first_player: char,
        rng: &mut R,
    ) -> Result<Coord> {
        selection::select_move(&self.tree, observed, first_player, rng)
    }

    /// Encode the whole model as one MessagePack blob
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read_from(bytes)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        rmp_serde::encode::write(writer, self).map_err(|e| Error::Persistence {
            operation: "serialize model to MessagePack".to_string(),
            message: e.to_string(),
        })
    }

    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let model: PersistedModel =
            rmp_serde::decode::from_read(reader).map_err(|e| Error::Persistence {
                operation: "deserialize model from MessagePack".to_string(),
                message: e.to_string(),
            })?;

        if model.version != Self::VERSION {
            return Err(Error::Persistence {
                operation: "load model".to_string(),
                message: format!(
                    "unsupported format version {} (expected {})",
                    model.version,
                    Self::VERSION
                ),
            });
        }
        Ok(model)
    }
}

impl Default for PersistedModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Training tiers shipped with the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    /// Self-play games used to train this tier
    pub fn iterations(self) -> u64 {
        match self {
            Difficulty::Easy => 100_000,
            Difficulty::Medium => 5_000_000,
            Difficulty::Hard => 15_000_000,
        }
    }

    /// Name under which the tier's model is stored
    pub fn artifact_name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy_game_model",
            Difficulty::Medium => "medium_game_model",
            Difficulty::Hard => "hard_game_model",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown difficulty '{other}' (expected easy, medium or hard)"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn difficulty_tiers_are_ordered() {
        let iterations: Vec<u64> = Difficulty::all().iter().map(|d| d.iterations()).collect();
        assert!(iterations.windows(2).all(|w| w[0] < w[1]));
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn train_accumulates_iteration_count() {
        let mut model = PersistedModel::new();
        let mut rng = StdRng::seed_from_u64(4);
        model.train(30, &ReinforcementSchedule::default(), &mut rng);
        model.train(12, &ReinforcementSchedule::default(), &mut rng);
        assert_eq!(model.iteration_count(), 42);
    }

    #[test]
    fn garbage_bytes_are_a_persistence_error() {
        let err = PersistedModel::from_bytes(&[0xc1, 0x00, 0x13]).unwrap_err();
        assert!(err.is_persistence());
    }
}
