//! Observer port - abstraction for watching self-play training
//!
//! Training calls back into observers without knowing whether they draw a
//! progress bar, write logs or collect metrics.

use crate::{
    Result,
    policy::{Playout, TrainingReport},
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_games)` - Once at the beginning
/// 2. `on_game_end(game_num, playout)` - After each playout has been applied
/// 3. `on_training_end(report)` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use tictree::{policy::Playout, ports::TrainingObserver};
///
/// struct LengthCounter {
///     plies: usize,
/// }
///
/// impl TrainingObserver for LengthCounter {
///     fn on_game_end(&mut self, _game_num: u64, playout: &Playout) -> tictree::Result<()> {
///         self.plies += playout.plies();
///         Ok(())
///     }
/// }
/// ```
pub trait TrainingObserver: Send {
    /// Called once before the first game
    fn on_training_start(&mut self, _total_games: u64) -> Result<()> {
        Ok(())
    }

    /// Called after each game; `game_num` counts from 1
    fn on_game_end(&mut self, _game_num: u64, _playout: &Playout) -> Result<()> {
        Ok(())
    }

    /// Called once after the last game
    fn on_training_end(&mut self, _report: &TrainingReport) -> Result<()> {
        Ok(())
    }
}
