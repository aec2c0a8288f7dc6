//! Configuration types for training sessions.

use crate::{Error, Result, model::Difficulty, policy::ReinforcementSchedule};

/// Configuration for a [`Trainer`](crate::policy::Trainer).
///
/// This type provides a builder-style API for configuring a training run
/// before the trainer is created.
///
/// # Examples
///
/// ```
/// use tictree::app::TrainingConfig;
/// use tictree::model::Difficulty;
///
/// let config = TrainingConfig::for_difficulty(Difficulty::Easy)
///     .with_seed(42)
///     .with_weight_floor(1e-6)
///     .with_progress(false);
/// assert_eq!(config.iterations, 100_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Number of self-play games
    pub iterations: u64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Weight update rates and decay curve
    pub schedule: ReinforcementSchedule,
    /// Lower bound applied to updated weights, if any
    pub weight_floor: Option<f64>,
    /// Whether to show a progress bar
    pub progress: bool,
    /// Log running tallies every N games
    pub log_every: Option<u64>,
}

impl TrainingConfig {
    /// Create a configuration for `iterations` games.
    ///
    /// Uses default values for other parameters:
    /// - Schedule: `ReinforcementSchedule::default()`
    /// - Weight floor: none (the update formula is applied as is)
    /// - Seed: None (non-deterministic)
    /// - Progress bar: off
    pub fn new(iterations: u64) -> Self {
        Self {
            iterations,
            seed: None,
            schedule: ReinforcementSchedule::default(),
            weight_floor: None,
            progress: false,
            log_every: None,
        }
    }

    /// Configuration for one of the shipped training tiers.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::new(difficulty.iterations())
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_schedule(mut self, schedule: ReinforcementSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Clamp updated weights so they never drop below `floor`.
    pub fn with_weight_floor(mut self, floor: f64) -> Self {
        self.weight_floor = Some(floor);
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_log_every(mut self, every: u64) -> Self {
        self.log_every = Some(every);
        self
    }

    /// Check the schedule and floor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if a schedule value is not
    /// finite, the decay base is not positive, or the floor is negative or
    /// not finite.
    pub fn validate(&self) -> Result<()> {
        self.schedule.validate()?;
        if let Some(floor) = self.weight_floor
            && (!floor.is_finite() || floor < 0.0)
        {
            return Err(Error::InvalidConfiguration {
                message: format!("weight floor must be finite and non-negative, got {floor}"),
            });
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::Easy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = TrainingConfig::new(10)
            .with_seed(7)
            .with_log_every(5)
            .with_progress(true);
        assert_eq!(config.iterations, 10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.log_every, Some(5));
        assert!(config.progress);
        assert_eq!(config.weight_floor, None);
    }

    #[test]
    fn negative_floor_is_rejected() {
        let config = TrainingConfig::new(1).with_weight_floor(-0.5);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));
        assert!(TrainingConfig::new(1).with_weight_floor(f64::NAN).validate().is_err());
    }

    #[test]
    fn bad_schedule_is_rejected() {
        let schedule = ReinforcementSchedule {
            win: f64::INFINITY,
            ..Default::default()
        };
        let config = TrainingConfig::new(1).with_schedule(schedule);
        assert!(config.validate().is_err());
    }
}
