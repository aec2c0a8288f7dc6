//! Training observers: progress bar, periodic logging and metrics

use indicatif::{ProgressBar, ProgressStyle};

use super::training::{Playout, TrainingReport};
use crate::{Result, ports::TrainingObserver, tictactoe::GameResult};

/// How many games pass between progress bar refreshes
const PROGRESS_STRIDE: u64 = 1_000;

/// Progress bar observer - Shows training progress
#[derive(Default)]
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    report: TrainingReport,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn message(&self) -> String {
        format!(
            "P1:{} P2:{} D:{}",
            self.report.player_one_wins, self.report.player_two_wins, self.report.draws
        )
    }
}

impl TrainingObserver for ProgressObserver {
    fn on_training_start(&mut self, total_games: u64) -> Result<()> {
        let pb = ProgressBar::new(total_games);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        self.report = TrainingReport::default();
        Ok(())
    }

    fn on_game_end(&mut self, game_num: u64, playout: &Playout) -> Result<()> {
        self.report.record(playout, 0);

        if game_num % PROGRESS_STRIDE == 0
            && let Some(pb) = &self.progress_bar
        {
            pb.set_position(game_num);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self, report: &TrainingReport) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(report.games);
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Logs running tallies every `every` games through the `log` facade
pub struct LogObserver {
    every: u64,
    report: TrainingReport,
}

impl LogObserver {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            report: TrainingReport::default(),
        }
    }
}

impl TrainingObserver for LogObserver {
    fn on_training_start(&mut self, total_games: u64) -> Result<()> {
        self.report = TrainingReport::default();
        log::debug!("log observer attached for {total_games} games");
        Ok(())
    }

    fn on_game_end(&mut self, game_num: u64, playout: &Playout) -> Result<()> {
        self.report.record(playout, 0);
        if game_num % self.every == 0 {
            log::info!(
                "game {game_num}: P1 {} / P2 {} / draw {}",
                self.report.player_one_wins,
                self.report.player_two_wins,
                self.report.draws
            );
        }
        Ok(())
    }
}

/// Metrics observer - Tracks outcome counts and playout length
#[derive(Debug, Default)]
pub struct MetricsObserver {
    report: TrainingReport,
    total_plies: u64,
    shortest: Option<usize>,
    longest: usize,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies of the games seen so far
    pub fn report(&self) -> &TrainingReport {
        &self.report
    }

    /// Mean number of plies per game
    pub fn mean_plies(&self) -> f64 {
        if self.report.games == 0 {
            0.0
        } else {
            self.total_plies as f64 / self.report.games as f64
        }
    }

    pub fn shortest_game(&self) -> Option<usize> {
        self.shortest
    }

    pub fn longest_game(&self) -> usize {
        self.longest
    }
}

impl TrainingObserver for MetricsObserver {
    fn on_game_end(&mut self, _game_num: u64, playout: &Playout) -> Result<()> {
        if playout.result == GameResult::Ongoing {
            return Ok(());
        }
        self.report.record(playout, 0);
        let plies = playout.plies();
        self.total_plies += plies as u64;
        self.shortest = Some(self.shortest.map_or(plies, |s| s.min(plies)));
        self.longest = self.longest.max(plies);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::{NodeId, Player};

    fn playout(plies: usize, result: GameResult) -> Playout {
        Playout {
            moves: vec![0; plies],
            path: vec![NodeId::ROOT; plies],
            result,
        }
    }

    #[test]
    fn progress_message_labels_every_tally() {
        let mut observer = ProgressObserver::new();
        observer
            .on_game_end(1, &playout(5, GameResult::Win(Player::One)))
            .unwrap();
        observer.on_game_end(2, &playout(9, GameResult::Draw)).unwrap();
        assert_eq!(observer.message(), "P1:1 P2:0 D:1");
    }

    #[test]
    fn metrics_observer_tracks_lengths() {
        let mut metrics = MetricsObserver::new();
        metrics
            .on_game_end(1, &playout(5, GameResult::Win(Player::One)))
            .unwrap();
        metrics.on_game_end(2, &playout(9, GameResult::Draw)).unwrap();

        assert_eq!(metrics.report().games, 2);
        assert_eq!(metrics.report().draws, 1);
        assert_eq!(metrics.shortest_game(), Some(5));
        assert_eq!(metrics.longest_game(), 9);
        assert!((metrics.mean_plies() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn log_observer_never_divides_by_zero() {
        let mut observer = LogObserver::new(0);
        observer.on_training_start(3).unwrap();
        for game in 1..=3 {
            observer
                .on_game_end(game, &playout(7, GameResult::Win(Player::Two)))
                .unwrap();
        }
        assert_eq!(observer.report.player_two_wins, 3);
    }
}
