//! Self-play training over the exhaustive game tree
//!
//! Each training game walks from the root to a terminal node choosing
//! children uniformly at random, then rescales the weight of every node on
//! that path according to the [`ReinforcementSchedule`].

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{
    observers::{LogObserver, ProgressObserver},
    reinforcement::ReinforcementSchedule,
};
use crate::{
    Result,
    app::TrainingConfig,
    model::PersistedModel,
    ports::TrainingObserver,
    tictactoe::{GameResult, GameTree, NodeId, Player},
    utils::uniform_index,
};

/// One finished self-play game
#[derive(Debug, Clone, PartialEq)]
pub struct Playout {
    /// Child index chosen at each ply
    pub moves: Vec<usize>,
    /// Node reached at each ply (the root is not included)
    pub path: Vec<NodeId>,
    /// Result at the terminal node
    pub result: GameResult,
}

impl Playout {
    /// Number of plies played
    pub fn plies(&self) -> usize {
        self.moves.len()
    }
}

/// Walk from the root to a terminal node, ignoring weights
pub fn play_out<R: Rng>(tree: &GameTree, rng: &mut R) -> Playout {
    let mut current = tree.root();
    let mut moves = Vec::with_capacity(9);
    let mut path = Vec::with_capacity(9);

    while let Some(index) = uniform_index(rng, tree.node(current).children().len()) {
        current = tree.node(current).children()[index];
        moves.push(index);
        path.push(current);
    }

    Playout {
        moves,
        path,
        result: tree.node(current).result(),
    }
}

/// Rescale the weights along a finished playout.
///
/// When `floor` is set, updated weights are clamped from below. Returns how
/// many updated weights ended up non-positive.
pub fn reinforce(
    tree: &mut GameTree,
    playout: &Playout,
    schedule: &ReinforcementSchedule,
    floor: Option<f64>,
) -> usize {
    let plies = playout.path.len();
    let mut non_positive = 0;

    for (ply, &id) in playout.path.iter().enumerate() {
        let mut weight = tree.scale_weight(id, schedule.multiplier(playout.result, ply, plies));
        if let Some(floor) = floor
            && weight < floor
        {
            tree.set_weight(id, floor);
            weight = floor;
        }
        if weight <= 0.0 {
            non_positive += 1;
        }
    }

    non_positive
}

/// Play one uniform self-play game and apply the schedule along its path
pub fn simulate_game<R: Rng>(
    tree: &mut GameTree,
    schedule: &ReinforcementSchedule,
    rng: &mut R,
) -> Playout {
    let playout = play_out(tree, rng);
    reinforce(tree, &playout, schedule, None);
    playout
}

/// Run exactly `iterations` self-play games with no stopping criterion
pub fn train<R: Rng>(
    tree: &mut GameTree,
    schedule: &ReinforcementSchedule,
    iterations: u64,
    rng: &mut R,
) -> TrainingReport {
    let mut report = TrainingReport::default();
    for _ in 0..iterations {
        let playout = play_out(tree, rng);
        let non_positive = reinforce(tree, &playout, schedule, None);
        report.record(&playout, non_positive);
    }
    report
}

/// Outcome tallies of a training run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub games: u64,
    pub player_one_wins: u64,
    pub player_two_wins: u64,
    pub draws: u64,
    /// Weight updates that left a node at or below zero
    pub non_positive_weights: u64,
}

impl TrainingReport {
    pub fn record(&mut self, playout: &Playout, non_positive: usize) {
        self.games += 1;
        match playout.result {
            GameResult::Win(Player::One) => self.player_one_wins += 1,
            GameResult::Win(Player::Two) => self.player_two_wins += 1,
            GameResult::Draw => self.draws += 1,
            GameResult::Ongoing => {}
        }
        self.non_positive_weights += non_positive as u64;
    }

    fn rate(&self, count: u64) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            count as f64 / self.games as f64
        }
    }

    pub fn player_one_win_rate(&self) -> f64 {
        self.rate(self.player_one_wins)
    }

    pub fn player_two_win_rate(&self) -> f64 {
        self.rate(self.player_two_wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }
}

/// A training session: configuration, a seeded RNG and observers
pub struct Trainer {
    config: TrainingConfig,
    rng: StdRng,
    observers: Vec<Box<dyn TrainingObserver>>,
}

impl Trainer {
    /// Create a trainer, validating the configuration.
    ///
    /// A progress bar and a log observer are attached when the configuration
    /// asks for them.
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random::<u64>()),
        };

        let mut observers: Vec<Box<dyn TrainingObserver>> = Vec::new();
        if config.progress {
            observers.push(Box::new(ProgressObserver::new()));
        }
        if let Some(every) = config.log_every {
            observers.push(Box::new(LogObserver::new(every)));
        }

        Ok(Trainer {
            config,
            rng,
            observers,
        })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Attach an observer that is notified during [`Trainer::train`]
    pub fn with_observer(mut self, observer: impl TrainingObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn TrainingObserver>) {
        self.observers.push(observer);
    }

    /// Train for the configured number of iterations
    pub fn train(&mut self, model: &mut PersistedModel) -> Result<TrainingReport> {
        self.train_iterations(model, self.config.iterations)
    }

    /// Train for exactly `iterations` games and add them to the model's count
    pub fn train_iterations(
        &mut self,
        model: &mut PersistedModel,
        iterations: u64,
    ) -> Result<TrainingReport> {
        log::info!(
            "training {iterations} self-play games (model already has {})",
            model.iteration_count()
        );
        for observer in &mut self.observers {
            observer.on_training_start(iterations)?;
        }

        let schedule = self.config.schedule;
        let floor = self.config.weight_floor;
        let mut report = TrainingReport::default();

        for game in 1..=iterations {
            let playout = play_out(model.tree(), &mut self.rng);
            let non_positive = reinforce(model.tree_mut(), &playout, &schedule, floor);
            report.record(&playout, non_positive);
            // Counted per game so the count matches the weights if an observer fails
            model.record_iterations(1);

            for observer in &mut self.observers {
                observer.on_game_end(game, &playout)?;
            }
        }

        if report.non_positive_weights > 0 {
            log::warn!(
                "{} weight updates left a node at or below zero",
                report.non_positive_weights
            );
        }
        log::info!(
            "training finished: {} games, P1 {:.3}, P2 {:.3}, draw {:.3}",
            report.games,
            report.player_one_win_rate(),
            report.player_two_win_rate(),
            report.draw_rate()
        );

        for observer in &mut self.observers {
            observer.on_training_end(&report)?;
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playout_ends_at_terminal_node() {
        let tree = GameTree::build();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let playout = play_out(&tree, &mut rng);
            let last = *playout.path.last().unwrap();
            assert!(tree.node(last).is_terminal());
            assert!(playout.result.is_terminal());
            assert!((5..=9).contains(&playout.plies()));
            assert_eq!(playout.path.len(), playout.moves.len());
        }
    }

    #[test]
    fn playout_path_follows_chosen_moves() {
        let tree = GameTree::build();
        let mut rng = StdRng::seed_from_u64(5);
        let playout = play_out(&tree, &mut rng);

        let mut current = tree.root();
        for (&index, &id) in playout.moves.iter().zip(&playout.path) {
            current = tree.child(current, index).unwrap();
            assert_eq!(current, id);
        }
    }

    #[test]
    fn reinforce_touches_only_the_path() {
        let mut tree = GameTree::build();
        let mut rng = StdRng::seed_from_u64(99);
        let schedule = ReinforcementSchedule::default();
        let playout = play_out(&tree, &mut rng);

        reinforce(&mut tree, &playout, &schedule, None);

        let n = playout.plies();
        for (ply, &id) in playout.path.iter().enumerate() {
            let expected = schedule.multiplier(playout.result, ply, n);
            assert_eq!(tree.weight(id), expected);
        }
        let changed = tree
            .iter()
            .filter(|(_, node)| node.weight() != GameTree::DEFAULT_WEIGHT)
            .count();
        assert!(changed <= n);
        assert_eq!(tree.weight(tree.root()), GameTree::DEFAULT_WEIGHT);
    }

    #[test]
    fn floor_clamps_weights() {
        let mut tree = GameTree::build();
        let schedule = ReinforcementSchedule {
            loss: -10.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let playout = loop {
            let p = play_out(&tree, &mut rng);
            if p.result.winner().is_some() {
                break p;
            }
        };

        let unclamped = reinforce(&mut tree.clone(), &playout, &schedule, None);
        assert!(unclamped > 0);

        let clamped = reinforce(&mut tree, &playout, &schedule, Some(1e-6));
        assert_eq!(clamped, 0);
        assert!(playout.path.iter().all(|&id| tree.weight(id) >= 1e-6));
    }

    #[test]
    fn seeded_trainers_agree() {
        let config = TrainingConfig::new(40).with_seed(17);
        let mut a = PersistedModel::new();
        let mut b = PersistedModel::new();

        let report_a = Trainer::new(config.clone()).unwrap().train(&mut a).unwrap();
        let report_b = Trainer::new(config).unwrap().train(&mut b).unwrap();

        assert_eq!(report_a, report_b);
        assert_eq!(a.iteration_count(), 40);
        assert!(
            a.tree()
                .iter()
                .zip(b.tree().iter())
                .all(|((_, x), (_, y))| x.weight() == y.weight())
        );
    }

    struct FailAfter(u64);

    impl TrainingObserver for FailAfter {
        fn on_game_end(&mut self, game_num: u64, _playout: &Playout) -> Result<()> {
            if game_num == self.0 {
                return Err(crate::Error::InvalidConfiguration {
                    message: "observer stopped".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn failed_observer_keeps_count_in_step_with_weights() {
        let mut model = PersistedModel::new();
        let mut trainer = Trainer::new(TrainingConfig::new(10).with_seed(4))
            .unwrap()
            .with_observer(FailAfter(3));

        assert!(trainer.train(&mut model).is_err());
        assert_eq!(model.iteration_count(), 3);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = TrainingConfig::new(1).with_weight_floor(-1.0);
        assert!(Trainer::new(config).is_err());
    }

    #[test]
    fn train_runs_exact_iteration_count() {
        let mut tree = GameTree::build();
        let mut rng = StdRng::seed_from_u64(2024);
        let report = train(&mut tree, &ReinforcementSchedule::default(), 250, &mut rng);

        assert_eq!(report.games, 250);
        assert_eq!(
            report.player_one_wins + report.player_two_wins + report.draws,
            250
        );
    }
}
