//! Weighted move policy over the game tree
//!
//! Training rescales node weights after uniform self-play games; selection
//! samples children in proportion to those weights.

pub mod observers;
pub mod reinforcement;
pub mod selection;
pub mod training;

pub use observers::{LogObserver, MetricsObserver, ProgressObserver};
pub use reinforcement::ReinforcementSchedule;
pub use selection::{
    Marker, ObservedBoard, child_distribution, normalize, parse_observed_board, select_child,
    select_move,
};
pub use training::{Playout, Trainer, TrainingReport, play_out, reinforce, simulate_game, train};
