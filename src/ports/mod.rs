//! Ports (trait boundaries) for external dependencies.
//!
//! Training and persistence talk to the outside world only through these
//! traits; implementations live in `adapters` and `policy::observers`.

pub mod observer;
pub mod repository;

pub use observer::TrainingObserver;
pub use repository::ModelRepository;
