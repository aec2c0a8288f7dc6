//! Application layer: configuration for training sessions.

pub mod config;

pub use config::TrainingConfig;
