//! Repository port for model persistence.
//!
//! This module defines the trait boundary between the domain and the storage
//! used for trained models.

use crate::{Result, model::PersistedModel};

/// Port for persisting and loading trained models by name.
///
/// # Examples
///
/// ```no_run
/// use tictree::{model::PersistedModel, ports::ModelRepository};
///
/// fn save_model<R: ModelRepository>(repo: &R, model: &PersistedModel) -> tictree::Result<()> {
///     repo.save(model, "easy_game_model")
/// }
/// ```
pub trait ModelRepository {
    /// Save a model as one atomic unit.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the storage cannot be
    /// written. A failed save never leaves a partially written model behind.
    fn save(&self, model: &PersistedModel, name: &str) -> Result<()>;

    /// Load a previously saved model.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No model is stored under `name`
    /// - The stored bytes are not a valid model
    fn load(&self, name: &str) -> Result<PersistedModel>;

    /// Whether a model is stored under `name`
    fn exists(&self, name: &str) -> bool;
}
