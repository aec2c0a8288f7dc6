//! In-memory model repository.
//!
//! Stores encoded models in a shared map, so tests and embedders get the
//! exact save/load round trip without touching the file system.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{Result, error::Error, model::PersistedModel, ports::ModelRepository};

/// In-memory repository. Clones share the same storage.
///
/// # Examples
///
/// ```
/// use tictree::adapters::InMemoryRepository;
/// use tictree::model::PersistedModel;
/// use tictree::ports::ModelRepository;
///
/// let repo = InMemoryRepository::new();
/// repo.save(&PersistedModel::new(), "scratch")?;
/// assert!(repo.exists("scratch"));
/// # Ok::<(), tictree::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.storage.lock().map_err(|_| Error::Persistence {
            operation: "lock in-memory storage".to_string(),
            message: "storage mutex poisoned".to_string(),
        })
    }

    /// Get the number of models currently stored.
    pub fn count(&self) -> usize {
        self.storage().map(|s| s.len()).unwrap_or(0)
    }

    /// Encoded size of the model stored under `name`
    pub fn stored_size(&self, name: &str) -> Option<usize> {
        self.storage().ok()?.get(name).map(Vec::len)
    }
}

impl ModelRepository for InMemoryRepository {
    fn save(&self, model: &PersistedModel, name: &str) -> Result<()> {
        // Encode before taking the lock so a failed encode stores nothing
        let bytes = model.to_bytes()?;
        self.storage()?.insert(name.to_string(), bytes);
        Ok(())
    }

    fn load(&self, name: &str) -> Result<PersistedModel> {
        let storage = self.storage()?;
        let bytes = storage.get(name).ok_or_else(|| Error::Persistence {
            operation: format!("load model {name}"),
            message: "no model stored under this name".to_string(),
        })?;
        PersistedModel::from_bytes(bytes)
    }

    fn exists(&self, name: &str) -> bool {
        self.storage().map(|s| s.contains_key(name)).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let repo = InMemoryRepository::new();
        let clone = repo.clone();
        clone.save(&PersistedModel::new(), "shared").unwrap();

        assert_eq!(repo.count(), 1);
        assert!(repo.stored_size("shared").unwrap() > 0);
        assert_eq!(repo.load("shared").unwrap().iteration_count(), 0);
    }

    #[test]
    fn missing_model_is_an_error() {
        let repo = InMemoryRepository::new();
        assert!(repo.load("nothing").unwrap_err().is_persistence());
    }
}
