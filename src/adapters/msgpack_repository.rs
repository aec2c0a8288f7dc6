//! MessagePack implementation of the model repository.
//!
//! Models are stored as `<dir>/<name>.msgpack`. Writes go to a temporary file
//! in the same directory which is then renamed over the target, so readers
//! see either the old model or the new one.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::{Result, error::Error, model::PersistedModel, ports::ModelRepository};

/// File extension used for stored models
pub const EXTENSION: &str = "msgpack";

/// MessagePack-based model repository rooted at a directory.
///
/// # Examples
///
/// ```no_run
/// use tictree::adapters::MsgPackRepository;
/// use tictree::model::PersistedModel;
/// use tictree::ports::ModelRepository;
///
/// let repo = MsgPackRepository::new("models");
/// let model = PersistedModel::new();
///
/// repo.save(&model, "easy_game_model")?;
/// let loaded = repo.load("easy_game_model")?;
/// # Ok::<(), tictree::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MsgPackRepository {
    dir: PathBuf,
}

impl MsgPackRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the model stored under `name`
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{EXTENSION}"))
    }
}

impl ModelRepository for MsgPackRepository {
    fn save(&self, model: &PersistedModel, name: &str) -> Result<()> {
        let path = self.path_for(name);
        fs::create_dir_all(&self.dir).map_err(|source| Error::Io {
            operation: format!("create directory {:?}", self.dir),
            source,
        })?;

        let temp = NamedTempFile::new_in(&self.dir).map_err(|source| Error::Io {
            operation: format!("create temporary file in {:?}", self.dir),
            source,
        })?;

        {
            let mut writer = BufWriter::new(temp.as_file());
            model.write_to(&mut writer)?;
            writer.flush().map_err(|source| Error::Io {
                operation: format!("write model {name}"),
                source,
            })?;
        }
        temp.as_file().sync_all().map_err(|source| Error::Io {
            operation: format!("sync model {name}"),
            source,
        })?;

        temp.persist(&path).map_err(|e| Error::Io {
            operation: format!("move model into place at {path:?}"),
            source: e.error,
        })?;

        log::info!(
            "saved model '{name}' ({} iterations) to {}",
            model.iteration_count(),
            path.display()
        );
        Ok(())
    }

    fn load(&self, name: &str) -> Result<PersistedModel> {
        let path = self.path_for(name);
        let file = File::open(&path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let model = PersistedModel::read_from(BufReader::new(file))?;
        log::info!(
            "loaded model '{name}' ({} iterations) from {}",
            model.iteration_count(),
            path.display()
        );
        Ok(model)
    }

    fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_nonexistent_returns_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new(temp_dir.path());
        let result = repo.load("missing");
        assert!(matches!(result, Err(Error::Io { .. })));
        assert!(!repo.exists("missing"));
    }

    #[test]
    fn test_save_leaves_no_temporary_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new(temp_dir.path().join("models"));
        let model = PersistedModel::new();

        repo.save(&model, "easy_game_model").expect("Failed to save");

        let entries: Vec<_> = fs::read_dir(repo.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("easy_game_model.msgpack")]);
        assert!(repo.exists("easy_game_model"));
    }

    #[test]
    fn test_corrupt_file_is_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new(temp_dir.path());
        fs::write(repo.path_for("broken"), b"not a model").unwrap();

        let err = repo.load("broken").unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
    }
}
