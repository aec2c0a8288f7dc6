//! Shared argument groups for CLI commands

use std::path::PathBuf;

use clap::Args;
use rand::{SeedableRng, rngs::StdRng};

use crate::adapters::MsgPackRepository;

/// Where models are stored
#[derive(Args, Debug, Clone)]
pub struct StorageArgs {
    /// Directory holding saved models
    #[arg(long, env = "TICTREE_MODEL_DIR", default_value = "models")]
    pub model_dir: PathBuf,
}

impl StorageArgs {
    pub fn repository(&self) -> MsgPackRepository {
        MsgPackRepository::new(&self.model_dir)
    }
}

/// Seeded RNG when a seed is given, otherwise one seeded from the OS
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
