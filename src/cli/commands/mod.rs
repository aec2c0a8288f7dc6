//! Subcommand implementations

pub mod inspect;
pub mod select;
pub mod tiers;
pub mod train;
