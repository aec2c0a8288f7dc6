//! CLI infrastructure for the tictree command
//!
//! This module provides the command-line interface for training models,
//! selecting moves and inspecting saved models.

pub mod commands;
pub mod config;
pub mod output;
