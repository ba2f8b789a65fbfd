//! Can tracker CLI library.
//!
//! This crate provides the CLI interface for the can tracker.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, FlavorsAction, SettingsAction};
pub use config::Config;
