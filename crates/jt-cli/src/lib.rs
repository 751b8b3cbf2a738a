//! Ticket time tracker CLI library.
//!
//! This crate provides the CLI interface for the tracker.

mod cli;
pub mod commands;
mod config;
pub mod credentials;

pub use cli::{Cli, Commands};
pub use config::{Config, default_config_file};
