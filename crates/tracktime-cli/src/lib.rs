//! Plain-text time tracker CLI library.
//!
//! This crate provides the command-line interface for tracktime: argument
//! definitions, configuration loading and one module per subcommand.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
