//! Magasin CLI - operator commands over a JSON data file
//!
//! Provides:
//! - The `magasin` command definition ([`cli::build`])
//! - Subcommand execution against a file-backed warehouse ([`commands::run`])

#![warn(unreachable_pub)]

pub mod cli;
pub mod commands;

pub use cli::build;
pub use commands::{load_config, open_warehouse, run};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
