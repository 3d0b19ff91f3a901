//! CLI command implementations for dcos-metrics-plugin.
//!
//! This module provides implementations for all CLI subcommands:
//! - `once`: Single poll cycle with the batch printed
//! - `endpoints`: Endpoint resolution for the configured role
//! - `config`: Configuration file generation

pub mod config;
pub mod endpoints;
pub mod once;

// Re-export command functions
pub use config::command_config;
pub use endpoints::command_endpoints;
pub use once::command_once;
