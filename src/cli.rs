//! CLI arguments and subcommands for dcos-metrics-plugin.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::role::Role;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Output formats for printed batches
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Built-in downstream connectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    /// Log a summary line per message
    Log,
    /// Write every message as a JSON line to stdout
    Stdout,
}

/// Main CLI arguments structure
#[derive(Parser, Debug, Default)]
#[command(
    name = "dcos-metrics-plugin",
    about = "Polls the DC/OS metrics service and forwards node and container metrics",
    long_about = "Polls the DC/OS metrics service and forwards node and container metrics.\n\n\
                  Resolves the metric endpoints for the node's role (master, agent or \
                  agent-public), fetches each of them on a fixed interval and hands the \
                  decoded batch to a connector.",
    version = "0.1.0",
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// The IP or hostname where DC/OS metrics is running
    #[arg(long)]
    pub metrics_host: Option<String>,

    /// The HTTP protocol for the DC/OS metrics service
    #[arg(long)]
    pub metrics_proto: Option<String>,

    /// Port the DC/OS metrics service is running on (defaults to the agent adminrouter port)
    #[arg(long)]
    pub metrics_port: Option<u16>,

    /// Polling interval for metrics in seconds
    #[arg(long)]
    pub polling_interval: Option<u64>,

    /// Valid authentication token for DC/OS services
    #[arg(long, env = "DCOS_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// DC/OS role of this node
    #[arg(long, value_parser = parse_role)]
    pub dcos_role: Option<Role>,

    /// Plugin name attached to every log line
    #[arg(long)]
    pub name: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub request_timeout: Option<u64>,

    /// Connector receiving each polled batch
    #[arg(long, value_enum)]
    pub connector: Option<ConnectorKind>,

    /// Log level (overrides the config file, default: info)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse::<Role>().map_err(|e| e.to_string())
}

impl Default for ConfigFormat {
    fn default() -> Self {
        ConfigFormat::Yaml
    }
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single poll cycle and print the collected batch
    Once {
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Resolve and list the endpoints polled for the configured role
    Endpoints,

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },
}
