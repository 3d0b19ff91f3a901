//! Configuration management for dcos-metrics-plugin.
//!
//! Two layers live here. [`Config`] is the loose, serde-friendly view that is
//! merged from defaults, an optional config file (YAML, JSON or TOML) and CLI
//! flags. [`PollConfig`] is the immutable, validated result the poller runs
//! with; it is built once at startup and never mutated afterwards.

use crate::cli::{Args, ConfigFormat, ConnectorKind, LogLevel};
use crate::error::{PluginError, Result};
use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

// Default configuration constants
pub const DEFAULT_METRICS_HOST: &str = "localhost";
pub const DEFAULT_METRICS_PROTO: &str = "http";
pub const DEFAULT_METRICS_PORT: u16 = 61001;
pub const DEFAULT_POLLING_INTERVAL: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;
pub const DEFAULT_NAME: &str = "default";

/// Plugin configuration as read from file and CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Plugin name, attached to every log line
    pub name: Option<String>,

    // Metrics service coordinates
    #[serde(alias = "metrics-host")]
    pub metrics_host: Option<String>,
    #[serde(alias = "metrics-proto")]
    pub metrics_proto: Option<String>,
    #[serde(alias = "metrics-port")]
    pub metrics_port: Option<u16>,

    // Polling
    #[serde(alias = "polling-interval")]
    pub polling_interval: Option<u64>,
    #[serde(alias = "request-timeout")]
    pub request_timeout: Option<u64>,

    // Identity
    #[serde(alias = "auth-token")]
    pub auth_token: Option<String>,
    #[serde(alias = "dcos-role")]
    pub dcos_role: Option<Role>,

    // Output
    pub connector: Option<ConnectorKind>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<LogLevel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: Some(DEFAULT_NAME.to_string()),
            metrics_host: Some(DEFAULT_METRICS_HOST.to_string()),
            metrics_proto: Some(DEFAULT_METRICS_PROTO.to_string()),
            metrics_port: Some(DEFAULT_METRICS_PORT),
            polling_interval: Some(DEFAULT_POLLING_INTERVAL),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            auth_token: None,
            dcos_role: None,
            connector: Some(ConnectorKind::Log),
            log_level: Some(LogLevel::Info),
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<()> {
    PollConfig::try_from(cfg).map(|_| ())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(host) = &args.metrics_host {
        config.metrics_host = Some(host.clone());
    }
    if let Some(proto) = &args.metrics_proto {
        config.metrics_proto = Some(proto.clone());
    }
    if let Some(port) = args.metrics_port {
        config.metrics_port = Some(port);
    }
    if let Some(interval) = args.polling_interval {
        config.polling_interval = Some(interval);
    }
    if let Some(timeout) = args.request_timeout {
        config.request_timeout = Some(timeout);
    }
    if let Some(token) = &args.auth_token {
        config.auth_token = Some(token.clone());
    }
    if let Some(role) = args.dcos_role {
        config.dcos_role = Some(role);
    }
    if let Some(name) = &args.name {
        config.name = Some(name.clone());
    }
    if let Some(connector) = args.connector {
        config.connector = Some(connector);
    }
    if let Some(level) = args.log_level {
        config.log_level = Some(level);
    }

    Ok(config)
}

/// Configuration loading with multiple format support.
///
/// An explicit path that does not exist is an error; when no path is given
/// the default locations are searched and a missing file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PluginError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p.to_path_buf()
        }
        None => {
            let defaults = [
                "/etc/dcos-metrics-plugin/plugin.yaml",
                "/etc/dcos-metrics-plugin/plugin.yml",
                "/etc/dcos-metrics-plugin/plugin.json",
                "./dcos-metrics-plugin.yaml",
                "./dcos-metrics-plugin.yml",
                "./dcos-metrics-plugin.json",
            ];

            match defaults.iter().map(PathBuf::from).find(|p| p.exists()) {
                Some(p) => p,
                None => return Ok(Config::default()),
            }
        }
    };

    let content = fs::read_to_string(&path).map_err(|e| {
        PluginError::Config(format!("Cannot read config file {}: {}", path.display(), e))
    })?;

    let parsed = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str::<Config>(&content).map_err(|e| e.to_string()),
        Some("toml") => toml::from_str::<Config>(&content).map_err(|e| e.to_string()),
        // Default to YAML
        _ => serde_yaml::from_str::<Config>(&content).map_err(|e| e.to_string()),
    };

    let config = parsed.map_err(|e| {
        PluginError::Config(format!("Invalid config file {}: {}", path.display(), e))
    })?;
    info!("Loaded configuration from: {}", path.display());
    Ok(config.with_defaults())
}

impl Config {
    /// Fills every unset field with its default value.
    fn with_defaults(self) -> Self {
        let d = Config::default();
        Self {
            name: self.name.or(d.name),
            metrics_host: self.metrics_host.or(d.metrics_host),
            metrics_proto: self.metrics_proto.or(d.metrics_proto),
            metrics_port: self.metrics_port.or(d.metrics_port),
            polling_interval: self.polling_interval.or(d.polling_interval),
            request_timeout: self.request_timeout.or(d.request_timeout),
            auth_token: self.auth_token.or(d.auth_token),
            dcos_role: self.dcos_role.or(d.dcos_role),
            connector: self.connector.or(d.connector),
            log_level: self.log_level.or(d.log_level),
        }
    }
}

/// Shows configuration in requested format. The auth token is masked.
pub fn show_config(config: &Config, format: ConfigFormat) -> anyhow::Result<()> {
    let mut config = config.clone();
    if config.auth_token.is_some() {
        config.auth_token = Some("********".into());
    }

    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
        ConfigFormat::Toml => toml::to_string_pretty(&config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(&config)?,
    };

    println!("{output}");
    Ok(())
}

/// Immutable, validated settings of a running poller.
#[derive(Clone, PartialEq, Eq)]
pub struct PollConfig {
    host: String,
    scheme: String,
    port: u16,
    role: Role,
    auth_token: String,
    polling_interval: Duration,
    request_timeout: Duration,
    name: String,
}

impl PollConfig {
    pub fn builder() -> PollConfigBuilder {
        PollConfigBuilder::default()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    pub fn polling_interval(&self) -> Duration {
        self.polling_interval
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `scheme://host:port` of the metrics service.
    pub fn base_url(&self) -> String {
        // IPv6 literals need brackets to be joined with a port
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("{}://[{}]:{}", self.scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        }
    }

    /// Full URL for an endpoint path.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url(), path)
        } else {
            format!("{}/{}", self.base_url(), path)
        }
    }
}

impl fmt::Debug for PollConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url())
            .field("role", &self.role)
            .field("auth_token", &"********")
            .field("polling_interval", &self.polling_interval)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Builder for [`PollConfig`]; unset fields take the documented defaults
/// except role and auth token, which are required.
#[derive(Debug, Clone, Default)]
pub struct PollConfigBuilder {
    host: Option<String>,
    scheme: Option<String>,
    port: Option<u16>,
    role: Option<String>,
    auth_token: Option<String>,
    polling_interval: Option<u64>,
    request_timeout: Option<u64>,
    name: Option<String>,
}

impl PollConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Role in its textual form; validated in [`build`](Self::build).
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Polling interval in whole seconds.
    pub fn polling_interval(mut self, seconds: u64) -> Self {
        self.polling_interval = Some(seconds);
        self
    }

    /// Per-request timeout in whole seconds.
    pub fn request_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout = Some(seconds);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn build(self) -> Result<PollConfig> {
        let role: Role = match self.role.as_deref() {
            Some(r) => r.parse()?,
            None => {
                return Err(PluginError::Config(
                    "Role must be set, use --dcos-role <master|agent|agent-public>".into(),
                ))
            }
        };

        let auth_token = self.auth_token.unwrap_or_default();
        if auth_token.is_empty() {
            return Err(PluginError::Config(
                "Auth token must be set, use --auth-token <token>".into(),
            ));
        }

        let polling_interval = self.polling_interval.unwrap_or(DEFAULT_POLLING_INTERVAL);
        if polling_interval == 0 {
            return Err(PluginError::Config(
                "Polling interval must be a positive number of seconds".into(),
            ));
        }

        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        if request_timeout == 0 {
            return Err(PluginError::Config(
                "Request timeout must be a positive number of seconds".into(),
            ));
        }

        let scheme = self
            .scheme
            .unwrap_or_else(|| DEFAULT_METRICS_PROTO.to_string())
            .to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(PluginError::Config(format!(
                "Invalid metrics protocol '{}', expected 'http' or 'https'",
                scheme
            )));
        }

        let host = self
            .host
            .unwrap_or_else(|| DEFAULT_METRICS_HOST.to_string());
        if host.trim().is_empty() {
            return Err(PluginError::Config("Metrics host must not be empty".into()));
        }

        let port = self.port.unwrap_or(DEFAULT_METRICS_PORT);
        if port == 0 {
            return Err(PluginError::Config("Metrics port must not be 0".into()));
        }

        Ok(PollConfig {
            host,
            scheme,
            port,
            role,
            auth_token,
            polling_interval: Duration::from_secs(polling_interval),
            request_timeout: Duration::from_secs(request_timeout),
            name: self.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
        })
    }
}

impl TryFrom<&Config> for PollConfig {
    type Error = PluginError;

    fn try_from(cfg: &Config) -> Result<Self> {
        let mut builder = PollConfig::builder();
        if let Some(host) = &cfg.metrics_host {
            builder = builder.host(host.clone());
        }
        if let Some(proto) = &cfg.metrics_proto {
            builder = builder.scheme(proto.clone());
        }
        if let Some(port) = cfg.metrics_port {
            builder = builder.port(port);
        }
        if let Some(role) = cfg.dcos_role {
            builder = builder.role(role.as_str());
        }
        if let Some(token) = &cfg.auth_token {
            builder = builder.auth_token(token.clone());
        }
        if let Some(interval) = cfg.polling_interval {
            builder = builder.polling_interval(interval);
        }
        if let Some(timeout) = cfg.request_timeout {
            builder = builder.request_timeout(timeout);
        }
        if let Some(name) = &cfg.name {
            builder = builder.name(name.clone());
        }
        builder.build()
    }
}
