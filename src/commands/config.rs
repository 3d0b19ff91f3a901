//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use dcos_metrics_plugin::cli::ConfigFormat;
use dcos_metrics_plugin::Config;

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = match output {
        Some(path) => path,
        None => PathBuf::from("dcos-metrics-plugin.yaml"),
    };

    let content = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
        ConfigFormat::Toml => toml::to_string_pretty(&config)?,
        ConfigFormat::Yaml => {
            let mut content = serde_yaml::to_string(&config)?;
            if commented {
                content = add_config_comments(content);
            }
            content
        }
    };

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# DC/OS Metrics Plugin Configuration
# ==================================
#
# Metrics Service
# ---------------
# metrics_host: "localhost"    # IP or hostname of the DC/OS metrics service
# metrics_proto: "http"        # http or https
# metrics_port: 61001          # Agent adminrouter port
#
# Polling
# -------
# polling_interval: 10         # Seconds between poll cycles (> 0)
# request_timeout: 30          # Per-request timeout in seconds (> 0)
#
# Identity (required)
# -------------------
# auth_token: null             # DC/OS authentication token (or DCOS_AUTH_TOKEN)
# dcos_role: null              # master, agent or agent-public
#
# Output
# ------
# name: "default"              # Plugin name used in log lines
# connector: "log"             # log or stdout
#
# Logging
# -------
# log_level: "info"            # off, error, warn, info, debug, trace
"#;

    format!("{comments}\n{yaml}")
}
