//! dcos-metrics-plugin - version 0.1.0
//!
//! Metrics polling agent with tracing logging.
//! This is the main entry point that resolves configuration, starts the poll
//! loop and handles subcommands.

mod commands;

use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Level};

use commands::{command_config, command_endpoints, command_once};
use dcos_metrics_plugin::cli::{Args, Commands, ConnectorKind, LogLevel};
use dcos_metrics_plugin::config::{resolve_config, show_config, Config};
use dcos_metrics_plugin::{connector, PollConfig, Poller};

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(config: &Config) {
    let level = config.log_level.unwrap_or(LogLevel::Info);
    let log_level = match level {
        LogLevel::Off => Level::ERROR,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    // stdout may carry connector output; logs go to stderr
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    info!("Logging initialized with level: {:?}", level);
}

/// Loads the merged config and turns it into a validated [`PollConfig`].
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> (Config, PollConfig) {
    let config = match resolve_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration invalid: {}", e);
            std::process::exit(1);
        }
    };
    match PollConfig::try_from(&config) {
        Ok(poll_config) => (config, poll_config),
        Err(e) => {
            eprintln!("❌ Configuration invalid: {}", e);
            std::process::exit(1);
        }
    }
}

/// Cancels `token` on SIGINT or SIGTERM.
async fn shutdown_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    token.cancel();
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = match resolve_config(&args) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
        };

        if args.check_config {
            if let Err(e) = PollConfig::try_from(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        show_config(&config, args.config_format.clone())?;
        return Ok(());
    }

    // Config generation needs no valid config
    if let Some(Commands::Config {
        output,
        format,
        commented,
    }) = &args.command
    {
        return command_config(output.clone(), format.clone(), *commented);
    }

    let (config, poll_config) = load_validated_config(&args);
    setup_logging(&config);

    match &args.command {
        Some(Commands::Once { format }) => {
            return command_once(poll_config, format.clone()).await;
        }
        Some(Commands::Endpoints) => {
            return command_endpoints(&poll_config).await;
        }
        Some(Commands::Config { .. }) => unreachable!("Config handled above"),
        None => {}
    }

    info!("Starting dcos-metrics-plugin '{}'", poll_config.name());

    let connector = connector::from_kind(config.connector.unwrap_or(ConnectorKind::Log));
    let poller = Poller::with_connector(poll_config, connector)?;

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_on_signal(cancel.clone()));

    if let Err(e) = poller.run(&cancel).await {
        error!("Polling stopped: {}", e);
        std::process::exit(1);
    }

    info!("dcos-metrics-plugin stopped gracefully");
    Ok(())
}
