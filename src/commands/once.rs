//! Once command implementation.
//!
//! Runs a single poll cycle and prints the collected batch.

use std::time::Instant;

use dcos_metrics_plugin::cli::OutputFormat;
use dcos_metrics_plugin::{Batch, MetricsMessage, PollConfig, Poller};

/// Collects one batch and writes it to stdout in the requested format.
pub async fn command_once(
    config: PollConfig,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    // The batch is printed here, not forwarded
    let discard = |_: &[MetricsMessage]| -> anyhow::Result<()> { Ok(()) };
    let poller = Poller::new(config, discard)?;

    let start = Instant::now();
    let batch: Batch = poller.collect().await?;
    let datapoints: usize = batch.iter().map(|m| m.len()).sum();

    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&batch)?,
        OutputFormat::Yaml => serde_yaml::to_string(&batch)?,
    };
    println!("{output}");

    eprintln!(
        "✅ Collected {} messages ({} datapoints) in {:.2}ms",
        batch.len(),
        datapoints,
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}
