//! Endpoints command implementation.
//!
//! Resolves the endpoint set for the configured role and prints it.

use dcos_metrics_plugin::{resolve, Fetcher, PollConfig};

/// Prints the endpoints one poll cycle would fetch.
pub async fn command_endpoints(config: &PollConfig) -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = Fetcher::new(config)?;
    let endpoints = resolve(&fetcher).await?;

    println!(
        "📡 {} endpoint(s) for role {} at {}",
        endpoints.len(),
        config.role(),
        config.base_url()
    );
    for path in &endpoints {
        println!("   {}", path);
    }
    Ok(())
}
