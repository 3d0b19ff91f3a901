//! DC/OS Metrics Plugin Library
//!
//! This library polls the DC/OS metrics service of the local node and hands
//! the decoded metrics to a pluggable connector. It is designed to be embedded
//! by connector implementations that only need to supply the delivery step.
//!
//! # Features
//!
//! - **Role-based endpoints**: masters poll node metrics, agents also discover
//!   and poll one endpoint per running container
//! - **Authenticated requests**: every call carries `Authorization: token=<token>`
//! - **Fail-fast polling**: any failed request or connector call ends the loop
//! - **Graceful shutdown**: the loop stops between fetches or while sleeping
//!   when its cancellation token fires
//!
//! # Usage
//!
//! ```rust,no_run
//! use dcos_metrics_plugin::{MetricsMessage, PollConfig, Poller};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PollConfig::builder()
//!     .role("agent")
//!     .auth_token("my-token")
//!     .polling_interval(10)
//!     .build()?;
//!
//! let sink = |batch: &[MetricsMessage]| -> anyhow::Result<()> {
//!     println!("received {} messages", batch.len());
//!     Ok(())
//! };
//!
//! let poller = Poller::new(config, sink)?;
//! poller.run(&CancellationToken::new()).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod connector;
pub mod error;
pub mod fetcher;
pub mod producers;
pub mod resolver;
pub mod role;
pub mod scheduler;
pub mod stats;
pub mod ticker;

// Re-export main types for convenience
pub use config::{Config, PollConfig, PollConfigBuilder};
pub use connector::Connector;
pub use error::{PluginError, Result};
pub use fetcher::Fetcher;
pub use producers::{Batch, Datapoint, Dimensions, MetricsMessage};
pub use resolver::{resolve, EndpointSet};
pub use role::Role;
pub use scheduler::Poller;
pub use stats::PollStats;
pub use ticker::Ticker;
