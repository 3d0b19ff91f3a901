//! The poll loop.
//!
//! Each cycle resolves the endpoint set, fetches every endpoint in order and
//! hands the complete batch to the connector, then sleeps for the polling
//! interval. Any failure aborts the cycle, discards the partial batch and
//! ends the loop with that error; there is no retry.

use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::config::PollConfig;
use crate::connector::Connector;
use crate::error::{PluginError, Result};
use crate::fetcher::Fetcher;
use crate::producers::Batch;
use crate::resolver::{self, EndpointSet};
use crate::stats::PollStats;
use crate::ticker::Ticker;

/// Periodic collector for one metrics service.
pub struct Poller {
    config: PollConfig,
    fetcher: Fetcher,
    connector: Box<dyn Connector>,
    ticker: Ticker,
    stats: Arc<PollStats>,
}

impl Poller {
    pub fn new<C: Connector + 'static>(config: PollConfig, connector: C) -> Result<Self> {
        Self::with_connector(config, Box::new(connector))
    }

    pub fn with_connector(config: PollConfig, connector: Box<dyn Connector>) -> Result<Self> {
        let fetcher = Fetcher::new(&config)?;
        let ticker = Ticker::new(config.polling_interval());
        Ok(Self {
            config,
            fetcher,
            connector,
            ticker,
            stats: Arc::new(PollStats::new()),
        })
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn stats(&self) -> Arc<PollStats> {
        Arc::clone(&self.stats)
    }

    /// Resolves the endpoints for the configured role.
    pub async fn endpoints(&self) -> Result<EndpointSet> {
        resolver::resolve(&self.fetcher).await
    }

    /// Runs one resolve + fetch pass and returns the batch without
    /// forwarding it.
    pub async fn collect(&self) -> Result<Batch> {
        let never = CancellationToken::new();
        Ok(self.collect_until(&never).await?.unwrap_or_default())
    }

    /// Runs one full cycle including the connector call. Returns the number
    /// of messages forwarded.
    pub async fn poll_once(&self) -> Result<usize> {
        let start = Instant::now();
        let batch = match self.collect().await {
            Ok(batch) => batch,
            Err(e) => {
                self.stats.record_failure();
                return Err(e);
            }
        };
        self.forward(&batch, start).await?;
        Ok(batch.len())
    }

    /// Polls until `cancel` fires or a cycle fails.
    ///
    /// Returns `Ok(())` only after cancellation; every other exit carries the
    /// error that ended the loop.
    #[instrument(skip_all, fields(plugin = %self.config.name()))]
    pub async fn run(&self, cancel: &CancellationToken) -> Result<()> {
        info!(
            "Polling {} as {} every {} seconds via '{}' connector",
            self.config.base_url(),
            self.config.role(),
            self.ticker.period().as_secs(),
            self.connector.name()
        );

        loop {
            let start = Instant::now();
            let batch = match self.collect_until(cancel).await {
                Ok(Some(batch)) => batch,
                Ok(None) => break,
                Err(e) => {
                    self.stats.record_failure();
                    return Err(e);
                }
            };

            self.forward(&batch, start).await?;

            info!(
                "Polling complete, sleeping for {} seconds",
                self.ticker.period().as_secs()
            );
            if !self.ticker.wait(cancel).await {
                break;
            }
        }

        info!("Poll loop cancelled, stopping");
        Ok(())
    }

    /// One resolve + fetch pass. `None` means `cancel` fired between fetches.
    #[instrument(skip_all, fields(plugin = %self.config.name()))]
    async fn collect_until(&self, cancel: &CancellationToken) -> Result<Option<Batch>> {
        info!("Getting metrics from metrics service");

        let endpoints = self.endpoints().await?;
        let mut batch = Batch::with_capacity(endpoints.len());

        for path in &endpoints {
            if cancel.is_cancelled() {
                debug!("Cancelled with {} of {} endpoints fetched", batch.len(), endpoints.len());
                return Ok(None);
            }

            let message = self.fetcher.fetch(path).await?;
            self.stats.record_fetch();
            info!("Received data from metrics service endpoint {}, success!", path);
            batch.push(message);
        }

        Ok(Some(batch))
    }

    async fn forward(&self, batch: &Batch, start: Instant) -> Result<()> {
        if let Err(e) = self.connector.send(batch).await {
            self.stats.record_failure();
            return Err(PluginError::Connector(e));
        }

        let datapoints: usize = batch.iter().map(|m| m.len()).sum();
        let elapsed = start.elapsed().as_secs_f64();
        self.stats.record_success(datapoints as u64, elapsed);

        let (_, avg, max, min, count) = self.stats.cycle_duration_seconds.snapshot();
        info!(
            "Cycle completed: {} messages ({} datapoints) in {:.2}ms; {} cycles ({} failed), {} endpoints fetched, cycle time avg/min/max {:.2}/{:.2}/{:.2}ms over {} cycles",
            batch.len(),
            datapoints,
            elapsed * 1000.0,
            self.stats.cycles(),
            self.stats.failures(),
            self.stats.fetched(),
            avg * 1000.0,
            min * 1000.0,
            max * 1000.0,
            count
        );
        Ok(())
    }
}
