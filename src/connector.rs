//! Downstream connectors.
//!
//! A connector receives the decoded batch of every successful poll cycle.
//! Any closure `Fn(&[MetricsMessage]) -> anyhow::Result<()>` is a connector,
//! which is how embedders plug in their own telemetry sink.

use async_trait::async_trait;
use std::io::Write;
use tracing::info;

use crate::cli::ConnectorKind;
use crate::producers::MetricsMessage;

#[async_trait]
pub trait Connector: Send + Sync {
    fn name(&self) -> &str {
        "custom"
    }

    /// Forwards one cycle's batch. An error stops the poll loop.
    async fn send(&self, batch: &[MetricsMessage]) -> anyhow::Result<()>;
}

#[async_trait]
impl<F> Connector for F
where
    F: Fn(&[MetricsMessage]) -> anyhow::Result<()> + Send + Sync,
{
    async fn send(&self, batch: &[MetricsMessage]) -> anyhow::Result<()> {
        self(batch)
    }
}

/// Logs one summary line per message.
#[derive(Debug, Default)]
pub struct LogConnector;

#[async_trait]
impl Connector for LogConnector {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, batch: &[MetricsMessage]) -> anyhow::Result<()> {
        for msg in batch {
            let d = &msg.dimensions;
            info!(
                name = %msg.name,
                datapoints = msg.len(),
                hostname = %d.hostname,
                container_id = %d.container_id,
                task_name = %d.task_name,
                "metrics message"
            );
        }
        Ok(())
    }
}

/// Writes every message as one JSON line.
pub struct JsonLinesConnector<W> {
    out: std::sync::Mutex<W>,
}

impl JsonLinesConnector<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> JsonLinesConnector<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: std::sync::Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl<W: Write + Send> Connector for JsonLinesConnector<W> {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn send(&self, batch: &[MetricsMessage]) -> anyhow::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow::anyhow!("output writer lock poisoned"))?;
        for msg in batch {
            serde_json::to_writer(&mut *out, msg)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Builds the built-in connector selected in the configuration.
pub fn from_kind(kind: ConnectorKind) -> Box<dyn Connector> {
    match kind {
        ConnectorKind::Log => Box::new(LogConnector),
        ConnectorKind::Stdout => Box::new(JsonLinesConnector::stdout()),
    }
}
