//! Role-based endpoint resolution.
//!
//! Masters poll only the node endpoint. Agents additionally ask the metrics
//! service which containers are running and poll one endpoint per container.
//! The set is rebuilt every cycle so container churn is picked up.

use tracing::{info, instrument};

use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::role::Role;

pub const NODE_METRICS_PATH: &str = "/system/v1/metrics/v0/node";
pub const CONTAINERS_PATH: &str = "/system/v1/metrics/v0/containers";
pub const CONTAINER_METRICS_PREFIX: &str = "/system/v1/metrics/v0/containers/";

/// Ordered endpoint paths polled in one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointSet(Vec<String>);

impl EndpointSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a EndpointSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<EndpointSet> for Vec<String> {
    fn from(set: EndpointSet) -> Self {
        set.0
    }
}

/// Path of the metrics endpoint for one container.
pub fn container_path(id: &str) -> String {
    format!("{}{}", CONTAINER_METRICS_PREFIX, id)
}

/// Builds the endpoint set for the role of the fetcher's configuration.
///
/// Agent roles perform one discovery request; if it fails no partial set is
/// returned. A `null` container list means no containers.
#[instrument(skip_all, fields(role = %fetcher.config().role()))]
pub async fn resolve(fetcher: &Fetcher) -> Result<EndpointSet> {
    let role = fetcher.config().role();
    info!("Setting plugin endpoints for role {}", role);

    let mut endpoints = vec![NODE_METRICS_PATH.to_string()];

    match role {
        Role::Master => {}
        Role::Agent | Role::AgentPublic => {
            let containers: Option<Vec<String>> = fetcher.fetch_json(CONTAINERS_PATH).await?;
            for id in containers.unwrap_or_default() {
                let e = container_path(&id);
                info!("Discovered new container endpoint {}", e);
                endpoints.push(e);
            }
        }
    }

    Ok(EndpointSet(endpoints))
}
