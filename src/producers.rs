//! Wire schema of the DC/OS metrics service.
//!
//! Every metrics endpoint answers with one [`MetricsMessage`]. The plugin does
//! not interpret the content; it only requires that the body decodes and
//! passes the value through to the connector unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One metrics document as served by `/system/v1/metrics/v0/...`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsMessage {
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub datapoints: Vec<Datapoint>,
    #[serde(deserialize_with = "null_as_default")]
    pub dimensions: Dimensions,
    #[serde(skip_serializing_if = "is_zero")]
    pub timestamp: i64,
}

/// A single measured value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Datapoint {
    pub name: String,
    /// Numeric in practice, but the service does not guarantee it.
    pub value: serde_json::Value,
    pub unit: String,
    pub timestamp: String,
    #[serde(
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub tags: BTreeMap<String, String>,
}

/// Identifying dimensions shared by all datapoints of a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mesos_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cluster_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub container_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub executor_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub framework_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub framework_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub framework_role: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub framework_principal: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub task_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub task_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    #[serde(
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub labels: BTreeMap<String, String>,
}

/// The metrics service encodes empty lists and maps as `null`.
pub(crate) fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Option::unwrap_or_default)
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

impl MetricsMessage {
    /// Number of datapoints carried by this message.
    pub fn len(&self) -> usize {
        self.datapoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datapoints.is_empty()
    }
}

/// Ordered messages of one poll cycle, in endpoint order.
pub type Batch = Vec<MetricsMessage>;

#[cfg(test)]
mod tests {
    use super::*;

    const NODE_BODY: &str = r#"{
        "name": "dcos.metrics.node",
        "datapoints": [
            {"name": "load.1min", "value": 0.42, "unit": "count", "timestamp": "2016-12-01T19:41:53Z"},
            {"name": "filesystem.capacity.used", "value": 1024, "unit": "bytes",
             "timestamp": "2016-12-01T19:41:53Z", "tags": {"path": "/"}}
        ],
        "dimensions": {"mesos_id": "agent-1", "cluster_id": "c-9", "hostname": "10.0.0.4"}
    }"#;

    #[test]
    fn decodes_node_document() {
        let msg: MetricsMessage = serde_json::from_str(NODE_BODY).unwrap();
        assert_eq!(msg.name, "dcos.metrics.node");
        assert_eq!(msg.len(), 2);
        assert_eq!(msg.dimensions.hostname, "10.0.0.4");
        assert_eq!(msg.datapoints[1].tags.get("path").map(String::as_str), Some("/"));
        assert_eq!(msg.datapoints[0].value, serde_json::json!(0.42));
    }

    #[test]
    fn missing_fields_default() {
        let msg: MetricsMessage = serde_json::from_str("{}").unwrap();
        assert!(msg.is_empty());
        assert_eq!(msg, MetricsMessage::default());
    }

    #[test]
    fn null_collections_decode_as_empty() {
        let body = r#"{
            "name": "dcos.metrics.container",
            "datapoints": null,
            "dimensions": {"container_id": "c1", "labels": null}
        }"#;
        let msg: MetricsMessage = serde_json::from_str(body).unwrap();
        assert!(msg.is_empty());
        assert!(msg.dimensions.labels.is_empty());
        assert_eq!(msg.dimensions.container_id, "c1");

        let point: Datapoint =
            serde_json::from_str(r#"{"name": "cpus.user", "value": 1.5, "tags": null}"#).unwrap();
        assert!(point.tags.is_empty());

        let msg: MetricsMessage =
            serde_json::from_str(r#"{"name": "n", "dimensions": null}"#).unwrap();
        assert_eq!(msg.dimensions, Dimensions::default());
    }

    #[test]
    fn empty_dimensions_are_omitted() {
        let msg = MetricsMessage {
            name: "x".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["dimensions"], serde_json::json!({}));
        assert!(json.get("timestamp").is_none());
    }

    #[test]
    fn rejects_non_object() {
        assert!(serde_json::from_str::<MetricsMessage>("\"c1\"").is_err());
        assert!(serde_json::from_str::<MetricsMessage>("<html>").is_err());
    }
}
