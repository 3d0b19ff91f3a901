//! Integration tests for endpoint resolution against a fake metrics service.

mod common;

use common::{dead_port, FakeMetricsService};
use dcos_metrics_plugin::resolver::{CONTAINERS_PATH, NODE_METRICS_PATH};
use dcos_metrics_plugin::{resolve, Fetcher, PluginError, PollConfig, Role};

#[tokio::test]
async fn test_master_resolves_node_only_without_discovery() {
    let service = FakeMetricsService::start().await;
    service.route(CONTAINERS_PATH, r#"["c1","c2"]"#);

    let config = service.config("master");
    let fetcher = Fetcher::new(&config).unwrap();
    let endpoints = resolve(&fetcher).await.unwrap();

    assert_eq!(endpoints.as_slice(), [NODE_METRICS_PATH.to_string()]);
    assert!(service.hits().is_empty(), "master must not call discovery");
}

#[tokio::test]
async fn test_agent_roles_append_containers_in_order() {
    let service = FakeMetricsService::start().await;
    service.route(CONTAINERS_PATH, r#"["c1","c2"]"#);

    for role in ["agent", "agent-public"] {
        let config = service.config(role);
        let fetcher = Fetcher::new(&config).unwrap();
        let endpoints: Vec<String> = resolve(&fetcher).await.unwrap().into();

        assert_eq!(
            endpoints,
            vec![
                "/system/v1/metrics/v0/node".to_string(),
                "/system/v1/metrics/v0/containers/c1".to_string(),
                "/system/v1/metrics/v0/containers/c2".to_string(),
            ],
            "role {role}"
        );
    }
    assert_eq!(service.hits(), vec![CONTAINERS_PATH, CONTAINERS_PATH]);
}

#[tokio::test]
async fn test_agent_with_no_containers() {
    let service = FakeMetricsService::start().await;
    service.route(CONTAINERS_PATH, "[]");

    let config = service.config("agent");
    let fetcher = Fetcher::new(&config).unwrap();
    let endpoints = resolve(&fetcher).await.unwrap();

    assert_eq!(endpoints.len(), 1);
}

#[tokio::test]
async fn test_null_container_list_means_no_containers() {
    let service = FakeMetricsService::start().await;
    service.route(CONTAINERS_PATH, "null");

    let config = service.config("agent");
    let fetcher = Fetcher::new(&config).unwrap();
    let endpoints = resolve(&fetcher).await.unwrap();

    assert_eq!(endpoints.as_slice(), [NODE_METRICS_PATH.to_string()]);
}

#[tokio::test]
async fn test_discovery_transport_error_fails_resolution() {
    let config = PollConfig::builder()
        .host("127.0.0.1")
        .port(dead_port().await)
        .role("agent")
        .auth_token("t")
        .build()
        .unwrap();
    let fetcher = Fetcher::new(&config).unwrap();

    let err = resolve(&fetcher).await.unwrap_err();
    assert!(matches!(err, PluginError::Transport { .. }), "{err}");
}

#[tokio::test]
async fn test_discovery_decode_error_fails_resolution() {
    let service = FakeMetricsService::start().await;
    service.route(CONTAINERS_PATH, r#"{"containers": ["c1"]}"#);

    let config = service.config("agent");
    let fetcher = Fetcher::new(&config).unwrap();
    let err = resolve(&fetcher).await.unwrap_err();

    match err {
        PluginError::Decode { path, body, .. } => {
            assert_eq!(path, CONTAINERS_PATH);
            assert!(body.contains("containers"));
        }
        other => panic!("expected decode error, got {other}"),
    }
}

#[tokio::test]
async fn test_unknown_role_rejected_before_any_request() {
    let service = FakeMetricsService::start().await;

    let err = PollConfig::builder()
        .host("127.0.0.1")
        .port(service.addr.port())
        .role("slave")
        .auth_token("t")
        .build()
        .unwrap_err();

    assert!(err.is_config());
    assert!("slave".parse::<Role>().is_err());
    assert!(service.hits().is_empty());
}
