//! Fake DC/OS metrics service for integration tests.
//!
//! Serves canned bodies per path on `127.0.0.1` and records every request
//! (path and `Authorization` header) it receives.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode, Uri};
use axum::Router;
use dcos_metrics_plugin::{PollConfig, PollConfigBuilder};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const TOKEN: &str = "test-token";

#[derive(Default)]
struct Shared {
    routes: Mutex<HashMap<String, String>>,
    delays: Mutex<HashMap<String, Duration>>,
    hits: Mutex<Vec<(String, Option<String>)>>,
}

pub struct FakeMetricsService {
    pub addr: SocketAddr,
    shared: Arc<Shared>,
}

async fn serve(
    State(shared): State<Arc<Shared>>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let path = uri.path().to_string();
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    shared.hits.lock().unwrap().push((path.clone(), auth));

    let delay = shared.delays.lock().unwrap().get(&path).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    match shared.routes.lock().unwrap().get(&path) {
        Some(body) => (StatusCode::OK, body.clone()),
        None => (StatusCode::NOT_FOUND, "404 page not found".to_string()),
    }
}

impl FakeMetricsService {
    pub async fn start() -> Self {
        let shared = Arc::new(Shared::default());
        let app = Router::new().fallback(serve).with_state(shared.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, shared }
    }

    /// Serves `body` with status 200 on `path`.
    pub fn route(&self, path: &str, body: impl Into<String>) -> &Self {
        self.shared
            .routes
            .lock()
            .unwrap()
            .insert(path.to_string(), body.into());
        self
    }

    /// Serves `body` on `path` only after `delay`.
    pub fn route_slow(&self, path: &str, body: impl Into<String>, delay: Duration) -> &Self {
        self.shared
            .delays
            .lock()
            .unwrap()
            .insert(path.to_string(), delay);
        self.route(path, body)
    }

    /// Paths requested so far, in order.
    pub fn hits(&self) -> Vec<String> {
        self.shared
            .hits
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }

    /// Authorization headers received so far, in order.
    pub fn auth_headers(&self) -> Vec<Option<String>> {
        self.shared
            .hits
            .lock()
            .unwrap()
            .iter()
            .map(|(_, a)| a.clone())
            .collect()
    }

    /// Builder pointed at this service, for tests that tweak one setting.
    pub fn config_builder(&self, role: &str) -> PollConfigBuilder {
        PollConfig::builder()
            .host("127.0.0.1")
            .port(self.addr.port())
            .role(role)
            .auth_token(TOKEN)
            .polling_interval(1)
            .request_timeout(5)
            .name("test")
    }

    pub fn config(&self, role: &str) -> PollConfig {
        self.config_builder(role).build().unwrap()
    }
}

/// A port nothing listens on.
pub async fn dead_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// A minimal metrics document with `datapoints` datapoints.
pub fn message_body(name: &str, datapoints: usize) -> String {
    let points: Vec<String> = (0..datapoints)
        .map(|i| {
            format!(
                r#"{{"name":"{name}.{i}","value":{i},"unit":"count","timestamp":"2016-12-01T19:41:53Z"}}"#
            )
        })
        .collect();
    format!(
        r#"{{"name":"{name}","datapoints":[{}],"dimensions":{{"hostname":"10.0.0.4"}}}}"#,
        points.join(",")
    )
}
