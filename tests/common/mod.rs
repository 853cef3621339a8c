//! Shared utilities for integration testing.
//!
//! Spins up a mock content service (an axum app serving the envelope,
//! asset and search endpoints from in-memory fixtures), writes control
//! directory fixtures and starts the gateway on an ephemeral port.

// Each integration test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path as AxumPath, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use docs_presenter::config::loader::load_routing_tables;
use docs_presenter::config::{DomainConfigStore, PresenterConfig};
use docs_presenter::http::HttpServer;
use docs_presenter::lifecycle::Shutdown;

/// Fixtures for the mock content service.
#[derive(Clone, Default)]
pub struct MockContent {
    pub envelopes: Arc<HashMap<String, Value>>,
    pub assets: Arc<Value>,
    pub search: Arc<Value>,
}

impl MockContent {
    pub fn new(envelopes: HashMap<String, Value>) -> Self {
        Self {
            envelopes: Arc::new(envelopes),
            assets: Arc::new(json!({})),
            search: Arc::new(json!({ "total": 0, "results": [] })),
        }
    }

    pub fn with_assets(mut self, assets: Value) -> Self {
        self.assets = Arc::new(assets);
        self
    }

    pub fn with_search(mut self, search: Value) -> Self {
        self.search = Arc::new(search);
        self
    }
}

async fn mock_envelope(
    State(mock): State<MockContent>,
    AxumPath(content_id): AxumPath<String>,
) -> Response {
    match mock.envelopes.get(&content_id) {
        Some(envelope) => Json(envelope.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("no document {content_id}") })),
        )
            .into_response(),
    }
}

async fn mock_assets(State(mock): State<MockContent>) -> Json<Value> {
    Json((*mock.assets).clone())
}

async fn mock_search(
    State(mock): State<MockContent>,
    Query(_params): Query<HashMap<String, String>>,
) -> Json<Value> {
    Json((*mock.search).clone())
}

/// Start the mock content service on an ephemeral port.
pub async fn start_content_service(mock: MockContent) -> SocketAddr {
    let app = Router::new()
        .route("/content/{id}", get(mock_envelope))
        .route("/assets", get(mock_assets))
        .route("/search", get(mock_search))
        .with_state(mock);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Write the three control directory files.
pub fn write_control_dir(dir: &Path, content: Value, rewrites: Value, templates: Value) {
    std::fs::write(
        dir.join("content-map.json"),
        serde_json::to_string_pretty(&content).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join("rewrite-map.json"),
        serde_json::to_string_pretty(&rewrites).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.join("template-routes.json"),
        serde_json::to_string_pretty(&templates).unwrap(),
    )
    .unwrap();
}

/// Write a minimal template set: a default page template plus error pages.
pub fn write_templates(dir: &Path) {
    std::fs::write(
        dir.join("default.html"),
        "<h1>{{ title }}</h1><main>{{ content }}</main><nav>{{ toc }}</nav>",
    )
    .unwrap();
    std::fs::write(dir.join("404.html"), "<h1>missing: {{ content }}</h1>").unwrap();
    std::fs::write(dir.join("5xx.html"), "<h1>broken: {{ content }}</h1>").unwrap();
    std::fs::write(dir.join("error.html"), "<h1>error: {{ content }}</h1>").unwrap();
}

/// Start the gateway with the given config, returning its address and the
/// shutdown handle. The caller keeps the handle alive for the test.
pub async fn start_gateway(config: PresenterConfig) -> (SocketAddr, Shutdown) {
    let tables = load_routing_tables(&config.control.path);
    let store = Arc::new(DomainConfigStore::new(tables));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let server = HttpServer::new(config, store).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

/// A gateway configuration pointed at the test fixtures.
pub fn gateway_config(
    control: &Path,
    templates: &Path,
    content_addr: SocketAddr,
) -> PresenterConfig {
    let mut config = PresenterConfig::default();
    config.control.path = control.to_path_buf();
    config.templates.root = templates.to_path_buf();
    config.content_service.url = format!("http://{content_addr}");
    config
}

/// A reqwest client that resolves `domain` to the gateway's socket and does
/// not follow redirects, so Location headers stay observable. Requests go to
/// `http://{domain}:{port}/...` and arrive with the right Host header.
pub fn client_for(domain: &str, addr: SocketAddr) -> reqwest::Client {
    reqwest::Client::builder()
        .resolve(domain, addr)
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
