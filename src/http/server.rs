//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the shared `AppState` from configuration
//! - Create the axum router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::routing::{any, get};
use axum::Router;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use url::Url;

use crate::backend::ContentClient;
use crate::config::store::DomainConfigStore;
use crate::config::PresenterConfig;
use crate::content::filters::{DirectiveFilter, SiblingLinkFilter};
use crate::content::pipeline::FilterPipeline;
use crate::http::handlers;
use crate::render::{FileTemplateRenderer, TemplateRenderer};
use crate::routing::StagingOverlay;

/// Failure to assemble the server from configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid content service URL: {0}")]
    ContentServiceUrl(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PresenterConfig>,
    pub store: Arc<DomainConfigStore>,
    pub staging: Arc<StagingOverlay>,
    pub content: ContentClient,
    pub renderer: Arc<dyn TemplateRenderer>,
    pub pipeline: Arc<FilterPipeline>,
    pub proxy_client: Client<HttpConnector, Body>,
}

/// HTTP server for the presentation gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Assemble the server: content client, staging overlay, renderer and
    /// the default filter pipeline (directive + sibling-link stages).
    pub fn new(config: PresenterConfig, store: Arc<DomainConfigStore>) -> Result<Self, ServerError> {
        let content = ContentClient::new(
            Url::parse(&config.content_service.url)?,
            Duration::from_secs(config.content_service.timeout_secs),
        )?;

        let staging = Arc::new(StagingOverlay::new(
            config.staging.enabled,
            config.staging.default_domain.clone(),
        ));

        let renderer: Arc<dyn TemplateRenderer> =
            Arc::new(FileTemplateRenderer::new(config.templates.root.clone()));

        let mut pipeline = FilterPipeline::new();
        pipeline.add(Box::new(DirectiveFilter::new()));
        pipeline.add(Box::new(SiblingLinkFilter));

        let proxy_client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let request_timeout = Duration::from_secs(config.timeouts.request_secs);
        let state = AppState {
            config: Arc::new(config),
            store,
            staging,
            content,
            renderer,
            pipeline: Arc::new(pipeline),
            proxy_client,
        };

        Ok(Self {
            router: Self::build_router(state, request_timeout),
        })
    }

    fn build_router(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/robots.txt", any(handlers::robots::robots))
            .route("/_api/status", get(handlers::status))
            .route("/_api/whereis/{*content_id}", get(handlers::whereis::whereis))
            .route("/_api/search", get(handlers::search::search))
            .route("/", any(handlers::pages::serve))
            .route("/{*path}", any(handlers::pages::serve))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(request_timeout))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server until ctrl-c or a shutdown broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Shutdown signal received");
                    }
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown broadcast received");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
