//! Per-request context.
//!
//! One `RequestContext` is created when a request arrives and threaded as an
//! explicit parameter through every stage; it is never shared across
//! requests and never outlives the response.

use std::time::Duration;

use axum::body::Body;
use axum::http::Request;

use crate::config::schema::PresenterConfig;

/// Wall-clock spent in each request stage, for the per-request summary.
#[derive(Debug, Clone, Default)]
pub struct StageTimings {
    pub content: Option<Duration>,
    pub assets: Option<Duration>,
    pub toc: Option<Duration>,
    pub render: Option<Duration>,
}

/// Mutable per-request state.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID assigned by the request-id layer.
    pub request_id: String,

    /// Host header value, port stripped.
    pub host: String,

    /// Protocol for presented URLs (X-Forwarded-Proto or the configured
    /// default).
    pub protocol: String,

    /// Path as received, before rewrites and staging strip.
    pub original_path: String,

    /// Logical routing domain. Equals `host` in normal mode; in staging mode
    /// the staged host override or the configured default domain.
    pub domain: String,

    /// Staging revision, when the request carried one.
    pub revision_id: Option<String>,

    /// Staging host override, when the request carried one.
    pub staging_host: Option<String>,

    /// Resolved content ID, once resolution has run.
    pub content_id: Option<String>,

    /// Resolved template path, once template routing has run.
    pub template_path: Option<String>,

    pub timings: StageTimings,
}

impl RequestContext {
    pub fn from_request(request: &Request<Body>, config: &PresenterConfig) -> Self {
        let host = request
            .headers()
            .get("host")
            .and_then(|h| h.to_str().ok())
            .map(|h| h.split(':').next().unwrap_or(h).to_string())
            .unwrap_or_default();

        let protocol = request
            .headers()
            .get("x-forwarded-proto")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| config.presented.protocol.clone());

        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let domain = if config.staging.enabled {
            config.staging.default_domain.clone()
        } else {
            host.clone()
        };

        Self {
            request_id,
            domain,
            host,
            protocol,
            original_path: request.uri().path().to_string(),
            revision_id: None,
            staging_host: None,
            content_id: None,
            template_path: None,
            timings: StageTimings::default(),
        }
    }

    /// Record the staging split outcome and switch the routing domain to the
    /// staged host when one was embedded in the path.
    pub fn apply_staging(&mut self, revision_id: String, staging_host: Option<String>) {
        if let Some(host) = &staging_host {
            self.domain = host.clone();
        }
        self.revision_id = Some(revision_id);
        self.staging_host = staging_host;
    }
}
