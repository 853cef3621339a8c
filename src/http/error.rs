//! Request error taxonomy and the single error-rendering path.
//!
//! Every failure surfaced to a client goes through `error_response`, keyed
//! by status code. The status-class to template mapping is an explicit
//! match, looked up directly.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::backend::UpstreamError;
use crate::content::envelope::ContentEnvelope;
use crate::content::pipeline::FilterError;
use crate::http::context::RequestContext;
use crate::http::server::AppState;
use crate::render::{RenderError, RenderInput};

/// A failure that ends a request.
#[derive(Debug, Error)]
pub enum PresenterError {
    /// No routing prefix matches the path.
    #[error("no route for {path} on {domain}")]
    Unmapped { domain: String, path: String },

    /// The content service failed: infrastructure trouble (503) or a status
    /// passthrough.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Internal rewrites exceeded the hop bound; a cycle in the rule set is
    /// a configuration error, never a silent loop.
    #[error("rewrite loop: {hops} hops without settling on {path}")]
    RewriteLoop { path: String, hops: usize },

    /// A filter stage failed.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Template rendering failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The passthrough proxy upstream failed.
    #[error("proxy upstream failed: {0}")]
    Proxy(String),
}

impl PresenterError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PresenterError::Unmapped { .. } => StatusCode::NOT_FOUND,
            PresenterError::Upstream(err) => err
                .upstream_status()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::SERVICE_UNAVAILABLE),
            PresenterError::RewriteLoop { .. } | PresenterError::Filter(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            PresenterError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PresenterError::Proxy(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Template for a status class. Direct lookup, no event dispatch.
fn template_for(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "404.html",
        s if s.is_server_error() => "5xx.html",
        _ => "error.html",
    }
}

/// Render an error response through the domain's error template, falling
/// back to a plain-text body when the template itself cannot be rendered.
pub async fn error_response(state: &AppState, ctx: &RequestContext, err: &PresenterError) -> Response {
    let status = err.status_code();

    tracing::warn!(
        request_id = %ctx.request_id,
        domain = %ctx.domain,
        path = %ctx.original_path,
        content_id = ctx.content_id.as_deref().unwrap_or("-"),
        template = ctx.template_path.as_deref().unwrap_or("-"),
        status = status.as_u16(),
        error = %err,
        "Request failed"
    );

    let content = ContentEnvelope {
        title: Some(status.to_string()),
        body: err.to_string(),
        ..ContentEnvelope::default()
    };
    let input = RenderInput {
        ctx,
        content: &content,
        toc: None,
    };

    match state.renderer.render(template_for(status), &input).await {
        Ok(html) => (status, Html(html)).into_response(),
        Err(render_err) => {
            tracing::error!(
                request_id = %ctx.request_id,
                error = %render_err,
                "Error template unavailable, sending plain-text fallback"
            );
            (status, format!("{status}: {err}")).into_response()
        }
    }
}
