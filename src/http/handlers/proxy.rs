//! Passthrough proxying for prefixes that bypass content routing.
//!
//! Requests are streamed to the configured upstream with the prefix
//! remainder appended to the upstream base path. No retries here: an
//! upstream failure is surfaced as 502.

use axum::body::Body;
use axum::http::{header, Request, Uri};
use axum::response::Response;

use crate::config::store::ProxyRoute;
use crate::http::context::RequestContext;
use crate::http::error::PresenterError;
use crate::http::server::AppState;

pub(crate) async fn forward(
    state: &AppState,
    ctx: &RequestContext,
    route: &ProxyRoute,
    remainder: &str,
    request: Request<Body>,
) -> Result<Response, PresenterError> {
    let (parts, body) = request.into_parts();

    let mut target = route.upstream.clone();
    let remainder = remainder.trim_start_matches('/');
    if !remainder.is_empty() {
        let joined = format!("{}/{}", target.path().trim_end_matches('/'), remainder);
        target.set_path(&joined);
    }
    target.set_query(parts.uri.query());

    let uri: Uri = target
        .as_str()
        .parse()
        .map_err(|e| PresenterError::Proxy(format!("invalid upstream URI: {e}")))?;

    tracing::debug!(
        request_id = %ctx.request_id,
        upstream = %uri,
        "Proxying passthrough request"
    );

    let mut builder = Request::builder().method(parts.method.clone()).uri(uri);
    if let Some(headers) = builder.headers_mut() {
        for (name, value) in parts.headers.iter() {
            if name != header::HOST {
                headers.insert(name.clone(), value.clone());
            }
        }
    }
    let upstream_request = builder
        .body(body)
        .map_err(|e| PresenterError::Proxy(format!("request build: {e}")))?;

    let response = state
        .proxy_client
        .request(upstream_request)
        .await
        .map_err(|e| PresenterError::Proxy(e.to_string()))?;

    let (response_parts, response_body) = response.into_parts();
    Ok(Response::from_parts(response_parts, Body::new(response_body)))
}
