//! The search API: forwards a query to the search backend and augments each
//! result with its presented URL. Results that resolve to no presented
//! location are dropped.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::http::context::{RequestContext, StageTimings};
use crate::http::server::AppState;
use crate::routing::links::presented_url_for;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchParams {
    q: String,
    #[serde(default = "default_page_number")]
    page_number: u32,
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_page_number() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

#[derive(Serialize)]
pub(crate) struct SearchApiResponse {
    total: u64,
    pages: u64,
    results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub(crate) struct SearchHit {
    #[serde(rename = "contentID")]
    content_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    excerpt: Option<String>,
    url: String,
}

/// Handle GET /_api/search.
pub(crate) async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
    headers: HeaderMap,
) -> Response {
    let per_page = params.per_page.max(1);

    let backend = match state
        .content
        .search(&params.q, params.page_number, per_page)
        .await
    {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(q = %params.q, error = %err, "Search backend failed");
            let status = err
                .upstream_status()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::SERVICE_UNAVAILABLE);
            return (status, Json(json!({ "message": err.to_string() }))).into_response();
        }
    };

    let tables = state.store.load();
    let ctx = api_context(&state, &headers);

    let results: Vec<SearchHit> = backend
        .results
        .into_iter()
        .filter_map(|result| {
            presented_url_for(&tables, &state.staging, &ctx, &result.content_id, true).map(|url| {
                SearchHit {
                    content_id: result.content_id,
                    title: result.title,
                    excerpt: result.excerpt,
                    url,
                }
            })
        })
        .collect();

    let pages = backend.total.div_ceil(u64::from(per_page));

    Json(SearchApiResponse {
        total: backend.total,
        pages,
        results,
    })
    .into_response()
}

/// A request context for API handlers, which carry no staging revision.
fn api_context(state: &AppState, headers: &HeaderMap) -> RequestContext {
    let host = headers
        .get("host")
        .and_then(|h| h.to_str().ok())
        .map(|h| h.split(':').next().unwrap_or(h).to_string())
        .unwrap_or_default();

    let protocol = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| state.config.presented.protocol.clone());

    let domain = if state.staging.enabled() {
        state.staging.default_domain().to_string()
    } else {
        host.clone()
    };

    RequestContext {
        request_id: headers
            .get("x-request-id")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string(),
        host,
        protocol,
        original_path: "/_api/search".to_string(),
        domain,
        revision_id: None,
        staging_host: None,
        content_id: None,
        template_path: None,
        timings: StageTimings::default(),
    }
}
