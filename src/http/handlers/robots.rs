//! robots.txt handling.
//!
//! Staged previews must never be crawled, so staging mode answers with a
//! blanket disallow regardless of the routing tables. In normal mode the
//! path falls through to standard content routing.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request};
use axum::response::{IntoResponse, Response};

use crate::http::handlers::pages;
use crate::http::server::AppState;

const STAGING_ROBOTS: &str = "User-agent: *\nDisallow: /\n";

pub(crate) async fn robots(State(state): State<AppState>, request: Request<Body>) -> Response {
    if state.staging.enabled() {
        return (
            [(header::CONTENT_TYPE, "text/plain")],
            STAGING_ROBOTS,
        )
            .into_response();
    }
    pages::serve(State(state), request).await
}
