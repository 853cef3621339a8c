//! Request handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::http::server::AppState;

pub(crate) mod pages;
pub(crate) mod proxy;
pub(crate) mod robots;
pub(crate) mod search;
pub(crate) mod whereis;

#[derive(Serialize)]
pub(crate) struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub domains: usize,
    pub staging: bool,
}

/// Handle GET /_api/status.
pub(crate) async fn status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        domains: state.store.load().domain_count(),
        staging: state.staging.enabled(),
    })
}
