//! HTTP layer.
//!
//! # Data Flow
//! ```text
//! Request
//!     → server.rs (axum router, middleware, request ID)
//!     → context.rs (explicit per-request context)
//!     → handlers/ (orchestrator + API endpoints)
//!     → error.rs (single error-rendering path, keyed by status)
//!     → Response
//! ```

pub mod context;
pub mod error;
pub(crate) mod handlers;
pub mod server;

pub use context::RequestContext;
pub use server::{AppState, HttpServer};
