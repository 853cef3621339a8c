//! Documentation presentation gateway.
//!
//! Maps presented URLs on multiple public domains to content IDs in a
//! backing content service, rewrites legacy paths, fetches content and
//! navigation concurrently, runs the body through a filter pipeline and
//! renders the result with file-based templates. A staging mode overlays
//! revision IDs and host overrides on every path without touching the
//! routing tables.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌────────────────────────────────────────────┐
//!                         │              PRESENTATION GATEWAY           │
//!                         │                                             │
//!   Client Request        │  ┌────────┐   ┌─────────┐   ┌──────────┐   │
//!   ──────────────────────┼─▶│  http  │──▶│ routing │──▶│ backend  │───┼──▶ Content
//!                         │  │ server │   │ tables  │   │  client  │   │    Service
//!                         │  └────────┘   └─────────┘   └──────────┘   │
//!                         │       │                          │         │
//!                         │       ▼                          ▼         │
//!   Client Response       │  ┌────────┐   ┌─────────┐   ┌──────────┐   │
//!   ◀─────────────────────┼──│ render │◀──│ content │◀──│ envelope │   │
//!                         │  │        │   │ filters │   │          │   │
//!                         │  └────────┘   └─────────┘   └──────────┘   │
//!                         │                                             │
//!                         │  ┌──────────────────────────────────────┐  │
//!                         │  │          Cross-Cutting Concerns       │  │
//!                         │  │  config (hot reload)  observability   │  │
//!                         │  │  lifecycle (shutdown)                 │  │
//!                         │  └──────────────────────────────────────┘  │
//!                         └────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod backend;
pub mod config;
pub mod content;
pub mod http;
pub mod render;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::{DomainConfigStore, PresenterConfig, RoutingTables};
pub use http::{HttpServer, RequestContext};
