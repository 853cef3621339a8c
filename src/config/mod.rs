//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! gateway config (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PresenterConfig (validated, immutable)
//!
//! control directory (per-domain JSON maps)
//!     → loader.rs (tolerant parse, regex compilation)
//!     → RoutingTables (compiled, immutable)
//!     → store.rs (ArcSwap, atomic whole-set replacement)
//!
//! On reload:
//!     watcher.rs detects change
//!     → loader.rs rebuilds tables (bad domains skipped, logged)
//!     → store.rs swaps the Arc
//!     → in-flight requests keep their snapshot
//! ```
//!
//! # Design Decisions
//! - Tables are immutable once published; reload builds a fresh set
//! - Readers never observe a partially updated table
//! - A malformed domain is absent from routing, never a process abort

pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;
pub mod watcher;

pub use schema::PresenterConfig;
pub use store::{DomainConfigStore, RoutingTables};
