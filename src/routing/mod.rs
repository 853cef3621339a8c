//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming path (per domain)
//!     → rewrite.rs (ordered regex rules, 0..n internal hops or a redirect)
//!     → staging.rs (strip revision/host segment, staging mode only)
//!     → resolver.rs (longest-prefix content-ID resolution)
//!
//! Outbound links:
//!     content ID
//!     → resolver.rs (reverse lookup to a presented path)
//!     → staging.rs (re-inject revision/host segment)
//!     → links.rs (absolute presented URL)
//! ```
//!
//! # Design Decisions
//! - Tables compiled at configuration load, immutable at runtime
//! - Content routing uses longest literal prefix; rewrite and template
//!   routing use first match in declaration order
//! - Declaration order is the documented tie-break everywhere iteration
//!   order matters

pub mod links;
pub mod resolver;
pub mod rewrite;
pub mod staging;
pub mod templates;

pub use resolver::Resolution;
pub use staging::StagingOverlay;
