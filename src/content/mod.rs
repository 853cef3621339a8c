//! Content handling subsystem.
//!
//! # Data Flow
//! ```text
//! Content service JSON
//!     → envelope.rs (ContentEnvelope wire types)
//!     → pipeline.rs (ordered transformation stages)
//!     → filters.rs (directive + sibling-link built-ins)
//!     → template renderer
//! ```

pub mod envelope;
pub mod filters;
pub mod pipeline;

pub use envelope::{ContentEnvelope, LinkStub};
pub use pipeline::{ContentFilter, FilterContext, FilterError, FilterPipeline};
