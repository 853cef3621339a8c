//! Backend service clients.
//!
//! The gateway talks to two collaborators: the content service (envelopes,
//! asset manifests, search) and whatever upstreams the passthrough proxy
//! table points at. Retries, backoff and timeouts are the HTTP client's
//! responsibility; the gateway classifies failures and never retries.

pub mod content;

pub use content::{ContentClient, SearchResponse, SearchResult, UpstreamError};
