//! Content envelope wire types.
//!
//! The envelope is the document payload fetched from the content service:
//! body, asset references, optional sibling-link stubs and optional globals
//! such as a table-of-contents fragment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A fetched document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentEnvelope {
    /// Document title.
    pub title: Option<String>,

    /// Rendered document body (HTML fragment).
    pub body: String,

    /// Named asset references for this document.
    pub assets: HashMap<String, String>,

    /// Link stub to the next sibling document.
    pub next: Option<LinkStub>,

    /// Link stub to the previous sibling document.
    pub previous: Option<LinkStub>,

    /// Site-wide fragments, e.g. a table-of-contents body.
    pub globals: Option<serde_json::Value>,
}

impl ContentEnvelope {
    /// The envelope served for prefixes that intentionally map to no
    /// content. Distinct from a missing document.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A sibling-link stub: a content ID plus, once resolved, a presented URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkStub {
    #[serde(rename = "contentID")]
    pub content_id: String,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub title: Option<String>,
}
