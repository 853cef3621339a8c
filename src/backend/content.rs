//! Content service client.
//!
//! # Responsibilities
//! - Fetch content envelopes, the asset manifest and search results
//! - Classify failures: infrastructure (connect/timeout/DNS) versus an
//!   upstream status passthrough
//!
//! # Design Decisions
//! - Upstream 4xx/5xx bodies are parsed as JSON `{ "message": ... }` when
//!   possible, otherwise treated as plain text
//! - No retry logic here or anywhere in the gateway

use std::collections::HashMap;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::content::envelope::ContentEnvelope;

/// Characters escaped when a content ID is embedded as one path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'#')
    .add(b'?')
    .add(b'%')
    .add(b'/');

/// A failure talking to the content service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The service could not be reached at all: connection refused, timeout,
    /// DNS failure. Surfaces as 503.
    #[error("content service unreachable: {0}")]
    Infrastructure(#[source] reqwest::Error),

    /// The service answered with a non-success status. Surfaces with the
    /// same status code.
    #[error("content service returned {status}: {message}")]
    Status { status: u16, message: String },
}

impl UpstreamError {
    /// The upstream status code, when this is a status passthrough.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            UpstreamError::Infrastructure(_) => None,
        }
    }
}

/// JSON error body shape used by the content service.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Search response from the backend, before URL augmentation.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub total: u64,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// One raw search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "contentID")]
    pub content_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
}

/// HTTP client for the content service API.
#[derive(Debug, Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    base: Url,
}

impl ContentClient {
    /// Build a client for the service at `base` with the given timeout.
    pub fn new(mut base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    /// Fetch the envelope for a content ID.
    pub async fn envelope(&self, content_id: &str) -> Result<ContentEnvelope, UpstreamError> {
        let encoded = utf8_percent_encode(content_id, SEGMENT);
        let url = self.join(&format!("content/{encoded}"))?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(UpstreamError::Infrastructure)?;
        Self::parse(response).await
    }

    /// Fetch the asset manifest.
    pub async fn assets(&self) -> Result<HashMap<String, String>, UpstreamError> {
        let url = self.join("assets")?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(UpstreamError::Infrastructure)?;
        Self::parse(response).await
    }

    /// Forward a search query to the backend.
    pub async fn search(
        &self,
        q: &str,
        page_number: u32,
        per_page: u32,
    ) -> Result<SearchResponse, UpstreamError> {
        let url = self.join("search")?;
        let response = self
            .http
            .get(url)
            .query(&[
                ("q", q),
                ("pageNumber", &page_number.to_string()),
                ("perPage", &per_page.to_string()),
            ])
            .send()
            .await
            .map_err(UpstreamError::Infrastructure)?;
        Self::parse(response).await
    }

    fn join(&self, path: &str) -> Result<Url, UpstreamError> {
        self.base.join(path).map_err(|e| UpstreamError::Status {
            status: 500,
            message: format!("invalid content service path: {e}"),
        })
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, UpstreamError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or(text);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }
        response.json().await.map_err(UpstreamError::Infrastructure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_ids_are_encoded_as_a_single_segment() {
        let encoded = utf8_percent_encode("https://github.com/org/repo", SEGMENT).to_string();
        assert_eq!(encoded, "https:%2F%2Fgithub.com%2Forg%2Frepo");
    }

    #[test]
    fn base_url_always_gains_a_trailing_slash() {
        let client = ContentClient::new(
            Url::parse("http://content.internal/api").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.join("assets").unwrap().as_str(),
            "http://content.internal/api/assets"
        );
    }
}
