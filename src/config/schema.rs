//! Configuration schema definitions.
//!
//! Two families of types live here: the gateway's own TOML configuration
//! (`PresenterConfig` and its sections), and the raw per-domain JSON map
//! shapes loaded from the control directory before compilation into
//! routing tables.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root configuration for the presentation gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PresenterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Staging overlay settings.
    pub staging: StagingConfig,

    /// Content service backend.
    pub content_service: ContentServiceConfig,

    /// Control directory holding the per-domain JSON maps.
    pub control: ControlConfig,

    /// Template lookup settings.
    pub templates: TemplateConfig,

    /// Presented-URL defaults.
    pub presented: PresentedConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Staging overlay configuration.
///
/// When enabled, presented paths carry an embedded revision (and optionally
/// host) segment that is stripped on the way in and re-injected into every
/// outbound link.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StagingConfig {
    /// Enable staging mode.
    pub enabled: bool,

    /// Domain assumed when the first path segment is not a known domain.
    pub default_domain: String,
}

/// Content service backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentServiceConfig {
    /// Base URL of the content service API.
    pub url: String,

    /// Client timeout in seconds. Retries and backoff are the client's
    /// concern; the gateway never retries on its own.
    pub timeout_secs: u64,
}

impl Default for ContentServiceConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9000/".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Control directory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Directory containing content-map.json, rewrite-map.json and
    /// template-routes.json.
    pub path: PathBuf,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("control"),
        }
    }
}

/// Template lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Root directory for template files.
    pub root: PathBuf,

    /// Template used when no route table entry matches.
    pub default_template: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("templates"),
            default_template: "default.html".to_string(),
        }
    }
}

/// Presented-URL defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PresentedConfig {
    /// Protocol used when building absolute presented URLs and no
    /// X-Forwarded-Proto header is present.
    pub protocol: String,
}

impl Default for PresentedConfig {
    fn default() -> Self {
        Self {
            protocol: "https".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw per-domain JSON map shapes (control directory files).
// ---------------------------------------------------------------------------

/// One domain's entry in content-map.json.
///
/// `content` maps presented-path prefixes to content-ID bases; a `null` base
/// marks a prefix that intentionally serves an empty envelope. `proxy` maps
/// prefixes to upstream base URLs that bypass content routing entirely.
/// Declaration order is significant and preserved.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawDomainContent {
    pub content: IndexMap<String, Option<String>>,
    pub proxy: IndexMap<String, String>,
}

/// One domain's entry in rewrite-map.json.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawDomainRewrites {
    pub rewrites: Vec<RawRewriteRule>,
}

/// A single rewrite/redirect rule as declared in JSON.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRewriteRule {
    /// Regex matched against the request path.
    pub from: String,

    /// Replacement pattern; capture groups are available as $1, $2, ...
    pub to: String,

    /// True for an internal rewrite, false/absent for an HTTP redirect.
    #[serde(default)]
    pub rewrite: bool,

    /// Redirect status code.
    #[serde(default = "default_redirect_status")]
    pub status: u16,

    /// Optional protocol override for redirect targets.
    pub to_protocol: Option<String>,

    /// Optional hostname override for redirect targets.
    pub to_hostname: Option<String>,

    /// Optional port override for redirect targets.
    pub to_port: Option<u16>,
}

fn default_redirect_status() -> u16 {
    301
}

/// One domain's entry in template-routes.json.
///
/// Maps path regexes to template paths; the first declared match wins.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawDomainRoutes {
    pub routes: IndexMap<String, String>,
}
