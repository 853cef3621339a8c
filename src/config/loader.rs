//! Configuration loading from disk.
//!
//! Two loaders: the gateway's own TOML configuration, and the per-domain
//! JSON maps from the control directory. The TOML loader is strict; the
//! domain-map loader is tolerant: a domain whose configuration cannot be
//! parsed or compiled is treated as absent from routing and logged, never
//! fatal to the process.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use thiserror::Error;
use url::Url;

use crate::config::schema::{
    PresenterConfig, RawDomainContent, RawDomainRewrites, RawDomainRoutes,
};
use crate::config::store::{ContentPrefix, DomainTables, ProxyRoute, RoutingTables};
use crate::config::validation::{validate_config, ValidationError};
use crate::routing::rewrite::RewriteRule;
use crate::routing::templates::TemplateRoute;

/// Error type for gateway configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate the gateway configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<PresenterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: PresenterConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load and compile the per-domain routing tables from the control
/// directory.
///
/// Reads `content-map.json`, `rewrite-map.json` and `template-routes.json`.
/// A missing or unparsable file contributes nothing; a malformed domain entry
/// is skipped. Both conditions are logged. Regexes are compiled here, once
/// per load, never per request.
pub fn load_routing_tables(control_dir: &Path) -> RoutingTables {
    let content_map: IndexMap<String, RawDomainContent> =
        load_domain_file(&control_dir.join("content-map.json"));
    let rewrite_map: IndexMap<String, RawDomainRewrites> =
        load_domain_file(&control_dir.join("rewrite-map.json"));
    let route_map: IndexMap<String, RawDomainRoutes> =
        load_domain_file(&control_dir.join("template-routes.json"));

    let mut tables = RoutingTables::default();

    for (domain, raw) in content_map {
        let entry = tables.domains.entry(domain.clone()).or_default();
        entry.content = raw
            .content
            .into_iter()
            .map(|(prefix, base)| ContentPrefix { prefix, base })
            .collect();
        entry.proxies = raw
            .proxy
            .into_iter()
            .filter_map(|(prefix, upstream)| match Url::parse(&upstream) {
                Ok(upstream) => Some(ProxyRoute { prefix, upstream }),
                Err(e) => {
                    tracing::warn!(
                        domain = %domain,
                        prefix = %prefix,
                        error = %e,
                        "Skipping proxy route with invalid upstream URL"
                    );
                    None
                }
            })
            .collect();
    }

    for (domain, raw) in rewrite_map {
        let mut rules = Vec::with_capacity(raw.rewrites.len());
        let mut valid = true;
        for rule in &raw.rewrites {
            match RewriteRule::compile(rule) {
                Ok(compiled) => rules.push(compiled),
                Err(e) => {
                    tracing::warn!(
                        domain = %domain,
                        pattern = %rule.from,
                        error = %e,
                        "Dropping domain rewrites: invalid pattern"
                    );
                    valid = false;
                    break;
                }
            }
        }
        if valid {
            tables.domains.entry(domain).or_default().rewrites = rules;
        }
    }

    for (domain, raw) in route_map {
        let mut routes = Vec::with_capacity(raw.routes.len());
        let mut valid = true;
        for (pattern, template) in &raw.routes {
            match TemplateRoute::compile(pattern, template) {
                Ok(compiled) => routes.push(compiled),
                Err(e) => {
                    tracing::warn!(
                        domain = %domain,
                        pattern = %pattern,
                        error = %e,
                        "Dropping domain template routes: invalid pattern"
                    );
                    valid = false;
                    break;
                }
            }
        }
        if valid {
            tables.domains.entry(domain).or_default().templates = routes;
        }
    }

    tracing::info!(
        domains = tables.domain_count(),
        control_dir = %control_dir.display(),
        "Routing tables loaded"
    );

    tables
}

/// Parse one per-domain JSON file tolerantly.
///
/// The file itself failing to read or parse yields an empty map; a domain
/// entry failing to deserialize is skipped. Both are logged so a broken push
/// to the control repository is visible without taking the gateway down.
fn load_domain_file<T: serde::de::DeserializeOwned>(path: &Path) -> IndexMap<String, T> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Domain map file unreadable");
            return IndexMap::new();
        }
    };

    let raw: IndexMap<String, serde_json::Value> = match serde_json::from_str(&text) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Domain map file unparsable");
            return IndexMap::new();
        }
    };

    let mut parsed = IndexMap::with_capacity(raw.len());
    for (domain, value) in raw {
        match serde_json::from_value(value) {
            Ok(entry) => {
                parsed.insert(domain, entry);
            }
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    domain = %domain,
                    error = %e,
                    "Skipping malformed domain entry"
                );
            }
        }
    }
    parsed
}
