//! Routing table storage with atomic replacement.
//!
//! # Responsibilities
//! - Hold the compiled per-domain tables behind a single swap point
//! - Replace the entire table set in one step on reload
//! - Hand out immutable snapshots to request handlers
//!
//! # Design Decisions
//! - `ArcSwap` gives readers a consistent snapshot with no locking; a request
//!   in flight observes either the complete old table or the complete new
//!   table, never a mix
//! - Tables are immutable once published; reload builds a fresh set

use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use url::Url;

use crate::routing::rewrite::RewriteRule;
use crate::routing::templates::TemplateRoute;

/// A single presented-path prefix mapping.
#[derive(Debug, Clone)]
pub struct ContentPrefix {
    /// Presented-path prefix, matched character-for-character.
    pub prefix: String,

    /// Content-ID base, or `None` for a prefix that intentionally serves an
    /// empty envelope.
    pub base: Option<String>,
}

/// A passthrough proxy route.
#[derive(Debug, Clone)]
pub struct ProxyRoute {
    /// Presented-path prefix.
    pub prefix: String,

    /// Upstream base URL.
    pub upstream: Url,
}

/// Compiled tables for one domain.
#[derive(Debug, Clone, Default)]
pub struct DomainTables {
    /// Content prefix map in declaration order.
    pub content: Vec<ContentPrefix>,

    /// Rewrite rules in declaration order; first match wins.
    pub rewrites: Vec<RewriteRule>,

    /// Template routes in declaration order; first match wins.
    pub templates: Vec<TemplateRoute>,

    /// Passthrough proxy routes.
    pub proxies: Vec<ProxyRoute>,
}

impl DomainTables {
    /// Longest-prefix proxy lookup. Returns the matching route and the path
    /// remainder after the prefix.
    pub fn proxy_for<'a, 'p>(&'a self, path: &'p str) -> Option<(&'a ProxyRoute, &'p str)> {
        let mut winner: Option<&ProxyRoute> = None;
        for route in &self.proxies {
            if path.starts_with(&route.prefix) {
                match winner {
                    Some(w) if w.prefix.len() >= route.prefix.len() => {}
                    _ => winner = Some(route),
                }
            }
        }
        winner.map(|route| (route, &path[route.prefix.len()..]))
    }
}

/// The complete routing table set, one entry per configured domain.
///
/// Domain lookup is an exact, case-sensitive host match. Declaration order of
/// domains and of the entries inside each table is preserved and serves as the
/// documented tie-break for reverse lookups and first-match scans.
#[derive(Debug, Clone, Default)]
pub struct RoutingTables {
    pub domains: IndexMap<String, DomainTables>,
}

impl RoutingTables {
    pub fn is_known_domain(&self, domain: &str) -> bool {
        self.domains.contains_key(domain)
    }

    pub fn domain(&self, domain: &str) -> Option<&DomainTables> {
        self.domains.get(domain)
    }

    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }
}

/// Shared store for the live routing tables.
///
/// The only cross-request shared mutable state in the gateway. Replacement is
/// a single pointer swap.
pub struct DomainConfigStore {
    tables: ArcSwap<RoutingTables>,
}

impl DomainConfigStore {
    pub fn new(tables: RoutingTables) -> Self {
        Self {
            tables: ArcSwap::from_pointee(tables),
        }
    }

    /// Replace the entire table set in one step.
    pub fn replace(&self, tables: RoutingTables) {
        self.tables.store(Arc::new(tables));
    }

    /// Snapshot of the live tables. Valid for the rest of the request even if
    /// a reload lands mid-flight.
    pub fn load(&self) -> Arc<RoutingTables> {
        self.tables.load_full()
    }

    pub fn is_known_domain(&self, domain: &str) -> bool {
        self.tables.load().is_known_domain(domain)
    }
}

impl Default for DomainConfigStore {
    fn default() -> Self {
        Self::new(RoutingTables::default())
    }
}
