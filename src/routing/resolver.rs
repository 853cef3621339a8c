//! Presented-path ⇄ content-ID resolution.
//!
//! # Responsibilities
//! - Forward lookup: longest registered prefix that is a literal prefix of
//!   the path, per domain
//! - Reverse lookup: content ID back to a presented location
//! - Whereis: every presented location a content ID is reachable from
//!
//! # Design Decisions
//! - Results are a tagged enum, never sentinel identities: callers
//!   pattern-match on `Resolved` / `EmptyEnvelope` / `Unmapped`
//! - A prefix mapped to the empty marker matches only the exact prefix
//!   (remainder empty or `/`); deeper sub-paths are unmapped, not empty
//! - Equal-length prefix ties and reverse-lookup candidates resolve in
//!   declaration order of the content map

use serde::Serialize;

use crate::config::store::{ContentPrefix, RoutingTables};

/// Outcome of forward content-ID resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The path maps to this content ID.
    Resolved(String),

    /// The matched prefix explicitly maps to "no content"; distinct from
    /// "not found".
    EmptyEnvelope,

    /// No registered prefix matches the path.
    Unmapped,
}

/// One entry in a whereis response: a presented location for a content ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMapping {
    pub domain: String,
    pub path: String,
    #[serde(rename = "baseContentID")]
    pub base_content_id: String,
    pub base_path: String,
}

impl RoutingTables {
    /// Resolve a presented path on a domain to a content ID.
    ///
    /// Scans every prefix registered for the domain and keeps the longest
    /// that is a literal prefix of `path`; equal lengths keep the first
    /// declared. Unknown domains are unmapped for all paths.
    pub fn content_id(&self, domain: &str, path: &str) -> Resolution {
        let Some(tables) = self.domain(domain) else {
            return Resolution::Unmapped;
        };

        let mut winner: Option<&ContentPrefix> = None;
        for entry in &tables.content {
            if !path.starts_with(&entry.prefix) {
                continue;
            }
            match winner {
                Some(w) if w.prefix.len() >= entry.prefix.len() => {}
                _ => winner = Some(entry),
            }
        }

        let Some(entry) = winner else {
            return Resolution::Unmapped;
        };
        let remainder = &path[entry.prefix.len()..];

        match &entry.base {
            None => {
                if remainder.is_empty() || remainder == "/" {
                    Resolution::EmptyEnvelope
                } else {
                    Resolution::Unmapped
                }
            }
            Some(base) => Resolution::Resolved(join_content_id(base, remainder)),
        }
    }

    /// Content-ID base of the prefix that wins for `path`, if any.
    ///
    /// Used to address per-section companion documents such as the table of
    /// contents.
    pub fn base_for(&self, domain: &str, path: &str) -> Option<String> {
        let tables = self.domain(domain)?;
        let mut winner: Option<&ContentPrefix> = None;
        for entry in &tables.content {
            if !path.starts_with(&entry.prefix) {
                continue;
            }
            match winner {
                Some(w) if w.prefix.len() >= entry.prefix.len() => {}
                _ => winner = Some(entry),
            }
        }
        winner
            .and_then(|e| e.base.as_deref())
            .map(|base| base.trim_end_matches('/').to_string())
    }

    /// Reverse lookup: the domain and presented path serving `content_id`.
    ///
    /// Searches `domain` first, then (when `cross_domain` is set) every other
    /// known domain in declaration order. Within a domain, the first declared
    /// prefix whose base is a literal prefix of the content ID wins.
    pub fn presented_location(
        &self,
        domain: &str,
        content_id: &str,
        cross_domain: bool,
    ) -> Option<(String, String)> {
        if let Some(tables) = self.domain(domain) {
            if let Some(path) = location_in(&tables.content, content_id) {
                return Some((domain.to_string(), path));
            }
        }

        if cross_domain {
            for (other, tables) in &self.domains {
                if other == domain {
                    continue;
                }
                if let Some(path) = location_in(&tables.content, content_id) {
                    return Some((other.clone(), path));
                }
            }
        }

        None
    }

    /// Absolute presented URL for a content ID.
    pub fn presented_url(
        &self,
        domain: &str,
        content_id: &str,
        cross_domain: bool,
        protocol: &str,
    ) -> Option<String> {
        self.presented_location(domain, content_id, cross_domain)
            .map(|(dom, path)| format!("{protocol}://{dom}{path}"))
    }

    /// Every presented location that reaches `content_id`, across all
    /// domains and prefixes, in declaration order.
    pub fn mappings_for(&self, content_id: &str) -> Vec<ContentMapping> {
        let mut mappings = Vec::new();
        for (domain, tables) in &self.domains {
            for entry in &tables.content {
                let Some(base) = &entry.base else { continue };
                let Some(suffix) = strip_base(content_id, base) else {
                    continue;
                };
                mappings.push(ContentMapping {
                    domain: domain.clone(),
                    path: join_presented_path(&entry.prefix, suffix),
                    base_content_id: base.clone(),
                    base_path: entry.prefix.clone(),
                });
            }
        }
        mappings
    }
}

fn location_in(content: &[ContentPrefix], content_id: &str) -> Option<String> {
    for entry in content {
        let Some(base) = &entry.base else { continue };
        if let Some(suffix) = strip_base(content_id, base) {
            return Some(join_presented_path(&entry.prefix, suffix));
        }
    }
    None
}

/// The remainder of `content_id` after a literal base prefix, or `None` when
/// the base is not a prefix.
fn strip_base<'a>(content_id: &'a str, base: &str) -> Option<&'a str> {
    content_id.strip_prefix(base.trim_end_matches('/'))
}

/// Join a content-ID base with a path remainder, trimming duplicate and
/// trailing slashes.
fn join_content_id(base: &str, remainder: &str) -> String {
    let mut id = base.trim_end_matches('/').to_string();
    for segment in remainder.split('/').filter(|s| !s.is_empty()) {
        id.push('/');
        id.push_str(segment);
    }
    id
}

/// Join a presented-path prefix with a content-ID suffix.
fn join_presented_path(prefix: &str, suffix: &str) -> String {
    let suffix = suffix.trim_start_matches('/');
    if suffix.is_empty() {
        return prefix.to_string();
    }
    format!("{}/{}", prefix.trim_end_matches('/'), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store::DomainTables;

    fn tables(entries: &[(&str, Option<&str>)]) -> RoutingTables {
        let mut t = RoutingTables::default();
        t.domains.insert(
            "docs.example.com".to_string(),
            DomainTables {
                content: entries
                    .iter()
                    .map(|(prefix, base)| ContentPrefix {
                        prefix: (*prefix).to_string(),
                        base: base.map(str::to_string),
                    })
                    .collect(),
                ..DomainTables::default()
            },
        );
        t
    }

    #[test]
    fn longest_prefix_wins() {
        let t = tables(&[("/one/two/", Some("two")), ("/one/", Some("one"))]);
        assert_eq!(
            t.content_id("docs.example.com", "/one/two/thingy"),
            Resolution::Resolved("two/thingy".to_string())
        );
        assert_eq!(
            t.content_id("docs.example.com", "/one/other"),
            Resolution::Resolved("one/other".to_string())
        );
    }

    #[test]
    fn longest_prefix_wins_regardless_of_declaration_order() {
        let t = tables(&[("/one/", Some("one")), ("/one/two/", Some("two"))]);
        assert_eq!(
            t.content_id("docs.example.com", "/one/two/thingy"),
            Resolution::Resolved("two/thingy".to_string())
        );
    }

    #[test]
    fn prefix_without_trailing_slash_trims_slashes_in_the_join() {
        let t = tables(&[("/without-slash", Some("noslash"))]);
        assert_eq!(
            t.content_id("docs.example.com", "/without-slash/blah/boo/bar/"),
            Resolution::Resolved("noslash/blah/boo/bar".to_string())
        );
    }

    #[test]
    fn empty_marker_matches_only_the_exact_prefix() {
        let t = tables(&[("/empty/", None)]);
        assert_eq!(
            t.content_id("docs.example.com", "/empty/"),
            Resolution::EmptyEnvelope
        );
        assert_eq!(
            t.content_id("docs.example.com", "/empty/anythingelse"),
            Resolution::Unmapped
        );
    }

    #[test]
    fn unknown_paths_and_domains_are_unmapped() {
        let t = tables(&[("/one/", Some("one"))]);
        assert_eq!(
            t.content_id("docs.example.com", "/elsewhere"),
            Resolution::Unmapped
        );
        assert_eq!(t.content_id("other.example.com", "/one/"), Resolution::Unmapped);
        // Domain match is case-sensitive and exact.
        assert_eq!(t.content_id("DOCS.example.com", "/one/"), Resolution::Unmapped);
    }

    #[test]
    fn prefix_matching_is_literal_not_substring() {
        let t = tables(&[("/one/", Some("one"))]);
        assert_eq!(t.content_id("docs.example.com", "/x/one/"), Resolution::Unmapped);
    }

    #[test]
    fn round_trips_through_presented_url() {
        let t = tables(&[("/one/two/", Some("two")), ("/one/", Some("one"))]);
        let Resolution::Resolved(id) = t.content_id("docs.example.com", "/one/two/thingy")
        else {
            panic!("expected a resolved content ID");
        };
        assert_eq!(
            t.presented_url("docs.example.com", &id, false, "https"),
            Some("https://docs.example.com/one/two/thingy".to_string())
        );
    }

    #[test]
    fn reverse_lookup_takes_first_declared_base() {
        let t = tables(&[("/a/", Some("shared/x")), ("/b/", Some("shared"))]);
        // "shared/x/doc" matches both bases; the first declared entry wins.
        assert_eq!(
            t.presented_location("docs.example.com", "shared/x/doc", false),
            Some(("docs.example.com".to_string(), "/a/doc".to_string()))
        );
    }

    #[test]
    fn reverse_lookup_crosses_domains_only_when_allowed() {
        let mut t = tables(&[("/one/", Some("one"))]);
        t.domains.insert(
            "other.example.com".to_string(),
            DomainTables {
                content: vec![ContentPrefix {
                    prefix: "/o/".to_string(),
                    base: Some("elsewhere".to_string()),
                }],
                ..DomainTables::default()
            },
        );

        assert_eq!(
            t.presented_location("docs.example.com", "elsewhere/doc", false),
            None
        );
        assert_eq!(
            t.presented_location("docs.example.com", "elsewhere/doc", true),
            Some(("other.example.com".to_string(), "/o/doc".to_string()))
        );
    }

    #[test]
    fn whereis_reports_every_reachable_location() {
        let mut t = tables(&[("/one/", Some("shared"))]);
        t.domains.insert(
            "other.example.com".to_string(),
            DomainTables {
                content: vec![ContentPrefix {
                    prefix: "/mirror/".to_string(),
                    base: Some("shared".to_string()),
                }],
                ..DomainTables::default()
            },
        );

        let mappings = t.mappings_for("shared/doc");
        assert_eq!(
            mappings,
            vec![
                ContentMapping {
                    domain: "docs.example.com".to_string(),
                    path: "/one/doc".to_string(),
                    base_content_id: "shared".to_string(),
                    base_path: "/one/".to_string(),
                },
                ContentMapping {
                    domain: "other.example.com".to_string(),
                    path: "/mirror/doc".to_string(),
                    base_content_id: "shared".to_string(),
                    base_path: "/mirror/".to_string(),
                },
            ]
        );

        assert!(t.mappings_for("unrelated/doc").is_empty());
    }

    #[test]
    fn base_for_follows_the_winning_prefix() {
        let t = tables(&[("/one/two/", Some("two/")), ("/one/", Some("one"))]);
        assert_eq!(
            t.base_for("docs.example.com", "/one/two/thingy"),
            Some("two".to_string())
        );
        assert_eq!(t.base_for("docs.example.com", "/nope"), None);
    }
}
