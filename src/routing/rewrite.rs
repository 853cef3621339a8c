//! Regex rewrite and redirect rules.
//!
//! # Responsibilities
//! - Compile every rule's `from` pattern once at configuration load
//! - Apply the first matching rule to a request path
//! - Distinguish internal rewrites (processing continues) from redirects
//!
//! # Design Decisions
//! - First match wins, in declaration order; not longest or most specific
//! - Patterns are compiled `regex::Regex` values; they carry no scan
//!   position between calls, so a rule can be evaluated on every request
//!   without match-position drift

use regex::Regex;

use crate::config::schema::RawRewriteRule;
use crate::config::store::DomainTables;

/// A compiled rewrite rule.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pub from: Regex,
    pub to: String,
    pub rewrite: bool,
    pub status: u16,
    pub to_protocol: Option<String>,
    pub to_hostname: Option<String>,
    pub to_port: Option<u16>,
}

impl RewriteRule {
    /// Compile a raw rule. Fails if `from` is not a valid regex.
    pub fn compile(raw: &RawRewriteRule) -> Result<Self, regex::Error> {
        Ok(Self {
            from: Regex::new(&raw.from)?,
            to: raw.to.clone(),
            rewrite: raw.rewrite,
            status: raw.status,
            to_protocol: raw.to_protocol.clone(),
            to_hostname: raw.to_hostname.clone(),
            to_port: raw.to_port,
        })
    }

}

/// The outcome of applying a rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteMatch {
    /// Processing continues with the new path; no round trip. A hostname
    /// override re-routes onto that domain's tables; a protocol override
    /// changes the protocol used for outbound links. Port overrides carry no
    /// meaning for internal routing and are ignored.
    Internal {
        path: String,
        protocol: Option<String>,
        domain: Option<String>,
    },

    /// An HTTP redirect response with the given status and target.
    Redirect { status: u16, target: String },
}

impl DomainTables {
    /// Apply the domain's rewrite rules to `path`.
    ///
    /// Rules are scanned in declaration order and the first whose pattern
    /// matches wins. `protocol` and `host` describe the current request and
    /// are used for redirect targets when a rule does not override them.
    pub fn rewrite_for(&self, path: &str, protocol: &str, host: &str) -> Option<RewriteMatch> {
        for rule in &self.rewrites {
            if !rule.from.is_match(path) {
                continue;
            }

            let new_path = rule.from.replace(path, rule.to.as_str()).into_owned();

            if rule.rewrite {
                return Some(RewriteMatch::Internal {
                    path: new_path,
                    protocol: rule.to_protocol.clone(),
                    domain: rule.to_hostname.clone(),
                });
            }

            let target_protocol = rule.to_protocol.as_deref().unwrap_or(protocol);
            let target_host = rule.to_hostname.as_deref().unwrap_or(host);
            let target = match rule.to_port {
                Some(port) => format!("{target_protocol}://{target_host}:{port}{new_path}"),
                None => format!("{target_protocol}://{target_host}{new_path}"),
            };

            return Some(RewriteMatch::Redirect {
                status: rule.status,
                target,
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(from: &str, to: &str, rewrite: bool) -> RewriteRule {
        RewriteRule::compile(&RawRewriteRule {
            from: from.to_string(),
            to: to.to_string(),
            rewrite,
            status: 301,
            to_protocol: None,
            to_hostname: None,
            to_port: None,
        })
        .unwrap()
    }

    fn tables(rewrites: Vec<RewriteRule>) -> DomainTables {
        DomainTables {
            rewrites,
            ..DomainTables::default()
        }
    }

    #[test]
    fn first_match_wins_in_declaration_order() {
        let t = tables(vec![
            rule("^/docs/(.*)$", "/manual/$1", true),
            rule("^/docs/old/(.*)$", "/archive/$1", true),
        ]);

        // The broader rule is declared first, so the more specific one never
        // fires even though it also matches.
        assert_eq!(
            t.rewrite_for("/docs/old/intro", "https", "docs.example.com"),
            Some(RewriteMatch::Internal {
                path: "/manual/old/intro".to_string(),
                protocol: None,
                domain: None,
            })
        );
    }

    #[test]
    fn redirect_carries_status_and_absolute_target() {
        let t = tables(vec![rule("^/legacy/(.*)$", "/pages/$1", false)]);

        assert_eq!(
            t.rewrite_for("/legacy/setup", "https", "docs.example.com"),
            Some(RewriteMatch::Redirect {
                status: 301,
                target: "https://docs.example.com/pages/setup".to_string()
            })
        );
    }

    #[test]
    fn overrides_build_a_cross_host_redirect() {
        let mut r = rule("^/blog/(.*)$", "/$1", false);
        r.to_hostname = Some("blog.example.com".to_string());
        r.to_protocol = Some("http".to_string());
        r.to_port = Some(8080);
        let t = tables(vec![r]);

        assert_eq!(
            t.rewrite_for("/blog/hello", "https", "docs.example.com"),
            Some(RewriteMatch::Redirect {
                status: 301,
                target: "http://blog.example.com:8080/hello".to_string()
            })
        );
    }

    #[test]
    fn internal_rewrite_keeps_its_overrides_internal() {
        let mut r = rule("^/blog/(.*)$", "/posts/$1", true);
        r.to_hostname = Some("blog.example.com".to_string());
        r.to_protocol = Some("http".to_string());
        let t = tables(vec![r]);

        // The rewrite flag decides; overrides re-route, they never demote an
        // internal rewrite to a round trip.
        assert_eq!(
            t.rewrite_for("/blog/hello", "https", "docs.example.com"),
            Some(RewriteMatch::Internal {
                path: "/posts/hello".to_string(),
                protocol: Some("http".to_string()),
                domain: Some("blog.example.com".to_string()),
            })
        );
    }

    #[test]
    fn no_rule_matches() {
        let t = tables(vec![rule("^/docs/(.*)$", "/manual/$1", true)]);
        assert_eq!(t.rewrite_for("/other", "https", "h"), None);
    }

    #[test]
    fn repeated_application_has_no_state_drift() {
        let t = tables(vec![rule("^/a/(.*)$", "/b/$1", true)]);
        for _ in 0..3 {
            assert_eq!(
                t.rewrite_for("/a/x", "https", "h"),
                Some(RewriteMatch::Internal {
                    path: "/b/x".to_string(),
                    protocol: None,
                    domain: None,
                })
            );
        }
    }
}
