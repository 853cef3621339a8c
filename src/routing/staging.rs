//! Staging overlay: revision-segment handling for preview builds.
//!
//! In staging mode every presented path carries a leading revision-ID
//! segment, optionally preceded by a host segment when the preview targets a
//! non-default domain. Inbound paths are stripped before any content-ID
//! resolution; every outbound link produced during the request gets the same
//! revision (and host) re-injected so a staged preview stays self-contained.

use url::Url;

use crate::config::store::RoutingTables;

/// A presented path split into its staging parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPath {
    /// Revision ID identifying the preview build.
    pub revision_id: String,

    /// Host override when the first segment named a known domain.
    pub staging_host: Option<String>,

    /// The path used for content-ID resolution.
    pub remaining_path: String,
}

/// Revision-segment parsing and injection. Inert unless staging is enabled.
#[derive(Debug, Clone)]
pub struct StagingOverlay {
    enabled: bool,
    default_domain: String,
}

impl StagingOverlay {
    pub fn new(enabled: bool, default_domain: impl Into<String>) -> Self {
        Self {
            enabled,
            default_domain: default_domain.into(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn default_domain(&self) -> &str {
        &self.default_domain
    }

    /// Split an inbound path into revision, optional host override and the
    /// remaining path.
    ///
    /// Leading empty segments are stripped. If the first segment names a
    /// known domain it is a host override and the next segment is the
    /// revision; otherwise the first segment itself is the revision. Returns
    /// `None` when staging is disabled or the path carries no revision.
    pub fn split_path(&self, tables: &RoutingTables, raw: &str) -> Option<StagedPath> {
        if !self.enabled {
            return None;
        }

        let mut segments = raw.split('/').skip_while(|s| s.is_empty());
        let first = segments.next()?;

        let (staging_host, revision_id) = if tables.is_known_domain(first) {
            (Some(first.to_string()), segments.next()?.to_string())
        } else {
            (None, first.to_string())
        };
        if revision_id.is_empty() {
            return None;
        }

        let rest: Vec<&str> = segments.collect();
        let remaining_path = format!("/{}", rest.join("/"));

        Some(StagedPath {
            revision_id,
            staging_host,
            remaining_path,
        })
    }

    /// Split a revision-qualified content ID into revision and base.
    ///
    /// Content IDs that parse as URLs carry the revision as the first segment
    /// of their path component; opaque slash-separated IDs carry it as their
    /// first segment.
    pub fn split_content_id(&self, content_id: &str) -> Option<(String, String)> {
        if !self.enabled {
            return None;
        }

        if let Ok(mut url) = Url::parse(content_id) {
            if url.has_host() {
                let segments: Vec<String> = url
                    .path_segments()?
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                let (revision, base) = segments.split_first()?;
                url.set_path(&format!("/{}", base.join("/")));
                return Some((revision.clone(), url.to_string()));
            }
        }

        let mut segments = content_id.split('/').skip_while(|s| s.is_empty());
        let revision = segments.next()?.to_string();
        let base: Vec<&str> = segments.collect();
        Some((revision, base.join("/")))
    }

    /// Prepend the revision (and non-default host, if given) to a path.
    pub fn apply_to_path(&self, revision_id: &str, host: Option<&str>, path: &str) -> String {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        match host {
            Some(host) if host != self.default_domain => {
                format!("/{host}/{revision_id}{path}")
            }
            _ => format!("/{revision_id}{path}"),
        }
    }

    /// Prepend the revision to a content ID.
    pub fn apply_to_content_id(&self, revision_id: &str, content_id: &str) -> String {
        if let Ok(mut url) = Url::parse(content_id) {
            if url.has_host() {
                let path = url.path().trim_start_matches('/').to_string();
                url.set_path(&format!("/{revision_id}/{path}"));
                return url.to_string();
            }
        }
        format!("{revision_id}/{}", content_id.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store::DomainTables;

    fn overlay() -> StagingOverlay {
        StagingOverlay::new(true, "docs.example.com")
    }

    fn tables_with(domain: &str) -> RoutingTables {
        let mut t = RoutingTables::default();
        t.domains.insert(domain.to_string(), DomainTables::default());
        t
    }

    #[test]
    fn first_segment_is_the_revision_by_default() {
        let tables = tables_with("docs.example.com");
        assert_eq!(
            overlay().split_path(&tables, "/build-1234/guide/intro"),
            Some(StagedPath {
                revision_id: "build-1234".to_string(),
                staging_host: None,
                remaining_path: "/guide/intro".to_string(),
            })
        );
    }

    #[test]
    fn known_domain_segment_is_a_host_override() {
        let tables = tables_with("other.example.com");
        assert_eq!(
            overlay().split_path(&tables, "/other.example.com/build-1/guide/"),
            Some(StagedPath {
                revision_id: "build-1".to_string(),
                staging_host: Some("other.example.com".to_string()),
                remaining_path: "/guide/".to_string(),
            })
        );
    }

    #[test]
    fn leading_empty_segments_are_stripped() {
        let tables = tables_with("docs.example.com");
        let staged = overlay().split_path(&tables, "//build-1/x").unwrap();
        assert_eq!(staged.revision_id, "build-1");
        assert_eq!(staged.remaining_path, "/x");
    }

    #[test]
    fn split_apply_round_trip() {
        let tables = tables_with("docs.example.com");
        let o = overlay();
        for path in ["/guide/intro", "/guide/", "/"] {
            let staged = o.apply_to_path("r1", None, path);
            let split = o.split_path(&tables, &staged).unwrap();
            assert_eq!(o.apply_to_path("r1", None, &split.remaining_path), staged);
            assert_eq!(split.remaining_path, *path);
        }
    }

    #[test]
    fn disabled_overlay_is_inert() {
        let tables = tables_with("docs.example.com");
        let o = StagingOverlay::new(false, "docs.example.com");
        assert_eq!(o.split_path(&tables, "/r1/x"), None);
        assert_eq!(o.split_content_id("r1/base"), None);
    }

    #[test]
    fn content_id_revision_round_trip() {
        let o = overlay();
        assert_eq!(
            o.split_content_id("build-9/repo/docs/intro"),
            Some(("build-9".to_string(), "repo/docs/intro".to_string()))
        );
        assert_eq!(
            o.apply_to_content_id("build-9", "repo/docs/intro"),
            "build-9/repo/docs/intro"
        );
    }

    #[test]
    fn url_shaped_content_ids_use_the_path_component() {
        let o = overlay();
        let (rev, base) = o
            .split_content_id("https://github.com/build-2/org/repo")
            .unwrap();
        assert_eq!(rev, "build-2");
        assert_eq!(base, "https://github.com/org/repo");
        assert_eq!(
            o.apply_to_content_id("build-2", "https://github.com/org/repo"),
            "https://github.com/build-2/org/repo"
        );
    }

    #[test]
    fn host_override_is_skipped_for_the_default_domain() {
        let o = overlay();
        assert_eq!(
            o.apply_to_path("r1", Some("docs.example.com"), "/x"),
            "/r1/x"
        );
        assert_eq!(
            o.apply_to_path("r1", Some("other.example.com"), "/x"),
            "/other.example.com/r1/x"
        );
    }
}
