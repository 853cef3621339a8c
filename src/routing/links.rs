//! Outbound link resolution.
//!
//! Single place where a content ID becomes an absolute presented URL,
//! including staging re-injection. The directive filter, sibling-link filter
//! and the whereis/search APIs all go through here so a staged preview never
//! leaks un-revisioned links.

use crate::config::store::RoutingTables;
use crate::http::context::RequestContext;
use crate::routing::staging::StagingOverlay;

/// Resolve a content ID to an absolute presented URL in the context of the
/// current request.
///
/// In staging mode a leading revision segment matching the request's revision
/// is stripped before the reverse lookup, and the revision (plus a host
/// segment for non-default domains) is re-injected into the resulting path.
/// The URL is then rendered against the request host so the preview stays on
/// the staging origin.
pub fn presented_url_for(
    tables: &RoutingTables,
    staging: &StagingOverlay,
    ctx: &RequestContext,
    content_id: &str,
    cross_domain: bool,
) -> Option<String> {
    let lookup_id = lookup_id_for(staging, ctx, content_id);

    let (domain, path) = tables.presented_location(&ctx.domain, &lookup_id, cross_domain)?;

    match &ctx.revision_id {
        Some(revision) if staging.enabled() => {
            let staged = staging.apply_to_path(revision, Some(&domain), &path);
            Some(format!("{}://{}{}", ctx.protocol, ctx.host, staged))
        }
        _ => Some(format!("{}://{}{}", ctx.protocol, domain, path)),
    }
}

/// The content ID to use for table lookups: revision-stripped when it carries
/// the request's own revision.
fn lookup_id_for(staging: &StagingOverlay, ctx: &RequestContext, content_id: &str) -> String {
    if let (Some(revision), Some((id_revision, base))) = (
        &ctx.revision_id,
        staging.split_content_id(content_id),
    ) {
        if *revision == id_revision {
            return base;
        }
    }
    content_id.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store::{ContentPrefix, DomainTables};
    use crate::http::context::StageTimings;

    fn tables() -> RoutingTables {
        let mut t = RoutingTables::default();
        t.domains.insert(
            "docs.example.com".to_string(),
            DomainTables {
                content: vec![ContentPrefix {
                    prefix: "/guide/".to_string(),
                    base: Some("guides".to_string()),
                }],
                ..DomainTables::default()
            },
        );
        t.domains.insert(
            "other.example.com".to_string(),
            DomainTables {
                content: vec![ContentPrefix {
                    prefix: "/o/".to_string(),
                    base: Some("others".to_string()),
                }],
                ..DomainTables::default()
            },
        );
        t
    }

    fn ctx(revision: Option<&str>) -> RequestContext {
        RequestContext {
            request_id: "req-1".to_string(),
            host: "staging.example.com".to_string(),
            protocol: "https".to_string(),
            original_path: "/".to_string(),
            domain: "docs.example.com".to_string(),
            revision_id: revision.map(str::to_string),
            staging_host: None,
            content_id: None,
            template_path: None,
            timings: StageTimings::default(),
        }
    }

    #[test]
    fn normal_mode_uses_the_mapped_domain() {
        let staging = StagingOverlay::new(false, "");
        let mut c = ctx(None);
        c.host = "docs.example.com".to_string();
        assert_eq!(
            presented_url_for(&tables(), &staging, &c, "guides/intro", true),
            Some("https://docs.example.com/guide/intro".to_string())
        );
    }

    #[test]
    fn staging_reinjects_revision_on_the_request_host() {
        let staging = StagingOverlay::new(true, "docs.example.com");
        assert_eq!(
            presented_url_for(&tables(), &staging, &ctx(Some("r1")), "r1/guides/intro", true),
            Some("https://staging.example.com/r1/guide/intro".to_string())
        );
    }

    #[test]
    fn staging_adds_a_host_segment_for_non_default_domains() {
        let staging = StagingOverlay::new(true, "docs.example.com");
        assert_eq!(
            presented_url_for(&tables(), &staging, &ctx(Some("r1")), "others/doc", true),
            Some("https://staging.example.com/other.example.com/r1/o/doc".to_string())
        );
    }

    #[test]
    fn unmapped_ids_resolve_to_nothing() {
        let staging = StagingOverlay::new(false, "");
        assert_eq!(
            presented_url_for(&tables(), &staging, &ctx(None), "unknown/doc", true),
            None
        );
    }
}
