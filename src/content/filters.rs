//! Built-in content filters.
//!
//! Two stages ship with the gateway: the directive filter, which replaces
//! deferred-link markers of the form `to('<contentID>')` in document bodies
//! with resolved presented URLs, and the sibling-link filter, which fills in
//! the `url` field of next/previous link stubs. Both resolve through the
//! routing tables so authors can reference documents by stable content ID
//! instead of brittle URLs.

use futures_util::future::BoxFuture;
use regex::{Captures, Regex};

use crate::content::envelope::ContentEnvelope;
use crate::content::pipeline::{ContentFilter, FilterContext, FilterError};
use crate::routing::links::presented_url_for;

/// Replaces `to('<contentID>')` markers in the body with presented URLs.
pub struct DirectiveFilter {
    pattern: Regex,
}

impl DirectiveFilter {
    pub fn new() -> Self {
        Self {
            // Hardcoded marker syntax; the pattern cannot fail to compile.
            pattern: Regex::new(r"to\('([^']+)'\)").expect("directive pattern"),
        }
    }
}

impl Default for DirectiveFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentFilter for DirectiveFilter {
    fn name(&self) -> &'static str {
        "directive"
    }

    fn apply<'a>(
        &'a self,
        cx: &'a FilterContext<'a>,
        content: &'a mut ContentEnvelope,
    ) -> BoxFuture<'a, Result<(), FilterError>> {
        Box::pin(async move {
            let body = self
                .pattern
                .replace_all(&content.body, |caps: &Captures| {
                    let content_id = &caps[1];
                    match presented_url_for(cx.tables, cx.staging, cx.ctx, content_id, true) {
                        Some(url) => url,
                        None => {
                            // An unresolvable directive stays verbatim; dropping
                            // it would corrupt the surrounding prose.
                            tracing::warn!(
                                request_id = %cx.ctx.request_id,
                                content_id = %content_id,
                                "Unresolvable link directive left in body"
                            );
                            caps[0].to_string()
                        }
                    }
                })
                .into_owned();
            content.body = body;
            Ok(())
        })
    }
}

/// Fills in the `url` field of next/previous link stubs.
pub struct SiblingLinkFilter;

impl ContentFilter for SiblingLinkFilter {
    fn name(&self) -> &'static str {
        "sibling-links"
    }

    fn apply<'a>(
        &'a self,
        cx: &'a FilterContext<'a>,
        content: &'a mut ContentEnvelope,
    ) -> BoxFuture<'a, Result<(), FilterError>> {
        Box::pin(async move {
            for stub in [content.next.as_mut(), content.previous.as_mut()]
                .into_iter()
                .flatten()
            {
                if stub.url.is_some() {
                    continue;
                }
                stub.url = presented_url_for(cx.tables, cx.staging, cx.ctx, &stub.content_id, true);
                if stub.url.is_none() {
                    tracing::debug!(
                        request_id = %cx.ctx.request_id,
                        content_id = %stub.content_id,
                        "Sibling link has no presented location"
                    );
                }
            }
            Ok(())
        })
    }
}
