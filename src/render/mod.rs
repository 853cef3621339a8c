//! Template rendering seam.
//!
//! Actual template syntax evaluation is an external collaborator's job; the
//! gateway only resolves a template path and hands over the assembled
//! envelope. `FileTemplateRenderer` is the built-in implementation: it reads
//! the template file and substitutes a fixed set of placeholders, enough to
//! serve documents and error pages without a template engine.

use std::path::PathBuf;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::content::envelope::ContentEnvelope;
use crate::http::context::RequestContext;

/// Rendering failure. Callers fall back to a plain-text body; this never
/// propagates as an unhandled failure.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template {path} unavailable: {source}")]
    Template {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Everything a template gets to see.
pub struct RenderInput<'a> {
    pub ctx: &'a RequestContext,
    pub content: &'a ContentEnvelope,
    /// Table-of-contents fragment, when one was fetched.
    pub toc: Option<&'a str>,
}

/// External rendering collaborator.
pub trait TemplateRenderer: Send + Sync {
    fn render<'a>(
        &'a self,
        template_path: &'a str,
        input: &'a RenderInput<'a>,
    ) -> BoxFuture<'a, Result<String, RenderError>>;
}

/// Renders file templates with plain placeholder substitution.
pub struct FileTemplateRenderer {
    root: PathBuf,
}

impl FileTemplateRenderer {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl TemplateRenderer for FileTemplateRenderer {
    fn render<'a>(
        &'a self,
        template_path: &'a str,
        input: &'a RenderInput<'a>,
    ) -> BoxFuture<'a, Result<String, RenderError>> {
        Box::pin(async move {
            let full_path = self.root.join(template_path);
            let template =
                tokio::fs::read_to_string(&full_path)
                    .await
                    .map_err(|source| RenderError::Template {
                        path: template_path.to_string(),
                        source,
                    })?;

            let content = input.content;
            let next_url = content.next.as_ref().and_then(|s| s.url.as_deref());
            let previous_url = content.previous.as_ref().and_then(|s| s.url.as_deref());

            Ok(template
                .replace("{{ title }}", content.title.as_deref().unwrap_or(""))
                .replace("{{ content }}", &content.body)
                .replace("{{ toc }}", input.toc.unwrap_or(""))
                .replace("{{ next_url }}", next_url.unwrap_or(""))
                .replace("{{ previous_url }}", previous_url.unwrap_or("")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::context::StageTimings;

    fn ctx() -> RequestContext {
        RequestContext {
            request_id: "req-1".to_string(),
            host: "docs.example.com".to_string(),
            protocol: "https".to_string(),
            original_path: "/".to_string(),
            domain: "docs.example.com".to_string(),
            revision_id: None,
            staging_host: None,
            content_id: None,
            template_path: None,
            timings: StageTimings::default(),
        }
    }

    #[tokio::test]
    async fn substitutes_envelope_fields() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("doc.html"),
            "<h1>{{ title }}</h1><main>{{ content }}</main><nav>{{ toc }}</nav>",
        )
        .unwrap();

        let renderer = FileTemplateRenderer::new(dir.path().to_path_buf());
        let content = ContentEnvelope {
            title: Some("Intro".to_string()),
            body: "<p>hello</p>".to_string(),
            ..ContentEnvelope::default()
        };
        let ctx = ctx();
        let input = RenderInput {
            ctx: &ctx,
            content: &content,
            toc: Some("<ul></ul>"),
        };

        let html = renderer.render("doc.html", &input).await.unwrap();
        assert_eq!(html, "<h1>Intro</h1><main><p>hello</p></main><nav><ul></ul></nav>");
    }

    #[tokio::test]
    async fn missing_template_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = FileTemplateRenderer::new(dir.path().to_path_buf());
        let content = ContentEnvelope::default();
        let ctx = ctx();
        let input = RenderInput {
            ctx: &ctx,
            content: &content,
            toc: None,
        };

        assert!(renderer.render("absent.html", &input).await.is_err());
    }
}
