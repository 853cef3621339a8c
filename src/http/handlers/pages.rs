//! The per-request orchestrator.
//!
//! Lifecycle: rewrite loop → staging strip → proxy check → content-ID
//! resolution → concurrent fetch join → filter pipeline → template route →
//! render → respond. One structured summary event is emitted per request
//! with per-stage durations and the final status.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use crate::backend::ContentClient;
use crate::config::store::RoutingTables;
use crate::content::envelope::ContentEnvelope;
use crate::content::pipeline::FilterContext;
use crate::http::context::RequestContext;
use crate::http::error::{error_response, PresenterError};
use crate::http::handlers::proxy;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::render::RenderInput;
use crate::routing::rewrite::RewriteMatch;
use crate::routing::Resolution;

/// Hop bound for internal rewrites. A rule set that rewrites this many
/// times in a row is cyclic.
const MAX_REWRITE_HOPS: usize = 10;

/// Main content handler: everything that is not an API route.
pub(crate) async fn serve(State(state): State<AppState>, request: Request<Body>) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();

    let tables = state.store.load();
    let mut ctx = RequestContext::from_request(&request, &state.config);

    let response = match handle(&state, &tables, &mut ctx, request).await {
        Ok(response) => response,
        Err(err) => error_response(&state, &ctx, &err).await,
    };

    let status = response.status();
    metrics::record_request(&method, status.as_u16(), &ctx.domain, started);
    tracing::info!(
        request_id = %ctx.request_id,
        method = %method,
        domain = %ctx.domain,
        path = %ctx.original_path,
        content_id = ctx.content_id.as_deref().unwrap_or("-"),
        template = ctx.template_path.as_deref().unwrap_or("-"),
        status = status.as_u16(),
        content_ms = millis(ctx.timings.content),
        assets_ms = millis(ctx.timings.assets),
        toc_ms = millis(ctx.timings.toc),
        render_ms = millis(ctx.timings.render),
        total_ms = started.elapsed().as_millis() as u64,
        "Request complete"
    );

    response
}

fn millis(duration: Option<Duration>) -> u64 {
    duration.map_or(0, |d| d.as_millis() as u64)
}

async fn handle(
    state: &AppState,
    tables: &Arc<RoutingTables>,
    ctx: &mut RequestContext,
    request: Request<Body>,
) -> Result<Response, PresenterError> {
    // 1. Rewrite loop. Internal rewrites feed back into the rule scan;
    //    a hostname override switches the scan onto that domain's tables;
    //    redirects answer immediately.
    let mut path = ctx.original_path.clone();
    let mut hops = 0;
    while let Some(matched) = tables
        .domain(&ctx.domain)
        .and_then(|t| t.rewrite_for(&path, &ctx.protocol, &ctx.host))
    {
        match matched {
            RewriteMatch::Internal {
                path: new_path,
                protocol,
                domain,
            } => {
                hops += 1;
                if hops > MAX_REWRITE_HOPS {
                    return Err(PresenterError::RewriteLoop {
                        path: new_path,
                        hops,
                    });
                }
                tracing::debug!(
                    request_id = %ctx.request_id,
                    from = %path,
                    to = %new_path,
                    domain = domain.as_deref().unwrap_or(&ctx.domain),
                    "Internal rewrite"
                );
                if let Some(protocol) = protocol {
                    ctx.protocol = protocol;
                }
                if let Some(domain) = domain {
                    ctx.domain = domain;
                }
                path = new_path;
            }
            RewriteMatch::Redirect { status, target } => {
                return redirect(status, &target);
            }
        }
    }

    // 2. Staging strip. A staged request without a revision segment has no
    //    addressable preview, which is a routing miss.
    if state.staging.enabled() {
        match state.staging.split_path(tables, &path) {
            Some(staged) => {
                path = staged.remaining_path.clone();
                ctx.apply_staging(staged.revision_id, staged.staging_host);
            }
            None => {
                return Err(PresenterError::Unmapped {
                    domain: ctx.domain.clone(),
                    path,
                });
            }
        }
    }

    // 3. Passthrough proxy prefixes bypass content routing entirely.
    if let Some(domain_tables) = tables.domain(&ctx.domain) {
        if let Some((route, remainder)) = domain_tables.proxy_for(&path) {
            let remainder = remainder.to_string();
            return proxy::forward(state, ctx, route, &remainder, request).await;
        }
    }

    // 4. Content-ID resolution. An empty-marker prefix serves an empty
    //    envelope with no content fetch.
    let resolved = match tables.content_id(&ctx.domain, &path) {
        Resolution::Unmapped => {
            return Err(PresenterError::Unmapped {
                domain: ctx.domain.clone(),
                path,
            });
        }
        Resolution::EmptyEnvelope => None,
        Resolution::Resolved(id) => Some(id),
    };

    let content_id = resolved.map(|id| match &ctx.revision_id {
        Some(revision) => state.staging.apply_to_content_id(revision, &id),
        None => id,
    });
    ctx.content_id.clone_from(&content_id);

    let toc_id = tables.base_for(&ctx.domain, &path).map(|base| {
        let id = format!("{base}/_toc");
        match &ctx.revision_id {
            Some(revision) => state.staging.apply_to_content_id(revision, &id),
            None => id,
        }
    });

    // 5. Three-way fetch join. Assets and TOC are best-effort; the primary
    //    error is captured and only acted on once all three have settled.
    let client = &state.content;
    let ((content_result, content_dur), (assets_result, assets_dur), (toc, toc_dur)) = tokio::join!(
        timed(fetch_envelope(client, content_id.as_deref())),
        timed(client.assets()),
        timed(fetch_toc(client, toc_id.as_deref(), &ctx.request_id)),
    );
    ctx.timings.content = Some(content_dur);
    ctx.timings.assets = Some(assets_dur);
    ctx.timings.toc = Some(toc_dur);

    let site_assets = assets_result.unwrap_or_else(|err| {
        tracing::warn!(
            request_id = %ctx.request_id,
            error = %err,
            "Asset manifest fetch failed, continuing with an empty map"
        );
        HashMap::new()
    });

    let mut envelope = content_result?;
    for (name, url) in site_assets {
        envelope.assets.entry(name).or_insert(url);
    }

    // 6. Filter pipeline, in registration order.
    {
        let fcx = FilterContext {
            ctx,
            tables,
            staging: &state.staging,
        };
        state.pipeline.run(&fcx, &mut envelope).await?;
    }

    // 7. Template route: first declared regex match, unlike content
    //    routing's longest-prefix policy.
    let template = tables
        .domain(&ctx.domain)
        .and_then(|t| t.template_for(&path))
        .unwrap_or(&state.config.templates.default_template)
        .to_string();
    ctx.template_path = Some(template.clone());

    // 8. Render and respond.
    let render_started = Instant::now();
    let input = RenderInput {
        ctx,
        content: &envelope,
        toc: toc.as_deref(),
    };
    let html = state.renderer.render(&template, &input).await;
    ctx.timings.render = Some(render_started.elapsed());

    Ok((StatusCode::OK, Html(html?)).into_response())
}

async fn fetch_envelope(
    client: &ContentClient,
    content_id: Option<&str>,
) -> Result<ContentEnvelope, PresenterError> {
    match content_id {
        Some(id) => Ok(client.envelope(id).await?),
        None => Ok(ContentEnvelope::empty()),
    }
}

/// Best-effort table-of-contents fetch: any failure or empty body yields
/// `None`, never a request failure.
async fn fetch_toc(
    client: &ContentClient,
    toc_id: Option<&str>,
    request_id: &str,
) -> Option<String> {
    let toc_id = toc_id?;
    match client.envelope(toc_id).await {
        Ok(envelope) if !envelope.body.is_empty() => Some(envelope.body),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(
                request_id = %request_id,
                toc_id = %toc_id,
                error = %err,
                "TOC fetch failed, rendering without one"
            );
            None
        }
    }
}

async fn timed<F, T>(future: F) -> (T, Duration)
where
    F: std::future::Future<Output = T>,
{
    let started = Instant::now();
    let value = future.await;
    (value, started.elapsed())
}

fn redirect(status: u16, target: &str) -> Result<Response, PresenterError> {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::MOVED_PERMANENTLY);
    Response::builder()
        .status(status)
        .header(header::LOCATION, target)
        .body(Body::empty())
        .map_err(|e| PresenterError::Proxy(format!("redirect response: {e}")))
}
