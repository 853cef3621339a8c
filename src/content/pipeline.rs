//! Ordered content-filter pipeline.
//!
//! # Responsibilities
//! - Hold registered transformation stages in registration order
//! - Run stages sequentially; later stages may depend on earlier mutations
//! - Short-circuit on the first stage error
//!
//! # Design Decisions
//! - Stages are trait objects returning `BoxFuture`, the crate's seam for
//!   dynamic async dispatch; a stage completes exactly once, with success or
//!   an error
//! - Stages receive the routing tables and staging overlay through
//!   `FilterContext` so link resolution uses the same snapshot as the rest
//!   of the request

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::config::store::RoutingTables;
use crate::content::envelope::ContentEnvelope;
use crate::http::context::RequestContext;
use crate::routing::staging::StagingOverlay;

/// Error raised by a filter stage; aborts the remaining stages.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("filter stage {stage} failed: {message}")]
    Stage { stage: &'static str, message: String },
}

/// Read-only request surroundings handed to every stage.
pub struct FilterContext<'a> {
    pub ctx: &'a RequestContext,
    pub tables: &'a RoutingTables,
    pub staging: &'a StagingOverlay,
}

/// An asynchronous content-transformation stage.
pub trait ContentFilter: Send + Sync {
    /// Stage name used in error messages and logs.
    fn name(&self) -> &'static str;

    fn apply<'a>(
        &'a self,
        cx: &'a FilterContext<'a>,
        content: &'a mut ContentEnvelope,
    ) -> BoxFuture<'a, Result<(), FilterError>>;
}

/// Ordered, registrable filter pipeline.
#[derive(Default)]
pub struct FilterPipeline {
    stages: Vec<Box<dyn ContentFilter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stage. Stages run in registration order.
    pub fn add(&mut self, stage: Box<dyn ContentFilter>) {
        self.stages.push(stage);
    }

    /// Run all stages sequentially; the first error aborts the rest.
    pub async fn run(
        &self,
        cx: &FilterContext<'_>,
        content: &mut ContentEnvelope,
    ) -> Result<(), FilterError> {
        for stage in &self.stages {
            stage.apply(cx, content).await?;
            tracing::trace!(
                request_id = %cx.ctx.request_id,
                stage = stage.name(),
                "Filter stage complete"
            );
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
