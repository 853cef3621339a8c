//! The whereis API: every presented location of a content ID.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::http::server::AppState;
use crate::routing::resolver::ContentMapping;

#[derive(Serialize)]
pub(crate) struct WhereisResponse {
    pub mappings: Vec<ContentMapping>,
}

/// Handle GET /_api/whereis/{content-id}.
///
/// In staging mode a revision-qualified content ID is stripped before the
/// lookup and the revision is re-injected into every returned path, so a
/// staged preview can locate its own documents.
pub(crate) async fn whereis(
    State(state): State<AppState>,
    Path(content_id): Path<String>,
) -> Json<WhereisResponse> {
    let tables = state.store.load();

    let mappings = match state.staging.split_content_id(&content_id) {
        Some((revision, base)) => {
            let mut mappings = tables.mappings_for(&base);
            for mapping in &mut mappings {
                mapping.path =
                    state
                        .staging
                        .apply_to_path(&revision, Some(&mapping.domain), &mapping.path);
            }
            mappings
        }
        None => tables.mappings_for(&content_id),
    };

    Json(WhereisResponse { mappings })
}
