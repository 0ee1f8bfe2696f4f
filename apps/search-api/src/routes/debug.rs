//! # Diagnostic Endpoints
//!
//! Operator-facing introspection. Normal responses stay lean; everything
//! here lives under `/api/debug/` and is never called by product flows.
//!
//! - `/api/debug/resolution?q=...` replays a resolution walk and reports
//!   what every stage did, including degraded stages.
//! - `/api/debug/images` shows raw image references next to their
//!   normalized URLs, plus recent file records, for chasing broken images.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use tracing::warn;

use scout_core::{FileRecord, ResolutionTrace};

use crate::error::ApiError;
use crate::gate::require_access;
use crate::routes::products::QueryParams;
use crate::state::AppState;

/// One product's image reference, raw and normalized side by side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCheck {
    pub id: String,
    pub code: String,
    pub raw_image: Option<String>,
    pub normalized: Option<String>,
}

/// Response of the image diagnosis endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDiagnosis {
    /// Count of listable products in the catalog.
    pub catalog_total: i64,
    /// Raw-vs-normalized pairs for listable products that carry an image.
    pub checks: Vec<ImageCheck>,
    /// Most recent file records, newest first.
    pub recent_files: Vec<FileRecord>,
}

/// `GET /api/debug/resolution?q=...` - traced resolution walk.
///
/// Products in the trace carry their raw image references; this endpoint
/// reports what the catalog actually holds.
pub async fn resolution(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<QueryParams>,
) -> Result<Json<ResolutionTrace>, ApiError> {
    require_access(&state.config, &headers)?;

    let trace = state.resolver().resolve_traced(&params.query).await;
    Ok(Json(trace))
}

/// `GET /api/debug/images?limit=...` - image reference diagnosis.
pub async fn images(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<QueryParams>,
) -> Result<Json<ImageDiagnosis>, ApiError> {
    require_access(&state.config, &headers)?;

    let limit = params
        .limit
        .unwrap_or(state.config.search_limit)
        .clamp(1, scout_core::MAX_SEARCH_LIMIT);

    let repo = state.db.products();
    let catalog_total = repo.count_listable().await?;
    let with_images = repo.with_images(limit).await?;

    let normalizer = state.normalizer();
    let mut checks = Vec::with_capacity(with_images.len());
    for product in with_images {
        let normalized = normalizer.normalize(product.image.as_deref()).await;
        checks.push(ImageCheck {
            id: product.id,
            code: product.code,
            raw_image: product.image,
            normalized,
        });
    }

    let recent_files = match state.db.files().recent(limit).await {
        Ok(records) => records,
        Err(err) => {
            warn!(error = %err, "image diagnosis: file record listing failed, omitting");
            Vec::new()
        }
    };

    Ok(Json(ImageDiagnosis {
        catalog_total,
        checks,
        recent_files,
    }))
}
