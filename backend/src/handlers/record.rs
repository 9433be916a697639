//! SVG record handlers (save + gallery reads)

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
};
use serde_json::Value;
use validator::Validate;

use crate::AppState;
use crate::models::{ListSvgQuery, RecordPage, SaveSvgResponse, SvgRecord};
use crate::utils::{RecordApiError, RecordResult};

/// Persist one generated SVG
///
/// The payload is stored as-is in the SVG collection.
#[utoipa::path(
    post,
    path = "/api/saveSVG",
    responses(
        (status = 200, description = "Record created", body = SaveSvgResponse),
        (status = 400, description = "Body is not JSON", body = SaveSvgResponse),
        (status = 500, description = "Record store failure", body = SaveSvgResponse),
    ),
    tag = "Records"
)]
pub async fn save_svg(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> RecordResult<Json<SaveSvgResponse>> {
    let payload: Value = serde_json::from_slice(&body)?;
    tracing::debug!("Received data to save: {}", payload);

    let record = state
        .record_store
        .create(&state.collection, &payload)
        .await
        .map_err(RecordApiError::Persist)?;
    tracing::info!("SVG saved with ID: {}", record.id);
    Ok(Json(SaveSvgResponse::saved(record.id)))
}

/// List saved SVGs, newest first
#[utoipa::path(
    get,
    path = "/api/svgs",
    params(ListSvgQuery),
    responses(
        (status = 200, description = "One page of SVG records"),
        (status = 400, description = "Invalid paging", body = SaveSvgResponse),
        (status = 500, description = "Record store failure", body = SaveSvgResponse),
    ),
    tag = "Records"
)]
pub async fn list_svgs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListSvgQuery>,
) -> RecordResult<Json<RecordPage>> {
    query.validate()?;
    tracing::debug!("Listing SVGs page={} per_page={}", query.page, query.per_page);

    let page = state
        .record_store
        .list(&state.collection, query.page, query.per_page)
        .await?;
    tracing::debug!("Retrieved {} of {} SVGs", page.items.len(), page.total_items);
    Ok(Json(page))
}

/// Get one saved SVG
#[utoipa::path(
    get,
    path = "/api/svgs/{id}",
    params(("id" = String, Path, description = "Record ID")),
    responses(
        (status = 200, description = "SVG record"),
        (status = 404, description = "Record not found", body = SaveSvgResponse),
        (status = 500, description = "Record store failure", body = SaveSvgResponse),
    ),
    tag = "Records"
)]
pub async fn get_svg(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> RecordResult<Json<SvgRecord>> {
    if id.trim().is_empty() {
        return Err(RecordApiError::InvalidInput("Record ID cannot be empty".to_string()));
    }
    tracing::debug!("Fetching SVG id={}", id);
    let record = state.record_store.get(&state.collection, &id).await?;
    Ok(Json(record))
}
