// Snapshot endpoints for bulk status listing

use axum::{extract::State, response::Json};

use super::common::{ApiResponse, ApiResult};
use crate::consensus::{GroupKind, ObservationGroup, ReferencePoolSource};
use crate::web::AppState;

/// Latest reference pool heights with their consensus
pub async fn get_reference_pool_heights(
    State(state): State<AppState>,
) -> ApiResult<ObservationGroup> {
    let group = state.evaluator.snapshot(GroupKind::ReferencePools);
    Ok(Json(ApiResponse::success(group.as_ref().clone())))
}

/// Latest service node heights with their consensus
pub async fn get_service_node_heights(
    State(state): State<AppState>,
) -> ApiResult<ObservationGroup> {
    let group = state.evaluator.snapshot(GroupKind::ServiceNodes);
    Ok(Json(ApiResponse::success(group.as_ref().clone())))
}

/// Current pool directory, including unsupported entries
pub async fn get_pool_sources(
    State(state): State<AppState>,
) -> ApiResult<Vec<ReferencePoolSource>> {
    let sources = state.store.pool_sources();
    Ok(Json(ApiResponse::success(sources.as_ref().clone())))
}
