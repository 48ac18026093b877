use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use conduct_core::models::violation::{
    FileViolationRequest, InfractionOutcome, RecordInfractionRequest, Reassignment,
    ViolationRecord,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::CurrentUser, error_handling::AppError},
};

/// Runs the infraction through the warning ledger first.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn record_infraction(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<RecordInfractionRequest>,
) -> Result<(StatusCode, Json<InfractionOutcome>), AppError> {
    let outcome = state.workflow.record_infraction(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn file_violation(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<FileViolationRequest>,
) -> Result<(StatusCode, Json<ViolationRecord>), AppError> {
    let violation = state.workflow.file_violation(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(violation)))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn get_violation(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ViolationRecord>, AppError> {
    Ok(Json(state.workflow.get_violation(id).await?))
}

/// Manual retry for a record that was left `absent`.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn reassign(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Reassignment>, AppError> {
    Ok(Json(state.workflow.reassign(id).await?))
}
