use axum::{
    Json,
    extract::{Path, State},
};
use conduct_core::{
    errors::ConductError,
    models::violation::{
        AttendanceOutcome, BulkAttendanceRequest, BulkAttendanceResponse, MarkAttendanceRequest,
    },
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::CurrentUser, error_handling::AppError},
};

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn mark_attendance(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MarkAttendanceRequest>,
) -> Result<Json<AttendanceOutcome>, AppError> {
    Ok(Json(state.workflow.mark_attendance(id, payload.status).await?))
}

/// Every id gets its own outcome; the response is 200 even when some fail.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn mark_attendance_bulk(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    Json(payload): Json<BulkAttendanceRequest>,
) -> Result<Json<BulkAttendanceResponse>, AppError> {
    if payload.violation_ids.is_empty() {
        return Err(ConductError::Validation("No violations selected".to_string()).into());
    }
    Ok(Json(
        state
            .workflow
            .mark_attendance_bulk(&payload.violation_ids, payload.status)
            .await,
    ))
}
