use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use conduct_core::models::slot::{
    CreateSlotRequest, DetentionSlot, MonitorSignupRequest, SlotQuery, SlotRosterResponse,
    UpdateSlotRequest,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::{AdminUser, CurrentUser},
        error_handling::AppError,
    },
};

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Vec<DetentionSlot>>, AppError> {
    Ok(Json(state.workflow.list_slots(query).await?))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn schedule_slot(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateSlotRequest>,
) -> Result<(StatusCode, Json<DetentionSlot>), AppError> {
    let slot = state.workflow.schedule_slot(payload).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn sign_up_monitor(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<MonitorSignupRequest>,
) -> Result<(StatusCode, Json<Vec<DetentionSlot>>), AppError> {
    let slots = state.workflow.sign_up_monitor(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(slots)))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn get_slot(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DetentionSlot>, AppError> {
    Ok(Json(state.workflow.get_slot(id).await?))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn update_slot(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSlotRequest>,
) -> Result<Json<DetentionSlot>, AppError> {
    Ok(Json(state.workflow.update_slot(id, payload).await?))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn delete_slot(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.workflow.delete_slot(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn slot_roster(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SlotRosterResponse>, AppError> {
    Ok(Json(state.workflow.slot_roster(id).await?))
}
