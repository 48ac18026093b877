use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use conduct_core::{
    errors::ConductError,
    models::teacher::{RegisterTeacherRequest, Teacher, TeacherApprovalRequest, UpdateRoleRequest},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::{AdminUser, Identity},
        error_handling::AppError,
    },
};

/// Creates the staff record for an identity the gateway already knows.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn register(
    State(state): State<Arc<ApiState>>,
    Identity(id): Identity,
    Json(payload): Json<RegisterTeacherRequest>,
) -> Result<(StatusCode, Json<Teacher>), AppError> {
    let teacher = state.workflow.register_teacher(id, payload).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

/// Works for unapproved staff too, so the client can show a pending screen.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn me(
    State(state): State<Arc<ApiState>>,
    Identity(id): Identity,
) -> Result<Json<Teacher>, AppError> {
    match state.workflow.get_teacher(id).await {
        Ok(teacher) => Ok(Json(teacher)),
        Err(ConductError::NotFound(_)) => {
            Err(ConductError::Authentication("Unknown staff member".to_string()).into())
        }
        Err(err) => Err(err.into()),
    }
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_teachers(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
) -> Result<Json<Vec<Teacher>>, AppError> {
    Ok(Json(state.workflow.list_teachers().await?))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn set_approval(
    State(state): State<Arc<ApiState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TeacherApprovalRequest>,
) -> Result<Json<Teacher>, AppError> {
    if id == admin.id && !payload.approved {
        return Err(ConductError::Validation("Admins cannot suspend themselves".to_string()).into());
    }
    Ok(Json(state.workflow.set_teacher_approval(id, payload.approved).await?))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn set_role(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<Teacher>, AppError> {
    Ok(Json(state.workflow.set_teacher_role(id, payload.role).await?))
}
