use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use conduct_core::models::{
    student::{
        CreateStudentRequest, ImportStudentsRequest, ImportStudentsResponse, ParentAccount,
        Student, StudentRecordResponse, UpdateParentEmailRequest, UpdateStudentRequest,
    },
    warning::StudentWarningsResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::{AdminUser, CurrentUser},
        error_handling::AppError,
    },
};

#[derive(Debug, Deserialize)]
pub struct StudentSearch {
    /// Case-insensitive name fragment. Without it the whole roster is returned.
    pub q: Option<String>,
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_students(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    Query(search): Query<StudentSearch>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = match search.q {
        Some(q) => state.workflow.search_students(&q).await?,
        None => state.workflow.list_students().await?,
    };
    Ok(Json(students))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn create_student(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = state.workflow.create_student(payload).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn import_students(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Json(payload): Json<ImportStudentsRequest>,
) -> Result<Json<ImportStudentsResponse>, AppError> {
    Ok(Json(state.workflow.import_students(payload.students).await))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn get_student(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentRecordResponse>, AppError> {
    Ok(Json(state.workflow.student_record(id).await?))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn find_by_barcode(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    Path(barcode): Path<String>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(state.workflow.find_by_barcode(&barcode).await?))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn update_student(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStudentRequest>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(state.workflow.update_student(id, payload).await?))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn delete_student(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.workflow.delete_student(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn student_warnings(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentWarningsResponse>, AppError> {
    Ok(Json(state.workflow.student_warnings(id).await?))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn regenerate_access_code(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ParentAccount>, AppError> {
    let student = state.workflow.regenerate_access_code(id).await?;
    Ok(Json(ParentAccount::from(student)))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn update_parent_email(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateParentEmailRequest>,
) -> Result<Json<ParentAccount>, AppError> {
    let student = state
        .workflow
        .update_parent_email(id, &payload.parent_email)
        .await?;
    Ok(Json(ParentAccount::from(student)))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn parent_accounts(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
) -> Result<Json<Vec<ParentAccount>>, AppError> {
    Ok(Json(state.workflow.parent_accounts().await?))
}
