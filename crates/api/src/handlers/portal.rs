//! Parent portal. Parents have no staff identity; the access code is the
//! only credential.

use axum::{Json, extract::State};
use conduct_core::models::student::{StudentRecordResponse, VerifyAccessCodeRequest};
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn verify_access_code(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<VerifyAccessCodeRequest>,
) -> Result<Json<StudentRecordResponse>, AppError> {
    Ok(Json(state.workflow.verify_access_code(&payload.code).await?))
}
