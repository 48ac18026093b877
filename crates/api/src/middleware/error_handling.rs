//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and a JSON body of the form
//! `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use conduct_core::errors::ConductError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use conduct_api::middleware::error_handling::AppError;
/// use conduct_core::errors::ConductError;
///
/// async fn handler(barcode: String) -> Result<Json<String>, AppError> {
///     if barcode.len() != 6 {
///         return Err(AppError(ConductError::Validation(
///             "Barcode must be 6 digits".to_string(),
///         )));
///     }
///     Ok(Json(barcode))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ConductError);

pub fn status_for(err: &ConductError) -> StatusCode {
    match err {
        ConductError::NotFound(_) => StatusCode::NOT_FOUND,
        ConductError::Validation(_) => StatusCode::BAD_REQUEST,
        ConductError::NoCapacityAvailable => StatusCode::CONFLICT,
        ConductError::InvalidTransition { .. } => StatusCode::CONFLICT,
        ConductError::Conflict(_) => StatusCode::CONFLICT,
        ConductError::Authentication(_) => StatusCode::UNAUTHORIZED,
        ConductError::Authorization(_) => StatusCode::FORBIDDEN,
        ConductError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ConductError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ConductError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!(error = ?self.0, "request failed");
        }

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

impl From<ConductError> for AppError {
    fn from(err: ConductError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ConductError::Persistence(err))
    }
}

/// Maps a ConductError straight to an HTTP response
pub fn map_error(err: ConductError) -> Response {
    AppError(err).into_response()
}
