use axum::{routing::post, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/violations/:id/attendance",
            post(handlers::attendance::mark_attendance),
        )
        .route(
            "/api/attendance/bulk",
            post(handlers::attendance::mark_attendance_bulk),
        )
}
