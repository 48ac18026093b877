use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/infractions", post(handlers::violations::record_infraction))
        .route("/api/violations", post(handlers::violations::file_violation))
        .route("/api/violations/:id", get(handlers::violations::get_violation))
        .route(
            "/api/violations/:id/reassign",
            post(handlers::violations::reassign),
        )
}
