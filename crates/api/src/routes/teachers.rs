use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/teachers", get(handlers::teachers::list_teachers))
        .route("/api/teachers/register", post(handlers::teachers::register))
        .route("/api/teachers/me", get(handlers::teachers::me))
        .route(
            "/api/teachers/:id/approval",
            put(handlers::teachers::set_approval),
        )
        .route("/api/teachers/:id/role", put(handlers::teachers::set_role))
}
