use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/students",
            get(handlers::students::list_students).post(handlers::students::create_student),
        )
        .route("/api/students/import", post(handlers::students::import_students))
        .route(
            "/api/students/:id",
            get(handlers::students::get_student)
                .put(handlers::students::update_student)
                .delete(handlers::students::delete_student),
        )
        .route(
            "/api/students/:id/warnings",
            get(handlers::students::student_warnings),
        )
        .route(
            "/api/students/:id/access-code",
            post(handlers::students::regenerate_access_code),
        )
        .route(
            "/api/students/:id/parent-email",
            put(handlers::students::update_parent_email),
        )
        .route("/api/parents", get(handlers::students::parent_accounts))
        .route("/api/scan/:barcode", get(handlers::students::find_by_barcode))
}
