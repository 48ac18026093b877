use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/slots",
            get(handlers::slots::list_slots).post(handlers::slots::schedule_slot),
        )
        .route(
            "/api/slots/:id",
            get(handlers::slots::get_slot)
                .put(handlers::slots::update_slot)
                .delete(handlers::slots::delete_slot),
        )
        .route("/api/slots/:id/roster", get(handlers::slots::slot_roster))
        .route("/api/monitor-signups", post(handlers::slots::sign_up_monitor))
}
