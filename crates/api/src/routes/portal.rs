use axum::{routing::post, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

/// Unauthenticated; the access code is the credential.
pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route("/api/portal/verify", post(handlers::portal::verify_access_code))
}
