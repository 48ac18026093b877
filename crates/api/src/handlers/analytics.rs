use axum::{
    Json,
    extract::{Query, State},
};
use conduct_core::models::analytics::{AnalyticsQuery, AnalyticsReport};
use std::sync::Arc;

use crate::{
    ApiState,
    middleware::{auth::CurrentUser, error_handling::AppError},
};

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn report(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsReport>, AppError> {
    Ok(Json(state.workflow.analytics(query.period).await?))
}
