use axum::http::StatusCode;
use conduct_api::middleware::error_handling::{map_error, status_for};
use conduct_core::{errors::ConductError, models::teacher::StaffRole, models::violation::ViolationStatus};
use rstest::rstest;
use uuid::Uuid;

use crate::test_utils::{TestContext, as_user};

#[rstest]
#[case(ConductError::NotFound("student".to_string()), StatusCode::NOT_FOUND)]
#[case(ConductError::Validation("grade".to_string()), StatusCode::BAD_REQUEST)]
#[case(ConductError::NoCapacityAvailable, StatusCode::CONFLICT)]
#[case(
    ConductError::InvalidTransition { from: ViolationStatus::Attended, to: ViolationStatus::Absent },
    StatusCode::CONFLICT
)]
#[case(ConductError::Conflict("barcode".to_string()), StatusCode::CONFLICT)]
#[case(ConductError::Authentication("who".to_string()), StatusCode::UNAUTHORIZED)]
#[case(ConductError::Authorization("admin".to_string()), StatusCode::FORBIDDEN)]
#[case(ConductError::Persistence(eyre::eyre!("pool closed")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(ConductError::Notification("smtp".to_string()), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_status_mapping(#[case] error: ConductError, #[case] expected: StatusCode) {
    assert_eq!(status_for(&error), expected);
    assert_eq!(map_error(error).status(), expected);
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/api/students").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Authentication error: Missing user identity");
}

#[tokio::test]
async fn test_malformed_identity_is_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .get("/api/students")
        .add_header(
            axum::http::HeaderName::from_static("x-user-id"),
            axum::http::HeaderValue::from_static("not-a-uuid"),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_staff_is_unauthorized() {
    let ctx = TestContext::new().await;

    let response = as_user(ctx.server.get("/api/students"), Uuid::new_v4()).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unapproved_staff_is_forbidden() {
    let ctx = TestContext::new().await;
    let pending = ctx.seed_teacher("Ned Flanders", StaffRole::Teacher, false).await;

    let response = as_user(ctx.server.get("/api/students"), pending.id).await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_health_needs_no_identity() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}
