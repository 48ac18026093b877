use axum::http::StatusCode;
use conduct_core::models::{
    notification::NotificationEvent,
    teacher::{StaffRole, Teacher},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{TestContext, as_user};

#[tokio::test]
async fn test_register_starts_unapproved() {
    let ctx = TestContext::new().await;
    let id = Uuid::new_v4();

    let response = as_user(ctx.server.post("/api/teachers/register"), id)
        .json(&json!({ "name": "Dewey Largo", "email": "largo@school.test" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let teacher: Teacher = response.json();
    assert_eq!(teacher.id, id);
    assert_eq!(teacher.role, StaffRole::Teacher);
    assert!(!teacher.is_approved);

    let response = as_user(ctx.server.get("/api/teachers/me"), id).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Teacher>(), teacher);

    as_user(ctx.server.get("/api/students"), id)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_rejects_bad_email() {
    let ctx = TestContext::new().await;

    let response = as_user(ctx.server.post("/api/teachers/register"), Uuid::new_v4())
        .json(&json!({ "name": "Dewey Largo", "email": "largo" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_me_for_unknown_identity() {
    let ctx = TestContext::new().await;

    as_user(ctx.server.get("/api/teachers/me"), Uuid::new_v4())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_approval_notifies_teacher() {
    let ctx = TestContext::new().await;
    let pending = ctx.seed_teacher("Dewey Largo", StaffRole::Teacher, false).await;
    let path = format!("/api/teachers/{}/approval", pending.id);

    as_user(ctx.server.put(&path), ctx.teacher.id)
        .json(&json!({ "approved": true }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = as_user(ctx.server.put(&path), ctx.admin.id)
        .json(&json!({ "approved": true }))
        .await;
    response.assert_status_ok();
    assert!(response.json::<Teacher>().is_approved);

    let events = ctx.notifier.events();
    let Some(NotificationEvent::TeacherStatusChanged(changed)) = events.last() else {
        panic!("expected a status notice");
    };
    assert!(changed.approved);
    assert_eq!(changed.teacher.email, pending.email);

    as_user(ctx.server.get("/api/students"), pending.id)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_admin_cannot_suspend_self() {
    let ctx = TestContext::new().await;

    let response = as_user(
        ctx.server
            .put(&format!("/api/teachers/{}/approval", ctx.admin.id)),
        ctx.admin.id,
    )
    .json(&json!({ "approved": false }))
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_promote_to_admin() {
    let ctx = TestContext::new().await;

    let response = as_user(
        ctx.server.put(&format!("/api/teachers/{}/role", ctx.teacher.id)),
        ctx.admin.id,
    )
    .json(&json!({ "role": "admin" }))
    .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Teacher>().role, StaffRole::Admin);

    let response = as_user(ctx.server.get("/api/teachers"), ctx.teacher.id).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Vec<Teacher>>().len(), 2);
}

#[tokio::test]
async fn test_role_change_for_unknown_teacher() {
    let ctx = TestContext::new().await;

    as_user(
        ctx.server
            .put(&format!("/api/teachers/{}/role", Uuid::new_v4())),
        ctx.admin.id,
    )
    .json(&json!({ "role": "teacher" }))
    .await
    .assert_status(StatusCode::NOT_FOUND);
}
