use axum::http::StatusCode;
use conduct_core::models::{student::StudentRecordResponse, violation::FileViolationRequest};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{TestContext, days_from_today};

#[tokio::test]
async fn test_verify_access_code() {
    let ctx = TestContext::new().await;
    let slot = ctx.slot(days_from_today(2), 3).await;
    let student = ctx.student("Maggie", "700001").await;
    ctx.workflow
        .file_violation(
            ctx.teacher.id,
            FileViolationRequest {
                student_id: student.id,
                violation_type: "pacifier".to_string(),
                slot_id: Some(slot.id),
            },
        )
        .await
        .unwrap();

    let response = ctx
        .server
        .post("/api/portal/verify")
        .json(&json!({ "code": student.parent_access_code.to_lowercase() }))
        .await;

    response.assert_status_ok();
    let record: StudentRecordResponse = response.json();
    assert_eq!(record.student.id, student.id);
    assert!(record.student.parent_verified);
    assert_eq!(record.violations.len(), 1);

    let first_seen = record.student.parent_verified_at;
    let again: StudentRecordResponse = ctx
        .server
        .post("/api/portal/verify")
        .json(&json!({ "code": student.parent_access_code }))
        .await
        .json();
    assert_eq!(again.student.parent_verified_at, first_seen);
}

#[tokio::test]
async fn test_unknown_access_code() {
    let ctx = TestContext::new().await;
    ctx.student("Maggie", "700002").await;

    let response = ctx
        .server
        .post("/api/portal/verify")
        .json(&json!({ "code": "NOPE1234" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
