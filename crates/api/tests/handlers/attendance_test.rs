use axum::http::StatusCode;
use conduct_core::models::{
    notification::NotificationEvent,
    violation::{
        AttendanceOutcome, BulkAttendanceResponse, FileViolationRequest, ViolationRecord,
        ViolationStatus,
    },
};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{TestContext, as_user, days_from_today};

async fn file(ctx: &TestContext, barcode: &str, slot_id: Uuid) -> ViolationRecord {
    let student = ctx.student(&format!("Student {}", barcode), barcode).await;
    ctx.workflow
        .file_violation(
            ctx.teacher.id,
            FileViolationRequest {
                student_id: student.id,
                violation_type: "tardy".to_string(),
                slot_id: Some(slot_id),
            },
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_mark_attended() {
    let ctx = TestContext::new().await;
    let slot = ctx.slot(days_from_today(2), 3).await;
    let violation = file(&ctx, "600001", slot.id).await;
    let path = format!("/api/violations/{}/attendance", violation.id);

    let response = as_user(ctx.server.post(&path), ctx.teacher.id)
        .json(&json!({ "status": "attended" }))
        .await;
    response.assert_status_ok();
    let outcome: AttendanceOutcome = response.json();
    assert_eq!(outcome.violation.status, ViolationStatus::Attended);
    assert!(outcome.reassignment.is_none());

    let response = as_user(ctx.server.post(&path), ctx.teacher.id)
        .json(&json!({ "status": "absent" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "Invalid status transition: attended -> absent"
    );
}

#[tokio::test]
async fn test_mark_absent_reassigns() {
    let ctx = TestContext::new().await;
    let missed = ctx.slot(days_from_today(2), 1).await;
    let next = ctx.slot(days_from_today(3), 3).await;
    let violation = file(&ctx, "600002", missed.id).await;

    let response = as_user(
        ctx.server
            .post(&format!("/api/violations/{}/attendance", violation.id)),
        ctx.teacher.id,
    )
    .json(&json!({ "status": "absent" }))
    .await;

    response.assert_status_ok();
    let outcome: AttendanceOutcome = response.json();
    let reassignment = outcome.reassignment.expect("record should move");
    assert_eq!(reassignment.slot_id, next.id);
    assert_eq!(reassignment.violation.status, ViolationStatus::Reassigned);
    assert_eq!(reassignment.violation.detention_date, next.date);
    assert!(outcome.reassign_error.is_none());
    assert!(
        ctx.notifier
            .events()
            .iter()
            .any(|event| matches!(event, NotificationEvent::DetentionRescheduled(_)))
    );
}

#[tokio::test]
async fn test_mark_absent_without_capacity_stays_absent() {
    let ctx = TestContext::new().await;
    let only = ctx.slot(days_from_today(2), 1).await;
    let violation = file(&ctx, "600003", only.id).await;

    let response = as_user(
        ctx.server
            .post(&format!("/api/violations/{}/attendance", violation.id)),
        ctx.teacher.id,
    )
    .json(&json!({ "status": "absent" }))
    .await;

    response.assert_status_ok();
    let outcome: AttendanceOutcome = response.json();
    assert_eq!(outcome.violation.status, ViolationStatus::Absent);
    assert!(outcome.reassignment.is_none());
    assert_eq!(
        outcome.reassign_error.as_deref(),
        Some("No detention slot with open capacity is available")
    );
}

#[tokio::test]
async fn test_bulk_attendance_reports_each_record() {
    let ctx = TestContext::new().await;
    let slot = ctx.slot(days_from_today(2), 5).await;
    let first = file(&ctx, "600004", slot.id).await;
    let second = file(&ctx, "600005", slot.id).await;
    let missing = Uuid::new_v4();

    let response = as_user(ctx.server.post("/api/attendance/bulk"), ctx.teacher.id)
        .json(&json!({
            "violation_ids": [first.id, second.id, missing],
            "status": "attended"
        }))
        .await;

    response.assert_status_ok();
    let result: BulkAttendanceResponse = response.json();
    assert_eq!(result.succeeded, 2);
    assert_eq!(result.failed, 1);
    let failed = result
        .items
        .iter()
        .find(|item| item.violation_id == missing)
        .unwrap();
    assert!(failed.error.is_some());
}

#[tokio::test]
async fn test_bulk_attendance_needs_ids() {
    let ctx = TestContext::new().await;

    let response = as_user(ctx.server.post("/api/attendance/bulk"), ctx.teacher.id)
        .json(&json!({ "violation_ids": [], "status": "attended" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
