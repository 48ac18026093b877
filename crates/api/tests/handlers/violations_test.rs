use axum::http::StatusCode;
use conduct_core::models::{
    notification::NotificationEvent,
    violation::{InfractionOutcome, Reassignment, ViolationRecord, ViolationStatus},
};
use conduct_core::store::ViolationStore;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{TestContext, as_user, days_from_today};

#[tokio::test]
async fn test_file_violation_binds_seat_and_notifies() {
    let ctx = TestContext::new().await;
    let slot = ctx.slot(days_from_today(2), 3).await;
    let student = ctx.student("Milhouse", "500001").await;

    let response = as_user(ctx.server.post("/api/violations"), ctx.teacher.id)
        .json(&json!({ "student_id": student.id, "violation_type": "tardy", "slot_id": slot.id }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let violation: ViolationRecord = response.json();
    assert_eq!(violation.status, ViolationStatus::Pending);
    assert_eq!(violation.detention_date, slot.date);
    assert_eq!(violation.teacher_id, ctx.teacher.id);
    assert_eq!(ctx.workflow.get_slot(slot.id).await.unwrap().occupancy, 1);

    let events = ctx.notifier.events();
    assert_eq!(events.len(), 1);
    let NotificationEvent::DetentionAssigned(assigned) = &events[0] else {
        panic!("expected a detention notice");
    };
    assert_eq!(assigned.violation_id, violation.id);
    assert_eq!(
        assigned.parent_access_code.as_deref(),
        Some(student.parent_access_code.as_str())
    );

    let response = as_user(
        ctx.server.get(&format!("/api/violations/{}", violation.id)),
        ctx.teacher.id,
    )
    .await;
    response.assert_status_ok();
    assert_eq!(response.json::<ViolationRecord>(), violation);
}

#[tokio::test]
async fn test_file_violation_without_slot() {
    let ctx = TestContext::new().await;
    let student = ctx.student("Milhouse", "500002").await;

    let response = as_user(ctx.server.post("/api/violations"), ctx.teacher.id)
        .json(&json!({ "student_id": student.id, "violation_type": "tardy" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "Validation error: A detention date must be selected"
    );
}

#[tokio::test]
async fn test_full_slot_has_no_capacity() {
    let ctx = TestContext::new().await;
    let slot = ctx.slot(days_from_today(2), 1).await;
    let first = ctx.student("Sherri", "500003").await;
    let second = ctx.student("Terri", "500004").await;

    as_user(ctx.server.post("/api/violations"), ctx.teacher.id)
        .json(&json!({ "student_id": first.id, "violation_type": "tardy", "slot_id": slot.id }))
        .await
        .assert_status(StatusCode::CREATED);
    let response = as_user(ctx.server.post("/api/violations"), ctx.teacher.id)
        .json(&json!({ "student_id": second.id, "violation_type": "tardy", "slot_id": slot.id }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "No detention slot with open capacity is available"
    );
    assert_eq!(ctx.workflow.get_slot(slot.id).await.unwrap().occupancy, 1);
}

#[tokio::test]
async fn test_third_infraction_becomes_violation() {
    let ctx = TestContext::new().await;
    let slot = ctx.slot(days_from_today(2), 3).await;
    let student = ctx.student("Bart", "500005").await;
    let payload = json!({ "student_id": student.id, "violation_type": "tardy", "slot_id": slot.id });

    for _ in 0..2 {
        let response = as_user(ctx.server.post("/api/infractions"), ctx.teacher.id)
            .json(&payload)
            .await;
        response.assert_status(StatusCode::CREATED);
        assert!(matches!(
            response.json::<InfractionOutcome>(),
            InfractionOutcome::Warning { .. }
        ));
    }

    let response = as_user(ctx.server.post("/api/infractions"), ctx.teacher.id)
        .json(&payload)
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "violation");
    assert_eq!(body["violation"]["status"], "pending");
    assert_eq!(ctx.workflow.get_slot(slot.id).await.unwrap().occupancy, 1);
}

#[tokio::test]
async fn test_forced_warning_skips_threshold() {
    let ctx = TestContext::new().await;
    let student = ctx.student("Bart", "500006").await;

    for _ in 0..3 {
        let response = as_user(ctx.server.post("/api/infractions"), ctx.teacher.id)
            .json(&json!({
                "student_id": student.id,
                "violation_type": "tardy",
                "force_warning": true
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["kind"], "warning");
    }
}

#[tokio::test]
async fn test_reassign_requires_absent() {
    let ctx = TestContext::new().await;
    let first = ctx.slot(days_from_today(2), 1).await;
    let later = ctx.slot(days_from_today(4), 3).await;
    let student = ctx.student("Nelson", "500007").await;
    let violation = ctx
        .workflow
        .file_violation(
            ctx.teacher.id,
            conduct_core::models::violation::FileViolationRequest {
                student_id: student.id,
                violation_type: "fighting".to_string(),
                slot_id: Some(first.id),
            },
        )
        .await
        .unwrap();
    let path = format!("/api/violations/{}/reassign", violation.id);

    let response = as_user(ctx.server.post(&path), ctx.teacher.id).await;
    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "Invalid status transition: pending -> reassigned"
    );

    ctx.workflow
        .store()
        .set_violation_status(violation.id, ViolationStatus::Pending, ViolationStatus::Absent)
        .await
        .unwrap();
    let response = as_user(ctx.server.post(&path), ctx.teacher.id).await;
    response.assert_status_ok();
    let moved: Reassignment = response.json();
    assert_eq!(moved.violation.status, ViolationStatus::Reassigned);
    assert_eq!(moved.slot_id, later.id);
    assert_eq!(moved.new_date, later.date);
    assert_eq!(ctx.workflow.get_slot(first.id).await.unwrap().occupancy, 1);
    assert_eq!(ctx.workflow.get_slot(later.id).await.unwrap().occupancy, 1);
}
