use axum::http::StatusCode;
use conduct_core::models::slot::{DetentionSlot, SlotRosterResponse};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{TestContext, as_user, days_from_today, today};

#[tokio::test]
async fn test_schedule_slot_is_admin_only() {
    let ctx = TestContext::new().await;
    let payload = json!({ "teacher_id": ctx.teacher.id, "date": days_from_today(3) });

    as_user(ctx.server.post("/api/slots"), ctx.teacher.id)
        .json(&payload)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = as_user(ctx.server.post("/api/slots"), ctx.admin.id)
        .json(&payload)
        .await;
    response.assert_status(StatusCode::CREATED);
    let slot: DetentionSlot = response.json();
    assert_eq!(slot.teacher_id, ctx.teacher.id);
    assert_eq!(slot.capacity, 20);
    assert_eq!(slot.occupancy, 0);
    assert_eq!(slot.location, "Cafeteria");
}

#[tokio::test]
async fn test_schedule_slot_rejects_today() {
    let ctx = TestContext::new().await;

    let response = as_user(ctx.server.post("/api/slots"), ctx.admin.id)
        .json(&json!({ "teacher_id": ctx.teacher.id, "date": today() }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_monitor_signup() {
    let ctx = TestContext::new().await;
    ctx.slot(days_from_today(2), 5).await;

    let response = as_user(ctx.server.post("/api/monitor-signups"), ctx.teacher.id)
        .json(&json!({ "dates": [days_from_today(4), days_from_today(5)], "location": "Library" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let slots: Vec<DetentionSlot> = response.json();
    assert_eq!(slots.len(), 2);
    assert!(slots.iter().all(|slot| slot.location == "Library"));

    let response = as_user(ctx.server.post("/api/monitor-signups"), ctx.admin.id)
        .json(&json!({ "dates": [days_from_today(2), days_from_today(6)] }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_available_filter() {
    let ctx = TestContext::new().await;
    let open = ctx.slot(days_from_today(2), 5).await;
    ctx.slot(days_from_today(30), 5).await;

    let response = as_user(ctx.server.get("/api/slots"), ctx.teacher.id)
        .add_query_param("available", "true")
        .await;
    response.assert_status_ok();
    let slots: Vec<DetentionSlot> = response.json();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].id, open.id);

    let response = as_user(ctx.server.get("/api/slots"), ctx.teacher.id).await;
    let slots: Vec<DetentionSlot> = response.json();
    assert_eq!(slots.len(), 2);
}

#[tokio::test]
async fn test_update_slot_capacity_floor() {
    let ctx = TestContext::new().await;
    let slot = ctx.slot(days_from_today(2), 2).await;
    let student = ctx.student("Rod", "400001").await;
    as_user(ctx.server.post("/api/violations"), ctx.teacher.id)
        .json(&json!({ "student_id": student.id, "violation_type": "tardy", "slot_id": slot.id }))
        .await
        .assert_status(StatusCode::CREATED);

    let path = format!("/api/slots/{}", slot.id);
    as_user(ctx.server.put(&path), ctx.admin.id)
        .json(&json!({ "capacity": 0 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = as_user(ctx.server.put(&path), ctx.admin.id)
        .json(&json!({ "capacity": 8, "location": "Gym" }))
        .await;
    response.assert_status_ok();
    let updated: DetentionSlot = response.json();
    assert_eq!(updated.capacity, 8);
    assert_eq!(updated.location, "Gym");
    assert_eq!(updated.occupancy, 1);
}

#[tokio::test]
async fn test_delete_slot_requires_empty() {
    let ctx = TestContext::new().await;
    let busy = ctx.slot(days_from_today(2), 2).await;
    let empty = ctx.slot(days_from_today(3), 2).await;
    let student = ctx.student("Todd", "400002").await;
    as_user(ctx.server.post("/api/violations"), ctx.teacher.id)
        .json(&json!({ "student_id": student.id, "violation_type": "tardy", "slot_id": busy.id }))
        .await
        .assert_status(StatusCode::CREATED);

    as_user(ctx.server.delete(&format!("/api/slots/{}", busy.id)), ctx.admin.id)
        .await
        .assert_status(StatusCode::CONFLICT);
    as_user(ctx.server.delete(&format!("/api/slots/{}", empty.id)), ctx.admin.id)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    as_user(ctx.server.get(&format!("/api/slots/{}", empty.id)), ctx.teacher.id)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_slot_roster() {
    let ctx = TestContext::new().await;
    let slot = ctx.slot(days_from_today(2), 5).await;
    for (name, barcode) in [("Uter", "400003"), ("Lewis", "400004")] {
        let student = ctx.student(name, barcode).await;
        as_user(ctx.server.post("/api/violations"), ctx.teacher.id)
            .json(&json!({ "student_id": student.id, "violation_type": "gum", "slot_id": slot.id }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = as_user(
        ctx.server.get(&format!("/api/slots/{}/roster", slot.id)),
        ctx.teacher.id,
    )
    .await;
    response.assert_status_ok();
    let roster: SlotRosterResponse = response.json();
    assert_eq!(roster.slot.occupancy, 2);
    let names: Vec<&str> = roster
        .entries
        .iter()
        .map(|entry| entry.student_name.as_str())
        .collect();
    assert_eq!(names, vec!["Lewis", "Uter"]);
}
