use axum::http::StatusCode;
use conduct_core::models::{
    student::{ImportStudentsResponse, ParentAccount, Student, StudentRecordResponse},
    warning::StudentWarningsResponse,
};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{TestContext, as_user};

fn new_student(name: &str, barcode: &str) -> serde_json::Value {
    json!({
        "name": name,
        "email": format!("{}@school.test", name.to_lowercase()),
        "parent_email": "parent@home.test",
        "barcode": barcode,
        "grade": 11
    })
}

#[tokio::test]
async fn test_create_student() {
    let ctx = TestContext::new().await;

    let response = as_user(ctx.server.post("/api/students"), ctx.teacher.id)
        .json(&new_student("Lisa", "200001"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let student: Student = response.json();
    assert_eq!(student.name, "Lisa");
    assert_eq!(student.barcode, "200001");
    assert_eq!(student.parent_access_code.len(), 8);
    assert!(!student.parent_verified);
}

#[tokio::test]
async fn test_create_student_rejects_bad_barcode() {
    let ctx = TestContext::new().await;

    let response = as_user(ctx.server.post("/api/students"), ctx.teacher.id)
        .json(&new_student("Lisa", "12ab"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_barcode_conflicts() {
    let ctx = TestContext::new().await;
    ctx.student("Bart", "200002").await;

    let response = as_user(ctx.server.post("/api/students"), ctx.teacher.id)
        .json(&new_student("Milhouse", "200002"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_search_and_scan() {
    let ctx = TestContext::new().await;
    ctx.student("Martin Prince", "200003").await;
    ctx.student("Nelson Muntz", "200004").await;

    let response = as_user(ctx.server.get("/api/students"), ctx.teacher.id)
        .add_query_param("q", "MART")
        .await;
    response.assert_status_ok();
    let found: Vec<Student> = response.json();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Martin Prince");

    let response = as_user(ctx.server.get("/api/scan/200004"), ctx.teacher.id).await;
    response.assert_status_ok();
    let scanned: Student = response.json();
    assert_eq!(scanned.name, "Nelson Muntz");

    let response = as_user(ctx.server.get("/api/scan/999999"), ctx.teacher.id).await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = as_user(ctx.server.get("/api/scan/2000"), ctx.teacher.id).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_import_is_admin_only_and_reports_rows() {
    let ctx = TestContext::new().await;
    let payload = json!({
        "students": [
            new_student("Sherri", "300001"),
            new_student("Terri", "bad"),
            new_student("Wendell", "300003"),
        ]
    });

    let response = as_user(ctx.server.post("/api/students/import"), ctx.teacher.id)
        .json(&payload)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = as_user(ctx.server.post("/api/students/import"), ctx.admin.id)
        .json(&payload)
        .await;
    response.assert_status_ok();
    let result: ImportStudentsResponse = response.json();
    assert_eq!(result.imported, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(result.rows[1].row, 2);
    assert!(result.rows[1].error.is_some());
}

#[tokio::test]
async fn test_update_and_fetch_record() {
    let ctx = TestContext::new().await;
    let student = ctx.student("Ralph", "200005").await;

    let response = as_user(
        ctx.server.put(&format!("/api/students/{}", student.id)),
        ctx.teacher.id,
    )
    .json(&json!({ "grade": 12 }))
    .await;
    response.assert_status_ok();
    let updated: Student = response.json();
    assert_eq!(updated.grade, 12);
    assert_eq!(updated.name, "Ralph");

    let response = as_user(
        ctx.server.get(&format!("/api/students/{}", student.id)),
        ctx.teacher.id,
    )
    .await;
    response.assert_status_ok();
    let record: StudentRecordResponse = response.json();
    assert_eq!(record.student.grade, 12);
    assert!(record.violations.is_empty());
}

#[tokio::test]
async fn test_delete_student() {
    let ctx = TestContext::new().await;
    let student = ctx.student("Jimbo", "200006").await;
    let path = format!("/api/students/{}", student.id);

    as_user(ctx.server.delete(&path), ctx.teacher.id)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    as_user(ctx.server.delete(&path), ctx.admin.id)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    as_user(ctx.server.get(&path), ctx.teacher.id)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_regenerate_access_code() {
    let ctx = TestContext::new().await;
    let student = ctx.student("Kearney", "200007").await;
    let path = format!("/api/students/{}/access-code", student.id);

    as_user(ctx.server.post(&path), ctx.teacher.id)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = as_user(ctx.server.post(&path), ctx.admin.id).await;
    response.assert_status_ok();
    let account: ParentAccount = response.json();
    assert_eq!(account.student_id, student.id);
    assert_ne!(account.parent_access_code, student.parent_access_code);
    assert!(!account.parent_verified);
}

#[tokio::test]
async fn test_parent_email_and_accounts() {
    let ctx = TestContext::new().await;
    let student = ctx.student("Dolph", "200008").await;

    let response = as_user(
        ctx.server
            .put(&format!("/api/students/{}/parent-email", student.id)),
        ctx.teacher.id,
    )
    .json(&json!({ "parent_email": "mom@home.test" }))
    .await;
    response.assert_status_ok();

    let response = as_user(
        ctx.server
            .put(&format!("/api/students/{}/parent-email", student.id)),
        ctx.teacher.id,
    )
    .json(&json!({ "parent_email": "not an email" }))
    .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = as_user(ctx.server.get("/api/parents"), ctx.admin.id).await;
    response.assert_status_ok();
    let accounts: Vec<ParentAccount> = response.json();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].parent_email.as_deref(), Some("mom@home.test"));
}

#[tokio::test]
async fn test_student_warnings() {
    let ctx = TestContext::new().await;
    let student = ctx.student("Wendell", "200009").await;

    for _ in 0..2 {
        as_user(ctx.server.post("/api/infractions"), ctx.teacher.id)
            .json(&json!({ "student_id": student.id, "violation_type": "phone" }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = as_user(
        ctx.server.get(&format!("/api/students/{}/warnings", student.id)),
        ctx.teacher.id,
    )
    .await;
    response.assert_status_ok();
    let warnings: StudentWarningsResponse = response.json();
    assert_eq!(warnings.warnings.len(), 2);
    assert_eq!(warnings.counts[0].violation_type, "phone");
    assert_eq!(warnings.counts[0].count, 2);
    assert_eq!(warnings.counts[0].threshold, 2);
}
