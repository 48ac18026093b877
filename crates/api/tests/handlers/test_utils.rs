use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use chrono::{Days, NaiveDate};
use conduct_api::{ApiState, middleware::auth::USER_ID_HEADER};
use conduct_core::{
    Workflow,
    models::{
        slot::{CreateSlotRequest, DetentionSlot},
        student::{CreateStudentRequest, Student},
        teacher::{NewTeacher, StaffRole, Teacher},
    },
    notify::RecordingNotifier,
    policy::{FixedClock, Policy},
    store::{TeacherStore, memory::MemoryStore},
};
use uuid::Uuid;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

pub fn days_from_today(days: u64) -> NaiveDate {
    today().checked_add_days(Days::new(days)).unwrap()
}

/// An API served over the in-memory store with one approved admin and one
/// approved teacher already on staff.
pub struct TestContext {
    pub server: TestServer,
    pub workflow: Workflow,
    pub notifier: Arc<RecordingNotifier>,
    pub admin: Teacher,
    pub teacher: Teacher,
}

impl TestContext {
    pub async fn new() -> Self {
        let notifier = Arc::new(RecordingNotifier::new());
        let workflow = Workflow::new(
            Arc::new(MemoryStore::new()),
            notifier.clone(),
            Arc::new(FixedClock::new(today())),
            Policy::default(),
        );

        let admin = seed_teacher(&workflow, "Principal Skinner", StaffRole::Admin, true).await;
        let teacher = seed_teacher(&workflow, "Edna Krabappel", StaffRole::Teacher, true).await;

        let state = Arc::new(ApiState {
            workflow: workflow.clone(),
        });
        let server = TestServer::new(conduct_api::app(state)).unwrap();

        Self {
            server,
            workflow,
            notifier,
            admin,
            teacher,
        }
    }

    pub async fn seed_teacher(&self, name: &str, role: StaffRole, approved: bool) -> Teacher {
        seed_teacher(&self.workflow, name, role, approved).await
    }

    pub async fn student(&self, name: &str, barcode: &str) -> Student {
        self.workflow
            .create_student(CreateStudentRequest {
                name: name.to_string(),
                email: format!("{}@school.test", name.to_lowercase().replace(' ', ".")),
                parent_email: Some("parent@home.test".to_string()),
                barcode: barcode.to_string(),
                grade: 10,
            })
            .await
            .unwrap()
    }

    pub async fn slot(&self, date: NaiveDate, capacity: i32) -> DetentionSlot {
        self.workflow
            .schedule_slot(CreateSlotRequest {
                teacher_id: self.teacher.id,
                date,
                capacity: Some(capacity),
                location: Some("Room 204".to_string()),
            })
            .await
            .unwrap()
    }
}

async fn seed_teacher(workflow: &Workflow, name: &str, role: StaffRole, approved: bool) -> Teacher {
    workflow
        .store()
        .insert_teacher(NewTeacher {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@school.test", name.to_lowercase().replace(' ', ".")),
            role,
            is_approved: approved,
        })
        .await
        .unwrap()
}

/// Attaches the gateway identity header.
pub fn as_user(request: TestRequest, id: Uuid) -> TestRequest {
    request.add_header(
        HeaderName::from_static(USER_ID_HEADER),
        HeaderValue::from_str(&id.to_string()).unwrap(),
    )
}
