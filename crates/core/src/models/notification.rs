use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub name: String,
    pub email: String,
}

/// Sent to the student and parent when a violation is bound to a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetentionAssigned {
    pub violation_id: Uuid,
    pub student_name: String,
    pub student_email: String,
    pub parent_email: Option<String>,
    /// Present only while the parent has not verified portal access.
    pub parent_access_code: Option<String>,
    pub teacher: Recipient,
    pub violation_type: String,
    pub assigned_date: NaiveDate,
    pub detention_date: NaiveDate,
    pub location: String,
}

/// Sent to the student and the issuing teacher after a missed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetentionRescheduled {
    pub violation_id: Uuid,
    pub student_name: String,
    pub student_email: String,
    pub teacher: Recipient,
    pub violation_type: String,
    pub new_date: NaiveDate,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSignup {
    pub teacher: Recipient,
    pub dates: Vec<NaiveDate>,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorReminder {
    pub teacher: Recipient,
    pub date: NaiveDate,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherStatusChanged {
    pub teacher: Recipient,
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationEvent {
    DetentionAssigned(DetentionAssigned),
    DetentionRescheduled(DetentionRescheduled),
    MonitorSignup(MonitorSignup),
    MonitorReminder(MonitorReminder),
    TeacherStatusChanged(TeacherStatusChanged),
}

impl NotificationEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationEvent::DetentionAssigned(_) => "detention_assigned",
            NotificationEvent::DetentionRescheduled(_) => "detention_rescheduled",
            NotificationEvent::MonitorSignup(_) => "monitor_signup",
            NotificationEvent::MonitorReminder(_) => "monitor_reminder",
            NotificationEvent::TeacherStatusChanged(_) => "teacher_status_changed",
        }
    }
}
