use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StaffRole {
    Teacher,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: StaffRole,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl Teacher {
    pub fn is_admin(&self) -> bool {
        self.role == StaffRole::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTeacher {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: StaffRole,
    pub is_approved: bool,
}

/// Self-registration after the hosting platform has authenticated the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterTeacherRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherApprovalRequest {
    pub approved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: StaffRole,
}
