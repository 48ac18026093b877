use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{violation::ViolationRecord, warning::Warning};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub parent_email: Option<String>,
    pub barcode: String,
    pub grade: i32,
    pub parent_access_code: String,
    pub parent_verified: bool,
    pub parent_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fields for a student row that has not been persisted yet.
///
/// The access code is generated by the caller so that the in-memory and
/// PostgreSQL stores share one code format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub parent_email: Option<String>,
    pub barcode: String,
    pub grade: i32,
    pub parent_access_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
    pub email: String,
    pub parent_email: Option<String>,
    pub barcode: String,
    pub grade: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub parent_email: Option<String>,
    pub barcode: Option<String>,
    pub grade: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportStudentsRequest {
    pub students: Vec<CreateStudentRequest>,
}

/// Outcome of one row of a bulk import. Rows are independent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRowResult {
    pub row: usize,
    pub barcode: String,
    pub student_id: Option<Uuid>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportStudentsResponse {
    pub imported: usize,
    pub failed: usize,
    pub rows: Vec<ImportRowResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyAccessCodeRequest {
    pub code: String,
}

/// What a parent sees after presenting a valid access code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecordResponse {
    pub student: Student,
    pub violations: Vec<ViolationRecord>,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentAccount {
    pub student_id: Uuid,
    pub student_name: String,
    pub parent_email: Option<String>,
    pub parent_access_code: String,
    pub parent_verified: bool,
    pub parent_verified_at: Option<DateTime<Utc>>,
}

impl From<Student> for ParentAccount {
    fn from(student: Student) -> Self {
        Self {
            student_id: student.id,
            student_name: student.name,
            parent_email: student.parent_email,
            parent_access_code: student.parent_access_code,
            parent_verified: student.parent_verified,
            parent_verified_at: student.parent_verified_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateParentEmailRequest {
    pub parent_email: String,
}
