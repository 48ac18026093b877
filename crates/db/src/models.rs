//! Row types as they come out of PostgreSQL, and their domain conversions.
//!
//! Enum columns are stored as lowercase text; a value the domain does not
//! know is a persistence error, not a panic.

use chrono::{DateTime, NaiveDate, Utc};
use conduct_core::models::{
    slot::DetentionSlot,
    student::Student,
    teacher::{StaffRole, Teacher},
    violation::{ViolationRecord, ViolationStatus},
    warning::Warning,
};
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStudent {
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

impl From<DbStudent> for Student {
    fn from(row: DbStudent) -> Self {
        Student {
            id: row.id,
            name: row.name,
            email: row.email,
            parent_email: row.parent_email,
            barcode: row.barcode,
            grade: row.grade,
            parent_access_code: row.parent_access_code,
            parent_verified: row.parent_verified,
            parent_verified_at: row.parent_verified_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeacher {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbTeacher> for Teacher {
    type Error = eyre::Report;

    fn try_from(row: DbTeacher) -> Result<Self> {
        let role = row
            .role
            .parse::<StaffRole>()
            .map_err(|_| eyre!("Unknown staff role '{}' for teacher {}", row.role, row.id))?;
        Ok(Teacher {
            id: row.id,
            name: row.name,
            email: row.email,
            role,
            is_approved: row.is_approved,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: Uuid,
    pub date: NaiveDate,
    pub teacher_id: Uuid,
    pub location: String,
    pub capacity: i32,
    pub occupancy: i32,
    pub created_at: DateTime<Utc>,
}

impl From<DbSlot> for DetentionSlot {
    fn from(row: DbSlot) -> Self {
        DetentionSlot {
            id: row.id,
            date: row.date,
            teacher_id: row.teacher_id,
            location: row.location,
            capacity: row.capacity,
            occupancy: row.occupancy,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbViolation {
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub slot_id: Uuid,
    pub violation_type: String,
    pub assigned_date: DateTime<Utc>,
    pub detention_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbViolation> for ViolationRecord {
    type Error = eyre::Report;

    fn try_from(row: DbViolation) -> Result<Self> {
        let status = row
            .status
            .parse::<ViolationStatus>()
            .map_err(|_| eyre!("Unknown status '{}' for violation {}", row.status, row.id))?;
        Ok(ViolationRecord {
            id: row.id,
            student_id: row.student_id,
            teacher_id: row.teacher_id,
            slot_id: row.slot_id,
            violation_type: row.violation_type,
            assigned_date: row.assigned_date,
            detention_date: row.detention_date,
            status,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWarning {
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub violation_type: String,
    pub issued_date: DateTime<Utc>,
}

impl From<DbWarning> for Warning {
    fn from(row: DbWarning) -> Self {
        Warning {
            id: row.id,
            student_id: row.student_id,
            teacher_id: row.teacher_id,
            violation_type: row.violation_type,
            issued_date: row.issued_date,
        }
    }
}
