use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::errors::{ConductError, ConductResult};

use super::warning::Warning;

/// Attendance lifecycle of a violation.
///
/// ```text
/// pending --> attended
/// pending --> absent --> reassigned
/// ```
///
/// Every edge is one-way. A record that is `absent` stays there when no
/// slot can take it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ViolationStatus {
    Pending,
    Attended,
    Absent,
    Reassigned,
}

impl ViolationStatus {
    pub fn can_transition_to(self, next: ViolationStatus) -> bool {
        use ViolationStatus::*;
        matches!(
            (self, next),
            (Pending, Attended) | (Pending, Absent) | (Absent, Reassigned)
        )
    }

    pub fn transition(self, next: ViolationStatus) -> ConductResult<ViolationStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ConductError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Whether the record still holds a seat it has not used.
    pub fn is_unresolved(self) -> bool {
        matches!(self, ViolationStatus::Pending | ViolationStatus::Reassigned)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub slot_id: Uuid,
    pub violation_type: String,
    pub assigned_date: DateTime<Utc>,
    pub detention_date: NaiveDate,
    pub status: ViolationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewViolation {
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub slot_id: Uuid,
    pub violation_type: String,
}

/// A direct violation filing bound to a slot the caller picked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileViolationRequest {
    pub student_id: Uuid,
    pub violation_type: String,
    pub slot_id: Option<Uuid>,
}

/// An infraction routed through the warning ledger first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordInfractionRequest {
    pub student_id: Uuid,
    pub violation_type: String,
    pub slot_id: Option<Uuid>,
    /// Record a warning even when the ledger threshold has been met.
    #[serde(default)]
    pub force_warning: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InfractionOutcome {
    Warning { warning: Warning },
    Violation { violation: ViolationRecord },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceMark {
    Attended,
    Absent,
}

impl From<AttendanceMark> for ViolationStatus {
    fn from(mark: AttendanceMark) -> Self {
        match mark {
            AttendanceMark::Attended => ViolationStatus::Attended,
            AttendanceMark::Absent => ViolationStatus::Absent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAttendanceRequest {
    pub status: AttendanceMark,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAttendanceRequest {
    pub violation_ids: Vec<Uuid>,
    pub status: AttendanceMark,
}

/// The result of moving a record to a new slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reassignment {
    pub violation: ViolationRecord,
    pub slot_id: Uuid,
    pub new_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceOutcome {
    pub violation: ViolationRecord,
    pub reassignment: Option<Reassignment>,
    /// Set when the record was marked absent but could not be moved.
    pub reassign_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAttendanceItem {
    pub violation_id: Uuid,
    pub status: Option<ViolationStatus>,
    pub new_date: Option<NaiveDate>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAttendanceResponse {
    pub succeeded: usize,
    pub failed: usize,
    pub items: Vec<BulkAttendanceItem>,
}
