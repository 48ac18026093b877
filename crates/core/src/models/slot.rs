use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_CAPACITY: i32 = 20;
pub const DEFAULT_LOCATION: &str = "Cafeteria";

/// A scheduled detention session.
///
/// `occupancy <= capacity` always holds; occupancy only moves through the
/// store's guarded seat operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetentionSlot {
    pub id: Uuid,
    pub date: NaiveDate,
    pub teacher_id: Uuid,
    pub location: String,
    pub capacity: i32,
    pub occupancy: i32,
    pub created_at: DateTime<Utc>,
}

impl DetentionSlot {
    pub fn has_capacity(&self) -> bool {
        self.open_seats() > 0
    }

    pub fn open_seats(&self) -> i32 {
        (self.capacity - self.occupancy).max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSlot {
    pub date: NaiveDate,
    pub teacher_id: Uuid,
    pub location: String,
    pub capacity: i32,
}

/// Admin scheduling of a slot on behalf of a teacher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    pub teacher_id: Uuid,
    pub date: NaiveDate,
    pub capacity: Option<i32>,
    pub location: Option<String>,
}

/// A teacher volunteering as detention monitor for a set of dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorSignupRequest {
    pub dates: Vec<NaiveDate>,
    pub capacity: Option<i32>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSlotRequest {
    pub capacity: Option<i32>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotQuery {
    /// Only future slots with free seats inside the booking window.
    #[serde(default)]
    pub available: bool,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub violation_id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub barcode: String,
    pub violation_type: String,
    pub status: super::violation::ViolationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotRosterResponse {
    pub slot: DetentionSlot,
    pub entries: Vec<RosterEntry>,
}
