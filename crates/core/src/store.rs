//! Store traits: the query/command interface the workflow runs against.
//!
//! Backends: [`memory::MemoryStore`] here, `PgStore` in `conduct-db`.
//! Slot occupancy is never set directly. It goes up only through the two
//! binding operations on [`ViolationStore`], which reserve a seat and write
//! the record as one unit, and down only when
//! [`StudentStore::delete_student`] gives a student's seats back.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    errors::ConductResult,
    models::{
        slot::{DetentionSlot, NewSlot},
        student::{NewStudent, Student, UpdateStudentRequest},
        teacher::{NewTeacher, StaffRole, Teacher},
        violation::{NewViolation, ViolationRecord, ViolationStatus},
        warning::{NewWarning, Warning},
    },
};

#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Fails with `Conflict` when the barcode is already taken.
    async fn insert_student(&self, student: NewStudent) -> ConductResult<Student>;

    async fn get_student(&self, id: Uuid) -> ConductResult<Option<Student>>;

    async fn get_student_by_barcode(&self, barcode: &str) -> ConductResult<Option<Student>>;

    /// Codes are stored upper-case; callers normalise before lookup.
    async fn get_student_by_access_code(&self, code: &str) -> ConductResult<Option<Student>>;

    /// Case-insensitive substring match on name, ordered by name.
    async fn search_students(&self, query: &str, limit: usize) -> ConductResult<Vec<Student>>;

    async fn list_students(&self) -> ConductResult<Vec<Student>>;

    async fn update_student(
        &self,
        id: Uuid,
        changes: UpdateStudentRequest,
    ) -> ConductResult<Option<Student>>;

    /// Replaces the access code and clears the verification state.
    async fn set_access_code(&self, id: Uuid, code: &str) -> ConductResult<Option<Student>>;

    /// Records the first verification; later calls keep the original timestamp.
    async fn mark_parent_verified(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> ConductResult<Option<Student>>;

    /// Releases the seats held by the student's unresolved violations, then
    /// deletes the student together with its violations and warnings.
    async fn delete_student(&self, id: Uuid) -> ConductResult<bool>;
}

#[async_trait]
pub trait TeacherStore: Send + Sync {
    async fn insert_teacher(&self, teacher: NewTeacher) -> ConductResult<Teacher>;

    async fn get_teacher(&self, id: Uuid) -> ConductResult<Option<Teacher>>;

    async fn list_teachers(&self) -> ConductResult<Vec<Teacher>>;

    async fn set_teacher_approval(&self, id: Uuid, approved: bool)
    -> ConductResult<Option<Teacher>>;

    async fn set_teacher_role(&self, id: Uuid, role: StaffRole) -> ConductResult<Option<Teacher>>;
}

#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn insert_slot(&self, slot: NewSlot) -> ConductResult<DetentionSlot>;

    async fn get_slot(&self, id: Uuid) -> ConductResult<Option<DetentionSlot>>;

    /// All slots in the inclusive date range, ordered by date.
    async fn list_slots(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ConductResult<Vec<DetentionSlot>>;

    /// Slots strictly after `after` (and no later than `until`) that still
    /// have a free seat, earliest first.
    async fn open_slots_after(
        &self,
        after: NaiveDate,
        until: Option<NaiveDate>,
    ) -> ConductResult<Vec<DetentionSlot>>;

    /// Fails with `Validation` if the new capacity is below current occupancy.
    async fn update_slot(
        &self,
        id: Uuid,
        capacity: Option<i32>,
        location: Option<String>,
    ) -> ConductResult<Option<DetentionSlot>>;

    /// Fails with `Conflict` while any seat is taken.
    async fn delete_slot(&self, id: Uuid) -> ConductResult<bool>;
}

#[async_trait]
pub trait ViolationStore: Send + Sync {
    /// Reserves a seat in `violation.slot_id` and inserts a `pending` record
    /// in one unit. `Ok(None)` when the slot is full; nothing is written.
    async fn bind_violation(&self, violation: NewViolation)
    -> ConductResult<Option<ViolationRecord>>;

    /// Moves an `absent` record to `slot_id`: reserves a seat there and sets
    /// the detention date and `reassigned` status in one unit. `Ok(None)`
    /// when the slot is full. The old slot keeps its seat.
    async fn rebind_violation(
        &self,
        id: Uuid,
        slot_id: Uuid,
    ) -> ConductResult<Option<ViolationRecord>>;

    async fn get_violation(&self, id: Uuid) -> ConductResult<Option<ViolationRecord>>;

    async fn list_violations_for_student(
        &self,
        student_id: Uuid,
    ) -> ConductResult<Vec<ViolationRecord>>;

    async fn list_violations_for_slot(&self, slot_id: Uuid)
    -> ConductResult<Vec<ViolationRecord>>;

    /// Records created within `[start, end]`.
    async fn list_violations_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ConductResult<Vec<ViolationRecord>>;

    /// Compare-and-set on status. `Ok(None)` if the record is no longer in
    /// `expected`.
    async fn set_violation_status(
        &self,
        id: Uuid,
        expected: ViolationStatus,
        next: ViolationStatus,
    ) -> ConductResult<Option<ViolationRecord>>;
}

#[async_trait]
pub trait WarningStore: Send + Sync {
    async fn insert_warning(&self, warning: NewWarning) -> ConductResult<Warning>;

    /// Inserts only while fewer than `threshold` warnings of the same type
    /// exist for the student. The count and insert are serialised per
    /// (student, type).
    async fn insert_warning_below(
        &self,
        warning: NewWarning,
        threshold: usize,
    ) -> ConductResult<Option<Warning>>;

    async fn count_warnings(&self, student_id: Uuid, violation_type: &str) -> ConductResult<usize>;

    /// Newest first.
    async fn list_warnings(&self, student_id: Uuid) -> ConductResult<Vec<Warning>>;
}

/// Everything the workflow needs from a backend.
pub trait Store: StudentStore + TeacherStore + SlotStore + ViolationStore + WarningStore {}

impl<T> Store for T where T: StudentStore + TeacherStore + SlotStore + ViolationStore + WarningStore
{}
