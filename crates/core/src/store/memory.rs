//! In-process store backed by a single mutex.
//!
//! Every trait method runs inside one critical section, which gives the
//! binding operations the same all-or-nothing behaviour as a PostgreSQL
//! transaction. Used by tests and by local runs without a database.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use eyre::eyre;
use uuid::Uuid;

use crate::{
    errors::{ConductError, ConductResult},
    models::{
        slot::{DetentionSlot, NewSlot},
        student::{NewStudent, Student, UpdateStudentRequest},
        teacher::{NewTeacher, StaffRole, Teacher},
        violation::{NewViolation, ViolationRecord, ViolationStatus},
        warning::{NewWarning, Warning},
    },
};

use super::{SlotStore, StudentStore, TeacherStore, ViolationStore, WarningStore};

#[derive(Debug, Default)]
struct MemoryState {
    students: HashMap<Uuid, Student>,
    teachers: HashMap<Uuid, Teacher>,
    slots: HashMap<Uuid, DetentionSlot>,
    violations: HashMap<Uuid, ViolationRecord>,
    warnings: Vec<Warning>,
}

impl MemoryState {
    fn barcode_taken(&self, barcode: &str, except: Option<Uuid>) -> bool {
        self.students
            .values()
            .any(|s| s.barcode == barcode && Some(s.id) != except)
    }

    fn access_code_taken(&self, code: &str, except: Option<Uuid>) -> bool {
        self.students
            .values()
            .any(|s| s.parent_access_code == code && Some(s.id) != except)
    }

    /// The one place slot occupancy goes up.
    fn reserve(&mut self, slot_id: Uuid) -> ConductResult<Option<DetentionSlot>> {
        let slot = self
            .slots
            .get_mut(&slot_id)
            .ok_or_else(|| ConductError::NotFound(format!("Detention slot {} not found", slot_id)))?;
        if !slot.has_capacity() {
            return Ok(None);
        }
        slot.occupancy += 1;
        Ok(Some(slot.clone()))
    }

    /// The one place slot occupancy goes down.
    fn release(&mut self, slot_id: Uuid) -> ConductResult<Option<DetentionSlot>> {
        let slot = self
            .slots
            .get_mut(&slot_id)
            .ok_or_else(|| ConductError::NotFound(format!("Detention slot {} not found", slot_id)))?;
        if slot.occupancy == 0 {
            return Ok(None);
        }
        slot.occupancy -= 1;
        Ok(Some(slot.clone()))
    }
}

fn access_code_collision() -> ConductError {
    ConductError::Conflict("Access code collision, try again".to_string())
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> ConductResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| ConductError::Persistence(eyre!("memory store lock poisoned")))
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn insert_student(&self, student: NewStudent) -> ConductResult<Student> {
        let mut state = self.state()?;
        if state.barcode_taken(&student.barcode, None) {
            return Err(ConductError::Conflict(format!(
                "Barcode {} is already assigned",
                student.barcode
            )));
        }
        if state.access_code_taken(&student.parent_access_code, None) {
            return Err(access_code_collision());
        }
        let row = Student {
            id: Uuid::new_v4(),
            name: student.name,
            email: student.email,
            parent_email: student.parent_email,
            barcode: student.barcode,
            grade: student.grade,
            parent_access_code: student.parent_access_code,
            parent_verified: false,
            parent_verified_at: None,
            created_at: Utc::now(),
        };
        state.students.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_student(&self, id: Uuid) -> ConductResult<Option<Student>> {
        Ok(self.state()?.students.get(&id).cloned())
    }

    async fn get_student_by_barcode(&self, barcode: &str) -> ConductResult<Option<Student>> {
        Ok(self
            .state()?
            .students
            .values()
            .find(|s| s.barcode == barcode)
            .cloned())
    }

    async fn get_student_by_access_code(&self, code: &str) -> ConductResult<Option<Student>> {
        Ok(self
            .state()?
            .students
            .values()
            .find(|s| s.parent_access_code == code)
            .cloned())
    }

    async fn search_students(&self, query: &str, limit: usize) -> ConductResult<Vec<Student>> {
        let needle = query.to_lowercase();
        let mut found: Vec<Student> = self
            .state()?
            .students
            .values()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found.truncate(limit);
        Ok(found)
    }

    async fn list_students(&self) -> ConductResult<Vec<Student>> {
        let mut all: Vec<Student> = self.state()?.students.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn update_student(
        &self,
        id: Uuid,
        changes: UpdateStudentRequest,
    ) -> ConductResult<Option<Student>> {
        let mut state = self.state()?;
        if let Some(barcode) = &changes.barcode {
            if state.barcode_taken(barcode, Some(id)) {
                return Err(ConductError::Conflict(format!(
                    "Barcode {} is already assigned",
                    barcode
                )));
            }
        }
        let Some(student) = state.students.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            student.name = name;
        }
        if let Some(email) = changes.email {
            student.email = email;
        }
        if let Some(parent_email) = changes.parent_email {
            student.parent_email = Some(parent_email);
        }
        if let Some(barcode) = changes.barcode {
            student.barcode = barcode;
        }
        if let Some(grade) = changes.grade {
            student.grade = grade;
        }
        Ok(Some(student.clone()))
    }

    async fn set_access_code(&self, id: Uuid, code: &str) -> ConductResult<Option<Student>> {
        let mut state = self.state()?;
        if state.access_code_taken(code, Some(id)) {
            return Err(access_code_collision());
        }
        Ok(state.students.get_mut(&id).map(|student| {
            student.parent_access_code = code.to_string();
            student.parent_verified = false;
            student.parent_verified_at = None;
            student.clone()
        }))
    }

    async fn mark_parent_verified(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> ConductResult<Option<Student>> {
        let mut state = self.state()?;
        Ok(state.students.get_mut(&id).map(|student| {
            if !student.parent_verified {
                student.parent_verified = true;
                student.parent_verified_at = Some(at);
            }
            student.clone()
        }))
    }

    async fn delete_student(&self, id: Uuid) -> ConductResult<bool> {
        let mut state = self.state()?;
        if !state.students.contains_key(&id) {
            return Ok(false);
        }
        let held: Vec<Uuid> = state
            .violations
            .values()
            .filter(|v| v.student_id == id && v.status.is_unresolved())
            .map(|v| v.slot_id)
            .collect();
        for slot_id in held {
            state.release(slot_id)?;
        }
        state.violations.retain(|_, v| v.student_id != id);
        state.warnings.retain(|w| w.student_id != id);
        state.students.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl TeacherStore for MemoryStore {
    async fn insert_teacher(&self, teacher: NewTeacher) -> ConductResult<Teacher> {
        let mut state = self.state()?;
        if state.teachers.contains_key(&teacher.id) {
            return Err(ConductError::Conflict(format!(
                "Teacher {} is already registered",
                teacher.id
            )));
        }
        let row = Teacher {
            id: teacher.id,
            name: teacher.name,
            email: teacher.email,
            role: teacher.role,
            is_approved: teacher.is_approved,
            created_at: Utc::now(),
        };
        state.teachers.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_teacher(&self, id: Uuid) -> ConductResult<Option<Teacher>> {
        Ok(self.state()?.teachers.get(&id).cloned())
    }

    async fn list_teachers(&self) -> ConductResult<Vec<Teacher>> {
        let mut all: Vec<Teacher> = self.state()?.teachers.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn set_teacher_approval(
        &self,
        id: Uuid,
        approved: bool,
    ) -> ConductResult<Option<Teacher>> {
        let mut state = self.state()?;
        Ok(state.teachers.get_mut(&id).map(|teacher| {
            teacher.is_approved = approved;
            teacher.clone()
        }))
    }

    async fn set_teacher_role(&self, id: Uuid, role: StaffRole) -> ConductResult<Option<Teacher>> {
        let mut state = self.state()?;
        Ok(state.teachers.get_mut(&id).map(|teacher| {
            teacher.role = role;
            teacher.clone()
        }))
    }
}

fn by_date(slots: &mut [DetentionSlot]) {
    slots.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
}

#[async_trait]
impl SlotStore for MemoryStore {
    async fn insert_slot(&self, slot: NewSlot) -> ConductResult<DetentionSlot> {
        let row = DetentionSlot {
            id: Uuid::new_v4(),
            date: slot.date,
            teacher_id: slot.teacher_id,
            location: slot.location,
            capacity: slot.capacity,
            occupancy: 0,
            created_at: Utc::now(),
        };
        self.state()?.slots.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_slot(&self, id: Uuid) -> ConductResult<Option<DetentionSlot>> {
        Ok(self.state()?.slots.get(&id).cloned())
    }

    async fn list_slots(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ConductResult<Vec<DetentionSlot>> {
        let mut slots: Vec<DetentionSlot> = self
            .state()?
            .slots
            .values()
            .filter(|s| from.is_none_or(|from| s.date >= from))
            .filter(|s| to.is_none_or(|to| s.date <= to))
            .cloned()
            .collect();
        by_date(&mut slots);
        Ok(slots)
    }

    async fn open_slots_after(
        &self,
        after: NaiveDate,
        until: Option<NaiveDate>,
    ) -> ConductResult<Vec<DetentionSlot>> {
        let mut slots: Vec<DetentionSlot> = self
            .state()?
            .slots
            .values()
            .filter(|s| s.date > after && s.has_capacity())
            .filter(|s| until.is_none_or(|until| s.date <= until))
            .cloned()
            .collect();
        by_date(&mut slots);
        Ok(slots)
    }

    async fn update_slot(
        &self,
        id: Uuid,
        capacity: Option<i32>,
        location: Option<String>,
    ) -> ConductResult<Option<DetentionSlot>> {
        let mut state = self.state()?;
        let Some(slot) = state.slots.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(capacity) = capacity {
            if capacity < slot.occupancy {
                return Err(ConductError::Validation(format!(
                    "Capacity {} is below the {} students already assigned",
                    capacity, slot.occupancy
                )));
            }
            slot.capacity = capacity;
        }
        if let Some(location) = location {
            slot.location = location;
        }
        Ok(Some(slot.clone()))
    }

    async fn delete_slot(&self, id: Uuid) -> ConductResult<bool> {
        let mut state = self.state()?;
        match state.slots.get(&id) {
            None => Ok(false),
            Some(slot) if slot.occupancy > 0 => Err(ConductError::Conflict(
                "Cannot delete slot with assigned students".to_string(),
            )),
            Some(_) => {
                state.slots.remove(&id);
                Ok(true)
            }
        }
    }
}

#[async_trait]
impl ViolationStore for MemoryStore {
    async fn bind_violation(
        &self,
        violation: NewViolation,
    ) -> ConductResult<Option<ViolationRecord>> {
        let mut state = self.state()?;
        let Some(slot) = state.reserve(violation.slot_id)? else {
            return Ok(None);
        };
        let now = Utc::now();
        let row = ViolationRecord {
            id: Uuid::new_v4(),
            student_id: violation.student_id,
            teacher_id: violation.teacher_id,
            slot_id: slot.id,
            violation_type: violation.violation_type,
            assigned_date: now,
            detention_date: slot.date,
            status: ViolationStatus::Pending,
            created_at: now,
        };
        state.violations.insert(row.id, row.clone());
        Ok(Some(row))
    }

    async fn rebind_violation(
        &self,
        id: Uuid,
        slot_id: Uuid,
    ) -> ConductResult<Option<ViolationRecord>> {
        let mut state = self.state()?;
        let (status, current_slot) = state
            .violations
            .get(&id)
            .map(|v| (v.status, v.slot_id))
            .ok_or_else(|| ConductError::NotFound(format!("Violation {} not found", id)))?;
        let next = status.transition(ViolationStatus::Reassigned)?;
        if current_slot == slot_id {
            return Err(ConductError::Validation(format!(
                "Violation {} is already booked into that slot",
                id
            )));
        }
        let Some(slot) = state.reserve(slot_id)? else {
            return Ok(None);
        };
        let record = state
            .violations
            .get_mut(&id)
            .ok_or_else(|| ConductError::NotFound(format!("Violation {} not found", id)))?;
        record.slot_id = slot.id;
        record.detention_date = slot.date;
        record.status = next;
        Ok(Some(record.clone()))
    }

    async fn get_violation(&self, id: Uuid) -> ConductResult<Option<ViolationRecord>> {
        Ok(self.state()?.violations.get(&id).cloned())
    }

    async fn list_violations_for_student(
        &self,
        student_id: Uuid,
    ) -> ConductResult<Vec<ViolationRecord>> {
        let mut rows: Vec<ViolationRecord> = self
            .state()?
            .violations
            .values()
            .filter(|v| v.student_id == student_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_violations_for_slot(
        &self,
        slot_id: Uuid,
    ) -> ConductResult<Vec<ViolationRecord>> {
        let mut rows: Vec<ViolationRecord> = self
            .state()?
            .violations
            .values()
            .filter(|v| v.slot_id == slot_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn list_violations_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ConductResult<Vec<ViolationRecord>> {
        let mut rows: Vec<ViolationRecord> = self
            .state()?
            .violations
            .values()
            .filter(|v| v.created_at >= start && v.created_at <= end)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn set_violation_status(
        &self,
        id: Uuid,
        expected: ViolationStatus,
        next: ViolationStatus,
    ) -> ConductResult<Option<ViolationRecord>> {
        let mut state = self.state()?;
        Ok(state
            .violations
            .get_mut(&id)
            .filter(|v| v.status == expected)
            .map(|v| {
                v.status = next;
                v.clone()
            }))
    }
}

#[async_trait]
impl WarningStore for MemoryStore {
    async fn insert_warning(&self, warning: NewWarning) -> ConductResult<Warning> {
        let row = Warning {
            id: Uuid::new_v4(),
            student_id: warning.student_id,
            teacher_id: warning.teacher_id,
            violation_type: warning.violation_type,
            issued_date: Utc::now(),
        };
        self.state()?.warnings.push(row.clone());
        Ok(row)
    }

    async fn insert_warning_below(
        &self,
        warning: NewWarning,
        threshold: usize,
    ) -> ConductResult<Option<Warning>> {
        let mut state = self.state()?;
        let existing = state
            .warnings
            .iter()
            .filter(|w| {
                w.student_id == warning.student_id && w.violation_type == warning.violation_type
            })
            .count();
        if existing >= threshold {
            return Ok(None);
        }
        let row = Warning {
            id: Uuid::new_v4(),
            student_id: warning.student_id,
            teacher_id: warning.teacher_id,
            violation_type: warning.violation_type,
            issued_date: Utc::now(),
        };
        state.warnings.push(row.clone());
        Ok(Some(row))
    }

    async fn count_warnings(&self, student_id: Uuid, violation_type: &str) -> ConductResult<usize> {
        Ok(self
            .state()?
            .warnings
            .iter()
            .filter(|w| w.student_id == student_id && w.violation_type == violation_type)
            .count())
    }

    async fn list_warnings(&self, student_id: Uuid) -> ConductResult<Vec<Warning>> {
        let mut rows: Vec<Warning> = self
            .state()?
            .warnings
            .iter()
            .filter(|w| w.student_id == student_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.issued_date.cmp(&a.issued_date));
        Ok(rows)
    }
}
