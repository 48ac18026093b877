//! [`PgStore`]: the PostgreSQL backend for the workflow's store traits.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use conduct_core::{
    errors::{ConductError, ConductResult},
    models::{
        slot::{DetentionSlot, NewSlot},
        student::{NewStudent, Student, UpdateStudentRequest},
        teacher::{NewTeacher, StaffRole, Teacher},
        violation::{NewViolation, ViolationRecord, ViolationStatus},
        warning::{NewWarning, Warning},
    },
    store::{SlotStore, StudentStore, TeacherStore, ViolationStore, WarningStore},
};
use eyre::Report;

use crate::{
    DbPool,
    models::{DbTeacher, DbViolation},
    repositories::{
        slot, student, teacher,
        violation::{self, Rebind},
        warning,
    },
};
use uuid::Uuid;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

const ACCESS_CODE_KEY: &str = "students_parent_access_code_key";

/// Name of the unique constraint the statement tripped, if it tripped one.
fn violated_unique_key(report: &Report) -> Option<String> {
    report
        .downcast_ref::<sqlx::Error>()
        .and_then(|err| err.as_database_error())
        .filter(|err| err.is_unique_violation())
        .map(|err| err.constraint().unwrap_or_default().to_string())
}

/// Unique-key failures become `Conflict`; everything else stays a
/// persistence error. `message` gets the constraint name.
fn conflict_or(report: Report, message: impl FnOnce(&str) -> String) -> ConductError {
    match violated_unique_key(&report) {
        Some(key) => ConductError::Conflict(message(&key)),
        None => ConductError::Persistence(report),
    }
}

fn access_code_collision() -> String {
    "Access code collision, try again".to_string()
}

fn teacher_row(row: DbTeacher) -> ConductResult<Teacher> {
    Ok(Teacher::try_from(row)?)
}

fn violation_row(row: DbViolation) -> ConductResult<ViolationRecord> {
    Ok(ViolationRecord::try_from(row)?)
}

fn violation_rows(rows: Vec<DbViolation>) -> ConductResult<Vec<ViolationRecord>> {
    rows.into_iter().map(violation_row).collect()
}

fn slot_missing(id: Uuid) -> ConductError {
    ConductError::NotFound(format!("Detention slot {} not found", id))
}

#[async_trait]
impl StudentStore for PgStore {
    async fn insert_student(&self, new: NewStudent) -> ConductResult<Student> {
        student::create_student(&self.pool, &new)
            .await
            .map(Student::from)
            .map_err(|err| {
                conflict_or(err, |key| {
                    if key == ACCESS_CODE_KEY {
                        access_code_collision()
                    } else {
                        format!("Barcode {} is already assigned", new.barcode)
                    }
                })
            })
    }

    async fn get_student(&self, id: Uuid) -> ConductResult<Option<Student>> {
        Ok(student::get_student_by_id(&self.pool, id)
            .await?
            .map(Student::from))
    }

    async fn get_student_by_barcode(&self, barcode: &str) -> ConductResult<Option<Student>> {
        Ok(student::get_student_by_barcode(&self.pool, barcode)
            .await?
            .map(Student::from))
    }

    async fn get_student_by_access_code(&self, code: &str) -> ConductResult<Option<Student>> {
        Ok(student::get_student_by_access_code(&self.pool, code)
            .await?
            .map(Student::from))
    }

    async fn search_students(&self, query: &str, limit: usize) -> ConductResult<Vec<Student>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        Ok(student::search_students(&self.pool, query, limit)
            .await?
            .into_iter()
            .map(Student::from)
            .collect())
    }

    async fn list_students(&self) -> ConductResult<Vec<Student>> {
        Ok(student::list_students(&self.pool)
            .await?
            .into_iter()
            .map(Student::from)
            .collect())
    }

    async fn update_student(
        &self,
        id: Uuid,
        changes: UpdateStudentRequest,
    ) -> ConductResult<Option<Student>> {
        student::update_student(&self.pool, id, &changes)
            .await
            .map(|row| row.map(Student::from))
            .map_err(|err| {
                conflict_or(err, |_| {
                    format!(
                        "Barcode {} is already assigned",
                        changes.barcode.as_deref().unwrap_or_default()
                    )
                })
            })
    }

    async fn set_access_code(&self, id: Uuid, code: &str) -> ConductResult<Option<Student>> {
        student::set_access_code(&self.pool, id, code)
            .await
            .map(|row| row.map(Student::from))
            .map_err(|err| conflict_or(err, |_| access_code_collision()))
    }

    async fn mark_parent_verified(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> ConductResult<Option<Student>> {
        Ok(student::mark_parent_verified(&self.pool, id, at)
            .await?
            .map(Student::from))
    }

    async fn delete_student(&self, id: Uuid) -> ConductResult<bool> {
        Ok(student::delete_student(&self.pool, id).await?)
    }
}

#[async_trait]
impl TeacherStore for PgStore {
    async fn insert_teacher(&self, new: NewTeacher) -> ConductResult<Teacher> {
        let row = teacher::create_teacher(&self.pool, &new)
            .await
            .map_err(|err| {
                conflict_or(err, |_| format!("Teacher {} is already registered", new.id))
            })?;
        teacher_row(row)
    }

    async fn get_teacher(&self, id: Uuid) -> ConductResult<Option<Teacher>> {
        teacher::get_teacher_by_id(&self.pool, id)
            .await?
            .map(teacher_row)
            .transpose()
    }

    async fn list_teachers(&self) -> ConductResult<Vec<Teacher>> {
        teacher::list_teachers(&self.pool)
            .await?
            .into_iter()
            .map(teacher_row)
            .collect()
    }

    async fn set_teacher_approval(
        &self,
        id: Uuid,
        approved: bool,
    ) -> ConductResult<Option<Teacher>> {
        teacher::set_teacher_approval(&self.pool, id, approved)
            .await?
            .map(teacher_row)
            .transpose()
    }

    async fn set_teacher_role(&self, id: Uuid, role: StaffRole) -> ConductResult<Option<Teacher>> {
        teacher::set_teacher_role(&self.pool, id, role)
            .await?
            .map(teacher_row)
            .transpose()
    }
}

#[async_trait]
impl SlotStore for PgStore {
    async fn insert_slot(&self, new: NewSlot) -> ConductResult<DetentionSlot> {
        Ok(slot::create_slot(&self.pool, &new).await?.into())
    }

    async fn get_slot(&self, id: Uuid) -> ConductResult<Option<DetentionSlot>> {
        Ok(slot::get_slot_by_id(&self.pool, id).await?.map(Into::into))
    }

    async fn list_slots(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ConductResult<Vec<DetentionSlot>> {
        Ok(slot::list_slots(&self.pool, from, to)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn open_slots_after(
        &self,
        after: NaiveDate,
        until: Option<NaiveDate>,
    ) -> ConductResult<Vec<DetentionSlot>> {
        Ok(slot::open_slots_after(&self.pool, after, until)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn update_slot(
        &self,
        id: Uuid,
        capacity: Option<i32>,
        location: Option<String>,
    ) -> ConductResult<Option<DetentionSlot>> {
        let mut tx = self.pool.begin().await.map_err(Report::from)?;
        let Some(current) = slot::lock_slot(&mut tx, id).await? else {
            return Ok(None);
        };
        if let Some(capacity) = capacity {
            if capacity < current.occupancy {
                return Err(ConductError::Validation(format!(
                    "Capacity {} is below the {} students already assigned",
                    capacity, current.occupancy
                )));
            }
        }
        let updated = slot::update_slot(&mut tx, id, capacity, location.as_deref()).await?;
        tx.commit().await.map_err(Report::from)?;
        Ok(updated.map(Into::into))
    }

    async fn delete_slot(&self, id: Uuid) -> ConductResult<bool> {
        if slot::delete_empty_slot(&self.pool, id).await? {
            return Ok(true);
        }
        match slot::get_slot_by_id(&self.pool, id).await? {
            None => Ok(false),
            Some(_) => Err(ConductError::Conflict(
                "Cannot delete slot with assigned students".to_string(),
            )),
        }
    }
}

#[async_trait]
impl ViolationStore for PgStore {
    async fn bind_violation(
        &self,
        new: NewViolation,
    ) -> ConductResult<Option<ViolationRecord>> {
        match violation::bind_violation(&self.pool, &new).await? {
            Some(row) => violation_row(row).map(Some),
            None if slot::get_slot_by_id(&self.pool, new.slot_id).await?.is_none() => {
                Err(slot_missing(new.slot_id))
            }
            None => Ok(None),
        }
    }

    async fn rebind_violation(
        &self,
        id: Uuid,
        slot_id: Uuid,
    ) -> ConductResult<Option<ViolationRecord>> {
        match violation::rebind_violation(&self.pool, id, slot_id).await? {
            Rebind::Moved(row) => violation_row(row).map(Some),
            Rebind::SlotFull => Ok(None),
            Rebind::Missing => Err(ConductError::NotFound(format!("Violation {} not found", id))),
            Rebind::SameSlot => Err(ConductError::Validation(format!(
                "Violation {} is already booked into that slot",
                id
            ))),
            Rebind::Refused { status } => {
                let from = status
                    .parse::<ViolationStatus>()
                    .map_err(|_| eyre::eyre!("Unknown status '{}' for violation {}", status, id))?;
                Err(ConductError::InvalidTransition {
                    from,
                    to: ViolationStatus::Reassigned,
                })
            }
        }
    }

    async fn get_violation(&self, id: Uuid) -> ConductResult<Option<ViolationRecord>> {
        violation::get_violation_by_id(&self.pool, id)
            .await?
            .map(violation_row)
            .transpose()
    }

    async fn list_violations_for_student(
        &self,
        student_id: Uuid,
    ) -> ConductResult<Vec<ViolationRecord>> {
        violation_rows(violation::get_violations_by_student_id(&self.pool, student_id).await?)
    }

    async fn list_violations_for_slot(
        &self,
        slot_id: Uuid,
    ) -> ConductResult<Vec<ViolationRecord>> {
        violation_rows(violation::get_violations_by_slot_id(&self.pool, slot_id).await?)
    }

    async fn list_violations_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ConductResult<Vec<ViolationRecord>> {
        violation_rows(violation::get_violations_between(&self.pool, start, end).await?)
    }

    async fn set_violation_status(
        &self,
        id: Uuid,
        expected: ViolationStatus,
        next: ViolationStatus,
    ) -> ConductResult<Option<ViolationRecord>> {
        violation::set_violation_status(&self.pool, id, expected, next)
            .await?
            .map(violation_row)
            .transpose()
    }
}

#[async_trait]
impl WarningStore for PgStore {
    async fn insert_warning(&self, new: NewWarning) -> ConductResult<Warning> {
        Ok(warning::create_warning(&self.pool, &new).await?.into())
    }

    async fn insert_warning_below(
        &self,
        new: NewWarning,
        threshold: usize,
    ) -> ConductResult<Option<Warning>> {
        let threshold = i64::try_from(threshold).unwrap_or(i64::MAX);
        Ok(warning::create_warning_below(&self.pool, &new, threshold)
            .await?
            .map(Warning::from))
    }

    async fn count_warnings(&self, student_id: Uuid, violation_type: &str) -> ConductResult<usize> {
        let count = warning::count_warnings(&self.pool, student_id, violation_type).await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn list_warnings(&self, student_id: Uuid) -> ConductResult<Vec<Warning>> {
        Ok(warning::get_warnings_by_student_id(&self.pool, student_id)
            .await?
            .into_iter()
            .map(Warning::from)
            .collect())
    }
}
