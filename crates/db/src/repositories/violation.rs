use crate::{models::DbViolation, repositories::slot};
use chrono::{DateTime, Utc};
use conduct_core::models::violation::{NewViolation, ViolationStatus};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const COLUMNS: &str = "id, student_id, teacher_id, slot_id, violation_type, assigned_date, \
                       detention_date, status, created_at";

/// What happened when a record was offered a new slot.
#[derive(Debug)]
pub enum Rebind {
    Moved(DbViolation),
    SlotFull,
    /// The record is not in a state that allows the move.
    Refused { status: String },
    /// The record already holds a seat in that slot.
    SameSlot,
    Missing,
}

/// Reserves a seat and inserts the pending record in one transaction.
/// `Ok(None)` when the slot is full or missing; nothing is written then.
pub async fn bind_violation(
    pool: &Pool<Postgres>,
    violation: &NewViolation,
) -> Result<Option<DbViolation>> {
    let mut tx = pool.begin().await?;

    let Some(seat) = slot::reserve_seat(&mut tx, violation.slot_id).await? else {
        tx.rollback().await?;
        return Ok(None);
    };

    let now = Utc::now();
    let row = sqlx::query_as::<_, DbViolation>(&format!(
        r#"
        INSERT INTO violations (id, student_id, teacher_id, slot_id, violation_type,
                                assigned_date, detention_date, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(violation.student_id)
    .bind(violation.teacher_id)
    .bind(seat.id)
    .bind(&violation.violation_type)
    .bind(now)
    .bind(seat.date)
    .bind(ViolationStatus::Pending.to_string())
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::debug!(
        "Bound violation {} to slot {} ({}/{})",
        row.id,
        seat.id,
        seat.occupancy,
        seat.capacity
    );
    Ok(Some(row))
}

/// Moves an absent record to `slot_id`. The record row is locked first so
/// two reassignments of the same record cannot both take a seat.
pub async fn rebind_violation(pool: &Pool<Postgres>, id: Uuid, slot_id: Uuid) -> Result<Rebind> {
    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, (String, Uuid)>(
        "SELECT status, slot_id FROM violations WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;
    let Some((status, current_slot)) = current else {
        tx.rollback().await?;
        return Ok(Rebind::Missing);
    };
    if status != ViolationStatus::Absent.to_string() {
        tx.rollback().await?;
        return Ok(Rebind::Refused { status });
    }
    if current_slot == slot_id {
        tx.rollback().await?;
        return Ok(Rebind::SameSlot);
    }

    let Some(seat) = slot::reserve_seat(&mut tx, slot_id).await? else {
        tx.rollback().await?;
        return Ok(Rebind::SlotFull);
    };

    let row = sqlx::query_as::<_, DbViolation>(&format!(
        r#"
        UPDATE violations
        SET slot_id = $2, detention_date = $3, status = $4
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(seat.id)
    .bind(seat.date)
    .bind(ViolationStatus::Reassigned.to_string())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Rebind::Moved(row))
}

pub async fn get_violation_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbViolation>> {
    let row = sqlx::query_as::<_, DbViolation>(&format!(
        "SELECT {COLUMNS} FROM violations WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn get_violations_by_student_id(
    pool: &Pool<Postgres>,
    student_id: Uuid,
) -> Result<Vec<DbViolation>> {
    let rows = sqlx::query_as::<_, DbViolation>(&format!(
        "SELECT {COLUMNS} FROM violations WHERE student_id = $1 ORDER BY created_at DESC"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_violations_by_slot_id(
    pool: &Pool<Postgres>,
    slot_id: Uuid,
) -> Result<Vec<DbViolation>> {
    let rows = sqlx::query_as::<_, DbViolation>(&format!(
        "SELECT {COLUMNS} FROM violations WHERE slot_id = $1 ORDER BY created_at"
    ))
    .bind(slot_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_violations_between(
    pool: &Pool<Postgres>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<DbViolation>> {
    let rows = sqlx::query_as::<_, DbViolation>(&format!(
        "SELECT {COLUMNS} FROM violations WHERE created_at BETWEEN $1 AND $2 ORDER BY created_at"
    ))
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Compare-and-set on status.
pub async fn set_violation_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    expected: ViolationStatus,
    next: ViolationStatus,
) -> Result<Option<DbViolation>> {
    let row = sqlx::query_as::<_, DbViolation>(&format!(
        r#"
        UPDATE violations
        SET status = $3
        WHERE id = $1 AND status = $2
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(expected.to_string())
    .bind(next.to_string())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
