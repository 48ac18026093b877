//! Detention slots. Seats are taken only through `reserve_seat`, which the
//! violation transactions reuse. Deleting a student releases its seats in
//! one bulk statement.

use crate::models::DbSlot;
use chrono::{NaiveDate, Utc};
use conduct_core::models::slot::NewSlot;
use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

pub async fn create_slot(pool: &Pool<Postgres>, slot: &NewSlot) -> Result<DbSlot> {
    let id = Uuid::new_v4();

    tracing::debug!("Creating slot: id={}, date={}, teacher={}", id, slot.date, slot.teacher_id);

    let row = sqlx::query_as::<_, DbSlot>(
        r#"
        INSERT INTO detention_slots (id, date, teacher_id, location, capacity, occupancy, created_at)
        VALUES ($1, $2, $3, $4, $5, 0, $6)
        RETURNING id, date, teacher_id, location, capacity, occupancy, created_at
        "#,
    )
    .bind(id)
    .bind(slot.date)
    .bind(slot.teacher_id)
    .bind(&slot.location)
    .bind(slot.capacity)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSlot>> {
    let row = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, date, teacher_id, location, capacity, occupancy, created_at
        FROM detention_slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn list_slots(
    pool: &Pool<Postgres>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<DbSlot>> {
    let rows = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, date, teacher_id, location, capacity, occupancy, created_at
        FROM detention_slots
        WHERE ($1::DATE IS NULL OR date >= $1)
          AND ($2::DATE IS NULL OR date <= $2)
        ORDER BY date, created_at
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn open_slots_after(
    pool: &Pool<Postgres>,
    after: NaiveDate,
    until: Option<NaiveDate>,
) -> Result<Vec<DbSlot>> {
    let rows = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, date, teacher_id, location, capacity, occupancy, created_at
        FROM detention_slots
        WHERE date > $1
          AND occupancy < capacity
          AND ($2::DATE IS NULL OR date <= $2)
        ORDER BY date, created_at
        "#,
    )
    .bind(after)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// `Ok(None)` when the slot does not exist. The capacity check against
/// occupancy happens in the caller, under the row lock taken here.
pub async fn lock_slot(conn: &mut PgConnection, id: Uuid) -> Result<Option<DbSlot>> {
    let row = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, date, teacher_id, location, capacity, occupancy, created_at
        FROM detention_slots
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

pub async fn update_slot(
    conn: &mut PgConnection,
    id: Uuid,
    capacity: Option<i32>,
    location: Option<&str>,
) -> Result<Option<DbSlot>> {
    let row = sqlx::query_as::<_, DbSlot>(
        r#"
        UPDATE detention_slots
        SET capacity = COALESCE($2, capacity),
            location = COALESCE($3, location)
        WHERE id = $1
        RETURNING id, date, teacher_id, location, capacity, occupancy, created_at
        "#,
    )
    .bind(id)
    .bind(capacity)
    .bind(location)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}

/// Deletes only an empty slot. `false` covers both a missing and an
/// occupied slot; callers tell them apart.
pub async fn delete_empty_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM detention_slots WHERE id = $1 AND occupancy = 0")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Conditional increment. `Ok(None)` when the slot is full or missing.
pub async fn reserve_seat(conn: &mut PgConnection, id: Uuid) -> Result<Option<DbSlot>> {
    let row = sqlx::query_as::<_, DbSlot>(
        r#"
        UPDATE detention_slots
        SET occupancy = occupancy + 1
        WHERE id = $1 AND occupancy < capacity
        RETURNING id, date, teacher_id, location, capacity, occupancy, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row)
}
