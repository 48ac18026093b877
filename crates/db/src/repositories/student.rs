use crate::models::DbStudent;
use chrono::{DateTime, Utc};
use conduct_core::models::student::{NewStudent, UpdateStudentRequest};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const COLUMNS: &str = "id, name, email, parent_email, barcode, grade, parent_access_code, \
                       parent_verified, parent_verified_at, created_at";

pub async fn create_student(pool: &Pool<Postgres>, student: &NewStudent) -> Result<DbStudent> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating student: id={}, barcode={}", id, student.barcode);

    let row = sqlx::query_as::<_, DbStudent>(&format!(
        r#"
        INSERT INTO students (id, name, email, parent_email, barcode, grade, parent_access_code, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&student.name)
    .bind(&student.email)
    .bind(&student.parent_email)
    .bind(&student.barcode)
    .bind(student.grade)
    .bind(&student.parent_access_code)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_student_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbStudent>> {
    let row = sqlx::query_as::<_, DbStudent>(&format!(
        "SELECT {COLUMNS} FROM students WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn get_student_by_barcode(
    pool: &Pool<Postgres>,
    barcode: &str,
) -> Result<Option<DbStudent>> {
    let row = sqlx::query_as::<_, DbStudent>(&format!(
        "SELECT {COLUMNS} FROM students WHERE barcode = $1"
    ))
    .bind(barcode)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn get_student_by_access_code(
    pool: &Pool<Postgres>,
    code: &str,
) -> Result<Option<DbStudent>> {
    let row = sqlx::query_as::<_, DbStudent>(&format!(
        "SELECT {COLUMNS} FROM students WHERE parent_access_code = $1"
    ))
    .bind(code)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn search_students(
    pool: &Pool<Postgres>,
    query: &str,
    limit: i64,
) -> Result<Vec<DbStudent>> {
    let pattern = format!("%{}%", query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_"));

    let rows = sqlx::query_as::<_, DbStudent>(&format!(
        "SELECT {COLUMNS} FROM students WHERE name ILIKE $1 ORDER BY name LIMIT $2"
    ))
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn list_students(pool: &Pool<Postgres>) -> Result<Vec<DbStudent>> {
    let rows = sqlx::query_as::<_, DbStudent>(&format!(
        "SELECT {COLUMNS} FROM students ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn update_student(
    pool: &Pool<Postgres>,
    id: Uuid,
    changes: &UpdateStudentRequest,
) -> Result<Option<DbStudent>> {
    let row = sqlx::query_as::<_, DbStudent>(&format!(
        r#"
        UPDATE students
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            parent_email = COALESCE($4, parent_email),
            barcode = COALESCE($5, barcode),
            grade = COALESCE($6, grade)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&changes.name)
    .bind(&changes.email)
    .bind(&changes.parent_email)
    .bind(&changes.barcode)
    .bind(changes.grade)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn set_access_code(
    pool: &Pool<Postgres>,
    id: Uuid,
    code: &str,
) -> Result<Option<DbStudent>> {
    let row = sqlx::query_as::<_, DbStudent>(&format!(
        r#"
        UPDATE students
        SET parent_access_code = $2, parent_verified = FALSE, parent_verified_at = NULL
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(code)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn mark_parent_verified(
    pool: &Pool<Postgres>,
    id: Uuid,
    at: DateTime<Utc>,
) -> Result<Option<DbStudent>> {
    let row = sqlx::query_as::<_, DbStudent>(&format!(
        r#"
        UPDATE students
        SET parent_verified = TRUE, parent_verified_at = COALESCE(parent_verified_at, $2)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(at)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Gives back the seats held by the student's unresolved violations, then
/// deletes the student. Violations and warnings go with it by cascade.
pub async fn delete_student(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM students WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Ok(false);
    }

    let released = sqlx::query(
        r#"
        UPDATE detention_slots AS s
        SET occupancy = GREATEST(s.occupancy - held.seats, 0)
        FROM (
            SELECT slot_id, COUNT(*)::INTEGER AS seats
            FROM violations
            WHERE student_id = $1 AND status IN ('pending', 'reassigned')
            GROUP BY slot_id
        ) AS held
        WHERE s.id = held.slot_id
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM students WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::debug!(
        "Deleted student {} and released seats in {} slots",
        id,
        released.rows_affected()
    );
    Ok(true)
}
