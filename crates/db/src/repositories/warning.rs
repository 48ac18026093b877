use crate::models::DbWarning;
use chrono::Utc;
use conduct_core::models::warning::NewWarning;
use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

async fn insert(conn: &mut PgConnection, warning: &NewWarning) -> Result<DbWarning> {
    let row = sqlx::query_as::<_, DbWarning>(
        r#"
        INSERT INTO warnings (id, student_id, teacher_id, violation_type, issued_date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, student_id, teacher_id, violation_type, issued_date
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(warning.student_id)
    .bind(warning.teacher_id)
    .bind(&warning.violation_type)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;

    Ok(row)
}

pub async fn create_warning(pool: &Pool<Postgres>, warning: &NewWarning) -> Result<DbWarning> {
    let mut conn = pool.acquire().await?;
    insert(&mut conn, warning).await
}

/// Inserts only while the student has fewer than `threshold` warnings of
/// this type. An advisory lock keyed on (student, type) serialises the
/// count and the insert across connections.
pub async fn create_warning_below(
    pool: &Pool<Postgres>,
    warning: &NewWarning,
    threshold: i64,
) -> Result<Option<DbWarning>> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::UUID::TEXT || ':' || $2))")
        .bind(warning.student_id)
        .bind(&warning.violation_type)
        .execute(&mut *tx)
        .await?;

    let count = count_in(&mut tx, warning.student_id, &warning.violation_type).await?;
    if count >= threshold {
        tx.commit().await?;
        return Ok(None);
    }

    let row = insert(&mut tx, warning).await?;
    tx.commit().await?;
    Ok(Some(row))
}

async fn count_in(conn: &mut PgConnection, student_id: Uuid, violation_type: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM warnings WHERE student_id = $1 AND violation_type = $2",
    )
    .bind(student_id)
    .bind(violation_type)
    .fetch_one(conn)
    .await?;

    Ok(count)
}

pub async fn count_warnings(
    pool: &Pool<Postgres>,
    student_id: Uuid,
    violation_type: &str,
) -> Result<i64> {
    let mut conn = pool.acquire().await?;
    count_in(&mut conn, student_id, violation_type).await
}

pub async fn get_warnings_by_student_id(
    pool: &Pool<Postgres>,
    student_id: Uuid,
) -> Result<Vec<DbWarning>> {
    let rows = sqlx::query_as::<_, DbWarning>(
        r#"
        SELECT id, student_id, teacher_id, violation_type, issued_date
        FROM warnings
        WHERE student_id = $1
        ORDER BY issued_date DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
