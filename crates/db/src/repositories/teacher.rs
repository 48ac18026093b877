use crate::models::DbTeacher;
use chrono::Utc;
use conduct_core::models::teacher::{NewTeacher, StaffRole};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_teacher(pool: &Pool<Postgres>, teacher: &NewTeacher) -> Result<DbTeacher> {
    tracing::debug!("Registering teacher: id={}", teacher.id);

    let row = sqlx::query_as::<_, DbTeacher>(
        r#"
        INSERT INTO teachers (id, name, email, role, is_approved, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, email, role, is_approved, created_at
        "#,
    )
    .bind(teacher.id)
    .bind(&teacher.name)
    .bind(&teacher.email)
    .bind(teacher.role.to_string())
    .bind(teacher.is_approved)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_teacher_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTeacher>> {
    let row = sqlx::query_as::<_, DbTeacher>(
        r#"
        SELECT id, name, email, role, is_approved, created_at
        FROM teachers
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn list_teachers(pool: &Pool<Postgres>) -> Result<Vec<DbTeacher>> {
    let rows = sqlx::query_as::<_, DbTeacher>(
        r#"
        SELECT id, name, email, role, is_approved, created_at
        FROM teachers
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn set_teacher_approval(
    pool: &Pool<Postgres>,
    id: Uuid,
    approved: bool,
) -> Result<Option<DbTeacher>> {
    let row = sqlx::query_as::<_, DbTeacher>(
        r#"
        UPDATE teachers
        SET is_approved = $2
        WHERE id = $1
        RETURNING id, name, email, role, is_approved, created_at
        "#,
    )
    .bind(id)
    .bind(approved)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn set_teacher_role(
    pool: &Pool<Postgres>,
    id: Uuid,
    role: StaffRole,
) -> Result<Option<DbTeacher>> {
    let row = sqlx::query_as::<_, DbTeacher>(
        r#"
        UPDATE teachers
        SET role = $2
        WHERE id = $1
        RETURNING id, name, email, role, is_approved, created_at
        "#,
    )
    .bind(id)
    .bind(role.to_string())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
