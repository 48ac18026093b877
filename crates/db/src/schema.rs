use eyre::{Result, WrapErr};
use sqlx::{Pool, Postgres};
use tracing::info;

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_students_name ON students(name)",
    "CREATE INDEX IF NOT EXISTS idx_detention_slots_date ON detention_slots(date)",
    "CREATE INDEX IF NOT EXISTS idx_violations_student_id ON violations(student_id)",
    "CREATE INDEX IF NOT EXISTS idx_violations_slot_id ON violations(slot_id)",
    "CREATE INDEX IF NOT EXISTS idx_violations_created_at ON violations(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_warnings_student_type ON warnings(student_id, violation_type)",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Staff ids come from the identity provider, so no default here
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teachers (
            id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            role VARCHAR(16) NOT NULL DEFAULT 'teacher',
            is_approved BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_role CHECK (role IN ('teacher', 'admin'))
        );
        "#,
    )
    .execute(pool)
    .await
    .wrap_err("Failed to create teachers table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            parent_email VARCHAR(255) NULL,
            barcode VARCHAR(6) NOT NULL UNIQUE,
            grade INTEGER NOT NULL,
            parent_access_code VARCHAR(8) NOT NULL UNIQUE,
            parent_verified BOOLEAN NOT NULL DEFAULT FALSE,
            parent_verified_at TIMESTAMP WITH TIME ZONE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_grade CHECK (grade BETWEEN 9 AND 12)
        );
        "#,
    )
    .execute(pool)
    .await
    .wrap_err("Failed to create students table")?;

    // Occupancy bounds are the last line of defence behind the guarded updates
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS detention_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            date DATE NOT NULL,
            teacher_id UUID NOT NULL REFERENCES teachers(id),
            location VARCHAR(255) NOT NULL DEFAULT 'Cafeteria',
            capacity INTEGER NOT NULL DEFAULT 20,
            occupancy INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_capacity CHECK (capacity > 0),
            CONSTRAINT occupancy_in_range CHECK (occupancy >= 0 AND occupancy <= capacity)
        );
        "#,
    )
    .execute(pool)
    .await
    .wrap_err("Failed to create detention_slots table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS violations (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            student_id UUID NOT NULL REFERENCES students(id) ON DELETE CASCADE,
            teacher_id UUID NOT NULL REFERENCES teachers(id),
            slot_id UUID NOT NULL REFERENCES detention_slots(id),
            violation_type VARCHAR(255) NOT NULL,
            assigned_date TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            detention_date DATE NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'pending',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_status CHECK (status IN ('pending', 'attended', 'absent', 'reassigned'))
        );
        "#,
    )
    .execute(pool)
    .await
    .wrap_err("Failed to create violations table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS warnings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            student_id UUID NOT NULL REFERENCES students(id) ON DELETE CASCADE,
            teacher_id UUID NOT NULL REFERENCES teachers(id),
            violation_type VARCHAR(255) NOT NULL,
            issued_date TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await
    .wrap_err("Failed to create warnings table")?;

    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
