use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An infraction recorded without a detention. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub violation_type: String,
    pub issued_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWarning {
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub violation_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningCount {
    pub violation_type: String,
    pub count: usize,
    pub threshold: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentWarningsResponse {
    pub warnings: Vec<Warning>,
    pub counts: Vec<WarningCount>,
}
