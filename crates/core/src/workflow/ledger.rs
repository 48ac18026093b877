//! The warning ledger: a derived count of warning rows per (student, type).

use std::collections::BTreeMap;

use tracing::info;
use uuid::Uuid;

use crate::{
    errors::ConductResult,
    models::warning::{NewWarning, StudentWarningsResponse, Warning, WarningCount},
};

use super::Workflow;

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerOutcome {
    /// The student was under the threshold; a warning row was written.
    Warning(Warning),
    /// The threshold was already met. Nothing was written; the caller must
    /// file a violation instead.
    ThresholdMet { count: usize },
}

impl Workflow {
    /// Writes a warning if the student has fewer than the threshold for this
    /// type. The check and the insert are one store operation.
    pub async fn record_in_ledger(
        &self,
        student_id: Uuid,
        teacher_id: Uuid,
        violation_type: &str,
    ) -> ConductResult<LedgerOutcome> {
        let threshold = self.policy.warning_threshold;
        let warning = NewWarning {
            student_id,
            teacher_id,
            violation_type: violation_type.to_string(),
        };

        match self.store.insert_warning_below(warning, threshold).await? {
            Some(warning) => {
                info!(
                    student_id = %student_id,
                    violation_type,
                    "warning recorded"
                );
                Ok(LedgerOutcome::Warning(warning))
            }
            None => {
                let count = self.store.count_warnings(student_id, violation_type).await?;
                Ok(LedgerOutcome::ThresholdMet { count })
            }
        }
    }

    /// A warning recorded on the teacher's say-so, outside the threshold rule.
    pub async fn issue_warning(
        &self,
        student_id: Uuid,
        teacher_id: Uuid,
        violation_type: &str,
    ) -> ConductResult<Warning> {
        let warning = self
            .store
            .insert_warning(NewWarning {
                student_id,
                teacher_id,
                violation_type: violation_type.to_string(),
            })
            .await?;
        info!(student_id = %student_id, violation_type, "warning issued");
        Ok(warning)
    }

    pub async fn student_warnings(&self, student_id: Uuid) -> ConductResult<StudentWarningsResponse> {
        self.require_student(student_id).await?;
        let warnings = self.store.list_warnings(student_id).await?;

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for warning in &warnings {
            *counts.entry(warning.violation_type.as_str()).or_default() += 1;
        }
        let counts = counts
            .into_iter()
            .map(|(violation_type, count)| WarningCount {
                violation_type: violation_type.to_string(),
                count,
                threshold: self.policy.warning_threshold,
            })
            .collect();

        Ok(StudentWarningsResponse { warnings, counts })
    }
}
