//! Violation entry: binding a new infraction to a detention slot.

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    errors::{ConductError, ConductResult},
    models::{
        notification::{DetentionAssigned, NotificationEvent},
        student::Student,
        teacher::Teacher,
        violation::{
            FileViolationRequest, InfractionOutcome, NewViolation, RecordInfractionRequest,
            ViolationRecord,
        },
    },
    validation::require_text,
};

use super::{recipient, LedgerOutcome, Workflow};

impl Workflow {
    /// Files a violation directly against the slot the teacher picked.
    pub async fn file_violation(
        &self,
        teacher_id: Uuid,
        request: FileViolationRequest,
    ) -> ConductResult<ViolationRecord> {
        let violation_type = require_text("Violation type", &request.violation_type)?;
        let student = self.require_student(request.student_id).await?;
        let teacher = self.require_teacher(teacher_id).await?;
        self.bind(&student, &teacher, violation_type, request.slot_id)
            .await
    }

    /// Routes an infraction through the warning ledger. Only once the
    /// student has reached the threshold for this type is a violation filed.
    pub async fn record_infraction(
        &self,
        teacher_id: Uuid,
        request: RecordInfractionRequest,
    ) -> ConductResult<InfractionOutcome> {
        let violation_type = require_text("Violation type", &request.violation_type)?;
        let student = self.require_student(request.student_id).await?;
        let teacher = self.require_teacher(teacher_id).await?;

        if request.force_warning {
            let warning = self
                .issue_warning(student.id, teacher.id, &violation_type)
                .await?;
            return Ok(InfractionOutcome::Warning { warning });
        }

        match self
            .record_in_ledger(student.id, teacher.id, &violation_type)
            .await?
        {
            LedgerOutcome::Warning(warning) => Ok(InfractionOutcome::Warning { warning }),
            LedgerOutcome::ThresholdMet { .. } => {
                let violation = self
                    .bind(&student, &teacher, violation_type, request.slot_id)
                    .await?;
                Ok(InfractionOutcome::Violation { violation })
            }
        }
    }

    pub async fn get_violation(&self, id: Uuid) -> ConductResult<ViolationRecord> {
        self.require_violation(id).await
    }

    async fn bind(
        &self,
        student: &Student,
        teacher: &Teacher,
        violation_type: String,
        slot_id: Option<Uuid>,
    ) -> ConductResult<ViolationRecord> {
        let slot_id = slot_id.ok_or_else(|| {
            ConductError::Validation("A detention date must be selected".to_string())
        })?;
        let slot = self.require_slot(slot_id).await?;
        if slot.date <= self.clock.today() {
            return Err(ConductError::Validation(format!(
                "Detention date {} is not in the future",
                slot.date
            )));
        }

        let violation = self
            .store
            .bind_violation(NewViolation {
                student_id: student.id,
                teacher_id: teacher.id,
                slot_id: slot.id,
                violation_type,
            })
            .await?
            .ok_or_else(|| {
                warn!(slot_id = %slot.id, date = %slot.date, "slot filled before binding");
                ConductError::NoCapacityAvailable
            })?;

        info!(
            violation_id = %violation.id,
            student_id = %student.id,
            detention_date = %violation.detention_date,
            "violation filed"
        );

        self.notify(NotificationEvent::DetentionAssigned(DetentionAssigned {
            violation_id: violation.id,
            student_name: student.name.clone(),
            student_email: student.email.clone(),
            parent_email: student.parent_email.clone(),
            parent_access_code: (!student.parent_verified)
                .then(|| student.parent_access_code.clone()),
            teacher: recipient(teacher),
            violation_type: violation.violation_type.clone(),
            assigned_date: violation.assigned_date.date_naive(),
            detention_date: violation.detention_date,
            location: slot.location,
        }));

        Ok(violation)
    }
}
