//! Moves an absent record to the earliest future slot with a free seat.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    errors::{ConductError, ConductResult},
    models::{
        notification::{DetentionRescheduled, NotificationEvent},
        violation::{Reassignment, ViolationRecord, ViolationStatus},
    },
};

use super::{recipient, Workflow};

impl Workflow {
    /// Candidates are slots after both today and the missed detention, tried
    /// earliest first. A slot that fills between the listing and the
    /// reservation is skipped, so concurrent reassignments never push a slot
    /// past capacity. The previous slot keeps its seat.
    pub async fn reassign(&self, violation_id: Uuid) -> ConductResult<Reassignment> {
        let current = self.require_violation(violation_id).await?;
        current.status.transition(ViolationStatus::Reassigned)?;

        let after = self.clock.today().max(current.detention_date);
        let candidates = self.store.open_slots_after(after, None).await?;

        for slot in candidates {
            match self.store.rebind_violation(violation_id, slot.id).await? {
                Some(violation) => {
                    info!(
                        violation_id = %violation_id,
                        slot_id = %slot.id,
                        new_date = %slot.date,
                        "violation reassigned"
                    );
                    self.announce_reschedule(&violation, &slot.location).await;
                    return Ok(Reassignment {
                        slot_id: slot.id,
                        new_date: slot.date,
                        violation,
                    });
                }
                None => debug!(slot_id = %slot.id, "slot filled, trying next"),
            }
        }

        warn!(violation_id = %violation_id, %after, "no slot available for reassignment");
        Err(ConductError::NoCapacityAvailable)
    }

    /// Lookup failures only cost the email; the move has already committed.
    async fn announce_reschedule(&self, violation: &ViolationRecord, location: &str) {
        let student = self.store.get_student(violation.student_id).await;
        let teacher = self.store.get_teacher(violation.teacher_id).await;
        let (Ok(Some(student)), Ok(Some(teacher))) = (student, teacher) else {
            warn!(violation_id = %violation.id, "skipping reschedule notice, recipients missing");
            return;
        };

        self.notify(NotificationEvent::DetentionRescheduled(DetentionRescheduled {
            violation_id: violation.id,
            student_name: student.name,
            student_email: student.email,
            teacher: recipient(&teacher),
            violation_type: violation.violation_type.clone(),
            new_date: violation.detention_date,
            location: location.to_string(),
        }));
    }
}
