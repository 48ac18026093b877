//! Attendance marking. `absent` hands the record straight to the allocator.

use futures::future::join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    errors::{ConductError, ConductResult},
    models::violation::{
        AttendanceMark, AttendanceOutcome, BulkAttendanceItem, BulkAttendanceResponse,
        ViolationStatus,
    },
};

use super::Workflow;

impl Workflow {
    pub async fn mark_attendance(
        &self,
        violation_id: Uuid,
        mark: AttendanceMark,
    ) -> ConductResult<AttendanceOutcome> {
        let current = self.require_violation(violation_id).await?;
        let next = current.status.transition(mark.into())?;

        let Some(violation) = self
            .store
            .set_violation_status(violation_id, current.status, next)
            .await?
        else {
            // Someone else moved the record between our read and write.
            let latest = self.require_violation(violation_id).await?;
            return Err(ConductError::InvalidTransition {
                from: latest.status,
                to: next,
            });
        };
        info!(violation_id = %violation_id, status = %next, "attendance marked");

        if next != ViolationStatus::Absent {
            return Ok(AttendanceOutcome {
                violation,
                reassignment: None,
                reassign_error: None,
            });
        }

        match self.reassign(violation_id).await {
            Ok(reassignment) => Ok(AttendanceOutcome {
                violation: reassignment.violation.clone(),
                reassignment: Some(reassignment),
                reassign_error: None,
            }),
            Err(err) => {
                warn!(violation_id = %violation_id, error = %err, "absent record left in place");
                Ok(AttendanceOutcome {
                    violation,
                    reassignment: None,
                    reassign_error: Some(err.to_string()),
                })
            }
        }
    }

    /// Marks each record independently; one failure does not stop the rest.
    pub async fn mark_attendance_bulk(
        &self,
        violation_ids: &[Uuid],
        mark: AttendanceMark,
    ) -> BulkAttendanceResponse {
        let outcomes = join_all(
            violation_ids
                .iter()
                .map(|id| async move { (*id, self.mark_attendance(*id, mark).await) }),
        )
        .await;

        let items: Vec<BulkAttendanceItem> = outcomes
            .into_iter()
            .map(|(violation_id, outcome)| match outcome {
                Ok(outcome) => BulkAttendanceItem {
                    violation_id,
                    status: Some(outcome.violation.status),
                    new_date: outcome.reassignment.map(|r| r.new_date),
                    error: outcome.reassign_error,
                },
                Err(err) => BulkAttendanceItem {
                    violation_id,
                    status: None,
                    new_date: None,
                    error: Some(err.to_string()),
                },
            })
            .collect();

        let failed = items.iter().filter(|item| item.status.is_none()).count();
        BulkAttendanceResponse {
            succeeded: items.len() - failed,
            failed,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        models::violation::{NewViolation, ViolationRecord},
        store::ViolationStore,
        workflow::testing::{days_from_today, Harness},
    };

    async fn pending(h: &Harness, slot_id: Uuid, barcode: &str) -> ViolationRecord {
        let teacher = h.teacher("Rivera").await;
        let student = h.student("Ana", barcode).await;
        h.store
            .bind_violation(NewViolation {
                student_id: student.id,
                teacher_id: teacher.id,
                slot_id,
                violation_type: "tardy".to_string(),
            })
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn attended_is_final() {
        let h = Harness::new();
        let monitor = h.teacher("Monitor").await;
        let slot = h.slot(&monitor, days_from_today(1), 3).await;
        let record = pending(&h, slot.id, "100001").await;

        let outcome = h
            .workflow
            .mark_attendance(record.id, AttendanceMark::Attended)
            .await
            .unwrap();
        assert_eq!(outcome.violation.status, ViolationStatus::Attended);
        assert!(outcome.reassignment.is_none());

        let err = h
            .workflow
            .mark_attendance(record.id, AttendanceMark::Absent)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConductError::InvalidTransition {
                from: ViolationStatus::Attended,
                to: ViolationStatus::Absent
            }
        ));
        assert_eq!(h.occupancy(&slot).await, 1);
    }

    #[tokio::test]
    async fn absent_is_reassigned() {
        let h = Harness::new();
        let monitor = h.teacher("Monitor").await;
        let slot = h.slot(&monitor, days_from_today(1), 3).await;
        let next = h.slot(&monitor, days_from_today(6), 3).await;
        let record = pending(&h, slot.id, "100001").await;

        let outcome = h
            .workflow
            .mark_attendance(record.id, AttendanceMark::Absent)
            .await
            .unwrap();

        let reassignment = outcome.reassignment.unwrap();
        assert_eq!(reassignment.slot_id, next.id);
        assert_eq!(outcome.violation.status, ViolationStatus::Reassigned);
        assert_eq!(outcome.violation.detention_date, next.date);
        assert_eq!(outcome.reassign_error, None);
    }

    #[tokio::test]
    async fn absent_without_capacity_stays_absent() {
        let h = Harness::new();
        let monitor = h.teacher("Monitor").await;
        let slot = h.slot(&monitor, days_from_today(1), 1).await;
        let record = pending(&h, slot.id, "100001").await;

        let outcome = h
            .workflow
            .mark_attendance(record.id, AttendanceMark::Absent)
            .await
            .unwrap();

        assert_eq!(outcome.violation.status, ViolationStatus::Absent);
        assert!(outcome.reassignment.is_none());
        assert_eq!(
            outcome.reassign_error.as_deref(),
            Some("No detention slot with open capacity is available")
        );
    }

    #[tokio::test]
    async fn bulk_absent_never_oversells() {
        let h = Harness::new();
        let monitor = h.teacher("Monitor").await;
        let today_slot = h.slot(&monitor, days_from_today(1), 5).await;
        let spare = h.slot(&monitor, days_from_today(7), 3).await;
        let mut ids = Vec::new();
        for n in 0..5 {
            ids.push(pending(&h, today_slot.id, &format!("20000{}", n)).await.id);
        }

        let response = h
            .workflow
            .mark_attendance_bulk(&ids, AttendanceMark::Absent)
            .await;

        assert_eq!(response.succeeded, 5);
        assert_eq!(response.failed, 0);
        let moved = response
            .items
            .iter()
            .filter(|item| item.status == Some(ViolationStatus::Reassigned))
            .count();
        let stuck = response
            .items
            .iter()
            .filter(|item| item.status == Some(ViolationStatus::Absent))
            .count();
        assert_eq!((moved, stuck), (3, 2));
        assert_eq!(h.occupancy(&spare).await, 3);
        assert_eq!(h.occupancy(&today_slot).await, 5);
    }

    #[tokio::test]
    async fn bulk_reports_unknown_ids() {
        let h = Harness::new();
        let monitor = h.teacher("Monitor").await;
        let slot = h.slot(&monitor, days_from_today(1), 2).await;
        let record = pending(&h, slot.id, "100001").await;
        let missing = Uuid::new_v4();

        let response = h
            .workflow
            .mark_attendance_bulk(&[record.id, missing], AttendanceMark::Attended)
            .await;

        assert_eq!(response.succeeded, 1);
        assert_eq!(response.failed, 1);
        assert_eq!(response.items[1].violation_id, missing);
        assert!(response.items[1].error.is_some());
    }
}
