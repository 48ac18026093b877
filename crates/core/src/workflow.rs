//! Workflow services over a [`Store`] and a [`Notifier`].
//!
//! Every operation commits its writes before it emits a notification, and
//! no notification outcome feeds back into the result.

mod allocator;
mod attendance;
mod entry;
mod ledger;
mod reports;
mod slots;
mod staff;
mod students;

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    errors::{ConductError, ConductResult},
    models::{
        notification::{NotificationEvent, Recipient},
        slot::DetentionSlot,
        student::Student,
        teacher::Teacher,
        violation::ViolationRecord,
    },
    notify::Notifier,
    policy::{Clock, Policy},
    store::Store,
};

pub use ledger::LedgerOutcome;

#[derive(Clone)]
pub struct Workflow {
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    policy: Policy,
}

impl Workflow {
    pub fn new(
        store: Arc<dyn Store>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        policy: Policy,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
            policy,
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    fn notify(&self, event: NotificationEvent) {
        self.notifier.notify(event);
    }

    async fn require_student(&self, id: Uuid) -> ConductResult<Student> {
        self.store
            .get_student(id)
            .await?
            .ok_or_else(|| ConductError::NotFound(format!("Student with ID {} not found", id)))
    }

    async fn require_teacher(&self, id: Uuid) -> ConductResult<Teacher> {
        self.store
            .get_teacher(id)
            .await?
            .ok_or_else(|| ConductError::NotFound(format!("Teacher with ID {} not found", id)))
    }

    async fn require_slot(&self, id: Uuid) -> ConductResult<DetentionSlot> {
        self.store
            .get_slot(id)
            .await?
            .ok_or_else(|| ConductError::NotFound(format!("Detention slot with ID {} not found", id)))
    }

    async fn require_violation(&self, id: Uuid) -> ConductResult<ViolationRecord> {
        self.store
            .get_violation(id)
            .await?
            .ok_or_else(|| ConductError::NotFound(format!("Violation with ID {} not found", id)))
    }
}

fn recipient(teacher: &Teacher) -> Recipient {
    Recipient {
        name: teacher.name.clone(),
        email: teacher.email.clone(),
    }
}
