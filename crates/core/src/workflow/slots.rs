//! Detention slot scheduling, monitor sign-up and rosters.

use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    errors::{ConductError, ConductResult},
    models::{
        notification::{MonitorReminder, MonitorSignup, NotificationEvent},
        slot::{
            CreateSlotRequest, DetentionSlot, MonitorSignupRequest, NewSlot, RosterEntry,
            SlotQuery, SlotRosterResponse, UpdateSlotRequest, DEFAULT_CAPACITY, DEFAULT_LOCATION,
        },
        teacher::Teacher,
    },
    validation::{require_text, validate_capacity},
};

use super::{recipient, Workflow};

fn location_or_default(location: Option<String>) -> ConductResult<String> {
    match location {
        Some(location) => require_text("Location", &location),
        None => Ok(DEFAULT_LOCATION.to_string()),
    }
}

impl Workflow {
    fn require_future(&self, date: NaiveDate) -> ConductResult<()> {
        if date <= self.clock.today() {
            return Err(ConductError::Validation(format!(
                "Detention date {} is not in the future",
                date
            )));
        }
        Ok(())
    }

    /// Admin scheduling of a slot on behalf of any teacher.
    pub async fn schedule_slot(&self, request: CreateSlotRequest) -> ConductResult<DetentionSlot> {
        let capacity = request.capacity.unwrap_or(DEFAULT_CAPACITY);
        validate_capacity(capacity)?;
        let location = location_or_default(request.location)?;
        self.require_future(request.date)?;
        let teacher = self.require_teacher(request.teacher_id).await?;

        let slot = self
            .store
            .insert_slot(NewSlot {
                date: request.date,
                teacher_id: teacher.id,
                location,
                capacity,
            })
            .await?;
        info!(slot_id = %slot.id, date = %slot.date, teacher_id = %teacher.id, "slot scheduled");
        Ok(slot)
    }

    /// A teacher volunteers to monitor detention on each of `dates`. Dates
    /// that already have a slot are refused as a whole request.
    pub async fn sign_up_monitor(
        &self,
        teacher_id: Uuid,
        request: MonitorSignupRequest,
    ) -> ConductResult<Vec<DetentionSlot>> {
        if request.dates.is_empty() {
            return Err(ConductError::Validation(
                "At least one date is required".to_string(),
            ));
        }
        let capacity = request.capacity.unwrap_or(DEFAULT_CAPACITY);
        validate_capacity(capacity)?;
        let location = location_or_default(request.location)?;
        let teacher = self.require_teacher(teacher_id).await?;

        let mut dates = request.dates;
        dates.sort();
        dates.dedup();
        for date in &dates {
            self.require_future(*date)?;
        }

        let (first, last) = (dates[0], dates[dates.len() - 1]);
        let taken: HashSet<NaiveDate> = self
            .store
            .list_slots(Some(first), Some(last))
            .await?
            .into_iter()
            .map(|slot| slot.date)
            .collect();
        let clashes: Vec<String> = dates
            .iter()
            .filter(|date| taken.contains(date))
            .map(|date| date.to_string())
            .collect();
        if !clashes.is_empty() {
            return Err(ConductError::Conflict(format!(
                "Dates already have a monitor: {}",
                clashes.join(", ")
            )));
        }

        let mut created = Vec::with_capacity(dates.len());
        for date in &dates {
            let slot = self
                .store
                .insert_slot(NewSlot {
                    date: *date,
                    teacher_id: teacher.id,
                    location: location.clone(),
                    capacity,
                })
                .await?;
            created.push(slot);
        }
        info!(teacher_id = %teacher.id, count = created.len(), "monitor signed up");

        self.notify(NotificationEvent::MonitorSignup(MonitorSignup {
            teacher: recipient(&teacher),
            dates,
            location,
        }));
        Ok(created)
    }

    pub async fn update_slot(
        &self,
        id: Uuid,
        request: UpdateSlotRequest,
    ) -> ConductResult<DetentionSlot> {
        if let Some(capacity) = request.capacity {
            validate_capacity(capacity)?;
        }
        let location = request
            .location
            .map(|location| require_text("Location", &location))
            .transpose()?;
        self.store
            .update_slot(id, request.capacity, location)
            .await?
            .ok_or_else(|| ConductError::NotFound(format!("Detention slot with ID {} not found", id)))
    }

    pub async fn delete_slot(&self, id: Uuid) -> ConductResult<()> {
        if !self.store.delete_slot(id).await? {
            return Err(ConductError::NotFound(format!(
                "Detention slot with ID {} not found",
                id
            )));
        }
        info!(slot_id = %id, "slot deleted");
        Ok(())
    }

    pub async fn get_slot(&self, id: Uuid) -> ConductResult<DetentionSlot> {
        self.require_slot(id).await
    }

    /// With `available`, only bookable slots: after today, within the
    /// look-ahead window and with a free seat.
    pub async fn list_slots(&self, query: SlotQuery) -> ConductResult<Vec<DetentionSlot>> {
        if !query.available {
            return self.store.list_slots(query.from, query.to).await;
        }
        let today = self.clock.today();
        let until = today
            .checked_add_days(Days::new(self.policy.lookahead_days.max(0) as u64))
            .unwrap_or(NaiveDate::MAX);
        self.store.open_slots_after(today, Some(until)).await
    }

    pub async fn slot_roster(&self, id: Uuid) -> ConductResult<SlotRosterResponse> {
        let slot = self.require_slot(id).await?;
        let mut entries = Vec::new();
        for violation in self.store.list_violations_for_slot(id).await? {
            let Some(student) = self.store.get_student(violation.student_id).await? else {
                continue;
            };
            entries.push(RosterEntry {
                violation_id: violation.id,
                student_id: student.id,
                student_name: student.name,
                barcode: student.barcode,
                violation_type: violation.violation_type,
                status: violation.status,
            });
        }
        entries.sort_by(|a, b| a.student_name.cmp(&b.student_name));
        Ok(SlotRosterResponse { slot, entries })
    }

    /// Sends one reminder per teacher monitoring today. Running it twice
    /// sends twice. Returns the number of reminders queued.
    pub async fn send_monitor_reminders(&self) -> ConductResult<usize> {
        let today = self.clock.today();
        let slots = self.store.list_slots(Some(today), Some(today)).await?;

        let mut teachers: HashMap<Uuid, Option<Teacher>> = HashMap::new();
        let mut sent = 0;
        for slot in slots {
            if teachers.contains_key(&slot.teacher_id) {
                continue;
            }
            let teacher = self.store.get_teacher(slot.teacher_id).await?;
            match &teacher {
                Some(teacher) => {
                    self.notify(NotificationEvent::MonitorReminder(MonitorReminder {
                        teacher: recipient(teacher),
                        date: slot.date,
                        location: slot.location.clone(),
                    }));
                    sent += 1;
                }
                None => warn!(slot_id = %slot.id, "slot has no teacher on file"),
            }
            teachers.insert(slot.teacher_id, teacher);
        }
        info!(date = %today, sent, "monitor reminders queued");
        Ok(sent)
    }
}
