//! Turns notification events into email messages.

use chrono::NaiveDate;
use conduct_core::{
    errors::ConductResult,
    models::notification::{
        DetentionAssigned, DetentionRescheduled, MonitorReminder, MonitorSignup,
        NotificationEvent, TeacherStatusChanged,
    },
};

use crate::{
    config::NotifierConfig,
    mailer::Email,
    templates::{
        DETENTION_ASSIGNED, DETENTION_RESCHEDULED, MONITOR_REMINDER, MONITOR_SIGNUP,
        PARENT_ACCESS, TEACHER_APPROVED, TEACHER_SUSPENDED, Template, Vars,
    },
};

/// "Thursday, October 15, 2026"
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

#[derive(Debug, Clone)]
pub struct Composer {
    pub portal_url: String,
    pub detention_time: String,
}

impl Composer {
    pub fn new(config: &NotifierConfig) -> Self {
        Self {
            portal_url: config.portal_url.clone(),
            detention_time: config.detention_time.clone(),
        }
    }

    pub fn compose(&self, event: &NotificationEvent) -> ConductResult<Email> {
        match event {
            NotificationEvent::DetentionAssigned(event) => self.detention_assigned(event),
            NotificationEvent::DetentionRescheduled(event) => self.detention_rescheduled(event),
            NotificationEvent::MonitorSignup(event) => self.monitor_signup(event),
            NotificationEvent::MonitorReminder(event) => self.monitor_reminder(event),
            NotificationEvent::TeacherStatusChanged(event) => self.teacher_status(event),
        }
    }

    fn detention_assigned(&self, event: &DetentionAssigned) -> ConductResult<Email> {
        let vars = Vars::from([
            ("student_name", event.student_name.clone()),
            ("violation_type", event.violation_type.clone()),
            ("teacher_name", event.teacher.name.clone()),
            ("assigned_date", long_date(event.assigned_date)),
            ("detention_date", long_date(event.detention_date)),
            ("detention_time", self.detention_time.clone()),
            ("location", event.location.clone()),
        ]);
        let (subject, mut html) = DETENTION_ASSIGNED.render(&vars)?;

        if let Some(code) = &event.parent_access_code {
            let access = Vars::from([
                ("portal_url", self.portal_url.clone()),
                ("access_code", code.clone()),
            ]);
            let (_, section) = PARENT_ACCESS.render(&access)?;
            html.push_str(&section);
        }

        Ok(Email {
            to: vec![event.student_email.clone()],
            cc: event.parent_email.iter().cloned().collect(),
            subject,
            html,
        })
    }

    fn detention_rescheduled(&self, event: &DetentionRescheduled) -> ConductResult<Email> {
        let vars = Vars::from([
            ("student_name", event.student_name.clone()),
            ("violation_type", event.violation_type.clone()),
            ("new_date", long_date(event.new_date)),
            ("detention_time", self.detention_time.clone()),
            ("location", event.location.clone()),
        ]);
        let (subject, html) = DETENTION_RESCHEDULED.render(&vars)?;
        Ok(Email {
            to: vec![event.student_email.clone()],
            cc: vec![event.teacher.email.clone()],
            subject,
            html,
        })
    }

    fn monitor_signup(&self, event: &MonitorSignup) -> ConductResult<Email> {
        let dates = event
            .dates
            .iter()
            .map(|date| long_date(*date))
            .collect::<Vec<_>>()
            .join("; ");
        let vars = Vars::from([
            ("teacher_name", event.teacher.name.clone()),
            ("location", event.location.clone()),
            ("dates", dates),
        ]);
        to_teacher(&event.teacher.email, MONITOR_SIGNUP, &vars)
    }

    fn monitor_reminder(&self, event: &MonitorReminder) -> ConductResult<Email> {
        let vars = Vars::from([
            ("teacher_name", event.teacher.name.clone()),
            ("date", long_date(event.date)),
            ("detention_time", self.detention_time.clone()),
            ("location", event.location.clone()),
        ]);
        to_teacher(&event.teacher.email, MONITOR_REMINDER, &vars)
    }

    fn teacher_status(&self, event: &TeacherStatusChanged) -> ConductResult<Email> {
        let template = if event.approved {
            TEACHER_APPROVED
        } else {
            TEACHER_SUSPENDED
        };
        let vars = Vars::from([("teacher_name", event.teacher.name.clone())]);
        to_teacher(&event.teacher.email, template, &vars)
    }
}

fn to_teacher(email: &str, template: Template, vars: &Vars) -> ConductResult<Email> {
    let (subject, html) = template.render(vars)?;
    Ok(Email {
        to: vec![email.to_string()],
        cc: Vec::new(),
        subject,
        html,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduct_core::models::notification::Recipient;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn composer() -> Composer {
        Composer {
            portal_url: "https://school.test/parent".to_string(),
            detention_time: "3:45 PM".to_string(),
        }
    }

    fn teacher() -> Recipient {
        Recipient {
            name: "Ms. Rivera".to_string(),
            email: "rivera@school.test".to_string(),
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn assigned(code: Option<&str>) -> NotificationEvent {
        NotificationEvent::DetentionAssigned(DetentionAssigned {
            violation_id: Uuid::new_v4(),
            student_name: "Ana".to_string(),
            student_email: "ana@school.test".to_string(),
            parent_email: Some("parent@home.test".to_string()),
            parent_access_code: code.map(str::to_string),
            teacher: teacher(),
            violation_type: "tardy".to_string(),
            assigned_date: date(15),
            detention_date: date(20),
            location: "Room 204".to_string(),
        })
    }

    #[test]
    fn long_date_format() {
        assert_eq!(long_date(date(15)), "Thursday, October 15, 2026");
    }

    #[test]
    fn detention_notice_copies_parent_and_shows_code() {
        let email = composer().compose(&assigned(Some("QWERTY23"))).unwrap();
        assert_eq!(email.to, vec!["ana@school.test".to_string()]);
        assert_eq!(email.cc, vec!["parent@home.test".to_string()]);
        assert_eq!(email.subject, "Detention assigned for Ana");
        assert!(email.html.contains("Tuesday, October 20, 2026"));
        assert!(email.html.contains("3:45 PM"));
        assert!(email.html.contains("QWERTY23"));
        assert!(email.html.contains("https://school.test/parent"));
    }

    #[test]
    fn verified_parent_gets_no_code() {
        let email = composer().compose(&assigned(None)).unwrap();
        assert!(!email.html.contains("access code"));
    }

    #[test]
    fn reschedule_copies_teacher() {
        let email = composer()
            .compose(&NotificationEvent::DetentionRescheduled(DetentionRescheduled {
                violation_id: Uuid::new_v4(),
                student_name: "Ana".to_string(),
                student_email: "ana@school.test".to_string(),
                teacher: teacher(),
                violation_type: "tardy".to_string(),
                new_date: date(22),
                location: "Cafeteria".to_string(),
            }))
            .unwrap();
        assert_eq!(email.cc, vec!["rivera@school.test".to_string()]);
        assert!(email.html.contains("Thursday, October 22, 2026"));
    }

    #[test]
    fn suspension_uses_its_own_template() {
        let email = composer()
            .compose(&NotificationEvent::TeacherStatusChanged(TeacherStatusChanged {
                teacher: teacher(),
                approved: false,
            }))
            .unwrap();
        assert_eq!(email.subject, "Your account has been suspended");
        assert_eq!(email.to, vec!["rivera@school.test".to_string()]);
    }

    #[test]
    fn signup_lists_every_date() {
        let email = composer()
            .compose(&NotificationEvent::MonitorSignup(MonitorSignup {
                teacher: teacher(),
                dates: vec![date(20), date(21)],
                location: "Library".to_string(),
            }))
            .unwrap();
        assert!(email.html.contains("Tuesday, October 20, 2026; Wednesday, October 21, 2026"));
    }
}
