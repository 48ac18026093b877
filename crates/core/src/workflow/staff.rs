//! Staff registration, approval and roles.

use tracing::info;
use uuid::Uuid;

use crate::{
    errors::{ConductError, ConductResult},
    models::{
        notification::{NotificationEvent, TeacherStatusChanged},
        teacher::{NewTeacher, RegisterTeacherRequest, StaffRole, Teacher},
    },
    validation::{is_valid_email, require_text},
};

use super::{recipient, Workflow};

impl Workflow {
    /// New staff start as unapproved teachers. `id` is the identity the
    /// gateway authenticated.
    pub async fn register_teacher(
        &self,
        id: Uuid,
        request: RegisterTeacherRequest,
    ) -> ConductResult<Teacher> {
        let name = require_text("Name", &request.name)?;
        let email = request.email.trim().to_string();
        if !is_valid_email(&email) {
            return Err(ConductError::Validation("Invalid email".to_string()));
        }
        let teacher = self
            .store
            .insert_teacher(NewTeacher {
                id,
                name,
                email,
                role: StaffRole::Teacher,
                is_approved: false,
            })
            .await?;
        info!(teacher_id = %teacher.id, "teacher registered");
        Ok(teacher)
    }

    pub async fn get_teacher(&self, id: Uuid) -> ConductResult<Teacher> {
        self.require_teacher(id).await
    }

    pub async fn list_teachers(&self) -> ConductResult<Vec<Teacher>> {
        self.store.list_teachers().await
    }

    /// Approves or suspends a teacher and tells them about it.
    pub async fn set_teacher_approval(&self, id: Uuid, approved: bool) -> ConductResult<Teacher> {
        let teacher = self
            .store
            .set_teacher_approval(id, approved)
            .await?
            .ok_or_else(|| ConductError::NotFound(format!("Teacher with ID {} not found", id)))?;
        info!(teacher_id = %id, approved, "teacher approval changed");

        self.notify(NotificationEvent::TeacherStatusChanged(TeacherStatusChanged {
            teacher: recipient(&teacher),
            approved,
        }));
        Ok(teacher)
    }

    pub async fn set_teacher_role(&self, id: Uuid, role: StaffRole) -> ConductResult<Teacher> {
        let teacher = self
            .store
            .set_teacher_role(id, role)
            .await?
            .ok_or_else(|| ConductError::NotFound(format!("Teacher with ID {} not found", id)))?;
        info!(teacher_id = %id, role = %role, "teacher role changed");
        Ok(teacher)
    }
}
