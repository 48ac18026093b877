//! Student roster, parent access codes and the parent portal lookup.

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    access_code::{generate_access_code, normalize_access_code},
    errors::{ConductError, ConductResult},
    models::student::{
        CreateStudentRequest, ImportRowResult, ImportStudentsResponse, NewStudent, ParentAccount,
        Student, StudentRecordResponse, UpdateStudentRequest,
    },
    validation::{is_valid_barcode, validate_new_student, validate_student_changes},
};

use super::Workflow;

const SEARCH_LIMIT: usize = 5;

/// Blank optional emails are treated as absent.
fn optional_email(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Workflow {
    pub async fn create_student(&self, request: CreateStudentRequest) -> ConductResult<Student> {
        let request = CreateStudentRequest {
            parent_email: optional_email(request.parent_email),
            ..request
        };
        validate_new_student(&request)?;

        let student = self
            .store
            .insert_student(NewStudent {
                name: request.name.trim().to_string(),
                email: request.email.trim().to_string(),
                parent_email: request.parent_email,
                barcode: request.barcode.trim().to_string(),
                grade: request.grade,
                parent_access_code: generate_access_code(),
            })
            .await?;
        info!(student_id = %student.id, barcode = %student.barcode, "student created");
        Ok(student)
    }

    /// Rows are created one at a time; a bad row is reported and skipped.
    pub async fn import_students(&self, rows: Vec<CreateStudentRequest>) -> ImportStudentsResponse {
        let mut results = Vec::with_capacity(rows.len());
        for (row, request) in rows.into_iter().enumerate() {
            let barcode = request.barcode.trim().to_string();
            let result = match self.create_student(request).await {
                Ok(student) => ImportRowResult {
                    row: row + 1,
                    barcode,
                    student_id: Some(student.id),
                    error: None,
                },
                Err(err) => ImportRowResult {
                    row: row + 1,
                    barcode,
                    student_id: None,
                    error: Some(err.to_string()),
                },
            };
            results.push(result);
        }

        let imported = results.iter().filter(|r| r.student_id.is_some()).count();
        let failed = results.len() - imported;
        if failed > 0 {
            warn!(imported, failed, "student import finished with errors");
        } else {
            info!(imported, "student import finished");
        }
        ImportStudentsResponse {
            imported,
            failed,
            rows: results,
        }
    }

    pub async fn update_student(
        &self,
        id: Uuid,
        changes: UpdateStudentRequest,
    ) -> ConductResult<Student> {
        validate_student_changes(&changes)?;
        let changes = UpdateStudentRequest {
            name: changes.name.map(|v| v.trim().to_string()),
            email: changes.email.map(|v| v.trim().to_string()),
            parent_email: changes.parent_email.map(|v| v.trim().to_string()),
            barcode: changes.barcode.map(|v| v.trim().to_string()),
            grade: changes.grade,
        };
        self.store
            .update_student(id, changes)
            .await?
            .ok_or_else(|| ConductError::NotFound(format!("Student with ID {} not found", id)))
    }

    /// Seats held by the student's unresolved violations are given back.
    pub async fn delete_student(&self, id: Uuid) -> ConductResult<()> {
        if !self.store.delete_student(id).await? {
            return Err(ConductError::NotFound(format!(
                "Student with ID {} not found",
                id
            )));
        }
        info!(student_id = %id, "student deleted");
        Ok(())
    }

    pub async fn get_student(&self, id: Uuid) -> ConductResult<Student> {
        self.require_student(id).await
    }

    pub async fn list_students(&self) -> ConductResult<Vec<Student>> {
        self.store.list_students().await
    }

    pub async fn search_students(&self, query: &str) -> ConductResult<Vec<Student>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.store.search_students(query, SEARCH_LIMIT).await
    }

    /// Lookup for the scanner station.
    pub async fn find_by_barcode(&self, barcode: &str) -> ConductResult<Student> {
        let barcode = barcode.trim();
        if !is_valid_barcode(barcode) {
            return Err(ConductError::Validation(
                "Barcode must be 6 digits".to_string(),
            ));
        }
        self.store
            .get_student_by_barcode(barcode)
            .await?
            .ok_or_else(|| ConductError::NotFound(format!("No student with barcode {}", barcode)))
    }

    /// Issues a fresh code. The parent must verify again.
    pub async fn regenerate_access_code(&self, id: Uuid) -> ConductResult<Student> {
        let student = self
            .store
            .set_access_code(id, &generate_access_code())
            .await?
            .ok_or_else(|| ConductError::NotFound(format!("Student with ID {} not found", id)))?;
        info!(student_id = %id, "parent access code regenerated");
        Ok(student)
    }

    pub async fn update_parent_email(&self, id: Uuid, parent_email: &str) -> ConductResult<Student> {
        self.update_student(
            id,
            UpdateStudentRequest {
                parent_email: Some(parent_email.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn parent_accounts(&self) -> ConductResult<Vec<ParentAccount>> {
        Ok(self
            .store
            .list_students()
            .await?
            .into_iter()
            .map(ParentAccount::from)
            .collect())
    }

    /// Everything on file for one student: violations newest first, then
    /// the warning history.
    pub async fn student_record(&self, id: Uuid) -> ConductResult<StudentRecordResponse> {
        let student = self.require_student(id).await?;
        let violations = self.store.list_violations_for_student(id).await?;
        let warnings = self.store.list_warnings(id).await?;
        Ok(StudentRecordResponse {
            student,
            violations,
            warnings,
        })
    }

    /// Parent portal entry. The first successful use marks the parent as
    /// verified.
    pub async fn verify_access_code(&self, code: &str) -> ConductResult<StudentRecordResponse> {
        let code = normalize_access_code(code);
        let Some(student) = self.store.get_student_by_access_code(&code).await? else {
            warn!("parent access code rejected");
            return Err(ConductError::Authentication(
                "Invalid access code".to_string(),
            ));
        };

        if !student.parent_verified {
            self.store
                .mark_parent_verified(student.id, self.clock.now())
                .await?;
            info!(student_id = %student.id, "parent verified");
        }
        self.student_record(student.id).await
    }
}
