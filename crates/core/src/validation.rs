//! Input checks shared by the API and the workflow.

use crate::{
    errors::{ConductError, ConductResult},
    models::student::{CreateStudentRequest, UpdateStudentRequest},
};

pub const BARCODE_LEN: usize = 6;
pub const MIN_GRADE: i32 = 9;
pub const MAX_GRADE: i32 = 12;

pub fn is_valid_barcode(barcode: &str) -> bool {
    barcode.len() == BARCODE_LEN && barcode.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .rsplit_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && tld.len() >= 2)
        && !email.chars().any(char::is_whitespace)
}

pub fn require_text(field: &str, value: &str) -> ConductResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConductError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn check_barcode(barcode: &str) -> ConductResult<()> {
    if !is_valid_barcode(barcode) {
        return Err(ConductError::Validation(
            "Barcode must be 6 digits".to_string(),
        ));
    }
    Ok(())
}

fn check_email(field: &str, email: &str) -> ConductResult<()> {
    if !is_valid_email(email) {
        return Err(ConductError::Validation(format!("Invalid {}", field)));
    }
    Ok(())
}

fn check_grade(grade: i32) -> ConductResult<()> {
    if !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
        return Err(ConductError::Validation(format!(
            "Grade must be between {} and {}",
            MIN_GRADE, MAX_GRADE
        )));
    }
    Ok(())
}

pub fn validate_new_student(request: &CreateStudentRequest) -> ConductResult<()> {
    require_text("Name", &request.name)?;
    check_email("email", request.email.trim())?;
    if let Some(parent_email) = &request.parent_email {
        check_email("parent email", parent_email.trim())?;
    }
    check_barcode(request.barcode.trim())?;
    check_grade(request.grade)
}

pub fn validate_student_changes(changes: &UpdateStudentRequest) -> ConductResult<()> {
    if let Some(name) = &changes.name {
        require_text("Name", name)?;
    }
    if let Some(email) = &changes.email {
        check_email("email", email.trim())?;
    }
    if let Some(parent_email) = &changes.parent_email {
        check_email("parent email", parent_email.trim())?;
    }
    if let Some(barcode) = &changes.barcode {
        check_barcode(barcode.trim())?;
    }
    if let Some(grade) = changes.grade {
        check_grade(grade)?;
    }
    Ok(())
}

pub fn validate_capacity(capacity: i32) -> ConductResult<()> {
    if capacity < 1 {
        return Err(ConductError::Validation(
            "Capacity must be a positive number".to_string(),
        ));
    }
    Ok(())
}
