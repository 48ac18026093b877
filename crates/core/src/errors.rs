use thiserror::Error;

use crate::models::violation::ViolationStatus;

#[derive(Error, Debug)]
pub enum ConductError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No detention slot with open capacity is available")]
    NoCapacityAvailable,

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: ViolationStatus,
        to: ViolationStatus,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] eyre::Report),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type ConductResult<T> = Result<T, ConductError>;
