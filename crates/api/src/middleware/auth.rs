//! # Authentication Module
//!
//! The hosting gateway authenticates staff and forwards the identity in the
//! `x-user-id` header. These extractors turn that header into a staff record
//! and enforce approval and role.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use conduct_core::{
    errors::ConductError,
    models::teacher::Teacher,
};
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated identity, whether or not a staff record exists yet.
#[derive(Debug, Clone, Copy)]
pub struct Identity(pub Uuid);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ConductError::Authentication("Missing user identity".to_string()))?;
        let id = value
            .to_str()
            .ok()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .ok_or_else(|| ConductError::Authentication("Malformed user identity".to_string()))?;
        Ok(Identity(id))
    }
}

/// An approved staff member.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Teacher);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let Identity(id) = Identity::from_request_parts(parts, state).await?;
        let teacher = match state.workflow.get_teacher(id).await {
            Ok(teacher) => teacher,
            Err(ConductError::NotFound(_)) => {
                return Err(ConductError::Authentication("Unknown staff member".to_string()).into());
            }
            Err(err) => return Err(err.into()),
        };
        if !teacher.is_approved {
            return Err(ConductError::Authorization(
                "Account is awaiting administrator approval".to_string(),
            )
            .into());
        }
        Ok(CurrentUser(teacher))
    }
}

/// An approved staff member with the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Teacher);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(teacher) = CurrentUser::from_request_parts(parts, state).await?;
        if !teacher.is_admin() {
            return Err(ConductError::Authorization("Admin role required".to_string()).into());
        }
        Ok(AdminUser(teacher))
    }
}
