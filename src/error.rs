use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::organizations::ParseRoleError;

/// The error type for every tenancy operation.
///
/// Authorization failures are terminal: callers must never retry or
/// downgrade a request after receiving one of them.
#[derive(Debug, thiserror::Error)]
pub enum TenancyError {
    /// The request carried no organization context header.
    #[error("{header} header required")]
    MissingOrgContext {
        /// Name of the expected header.
        header: String,
    },

    /// The organization context header was present but not a valid organization ID.
    #[error("Invalid {header} header")]
    InvalidOrgContext {
        /// Name of the offending header.
        header: String,
    },

    /// No principal was attached to the request by the authenticator.
    #[error("Authentication required")]
    Unauthenticated,

    /// The principal has no membership in the organization.
    ///
    /// Does not reveal whether the organization exists.
    #[error("Not a member of this org")]
    NotAMember,

    /// The principal's role is outside the allowed set.
    #[error("Insufficient role: requires one of {required}")]
    InsufficientRole {
        /// The allowed roles, comma separated.
        required: String,
    },

    /// A membership for this (user, org) pair already exists.
    #[error("User is already a member of this organization")]
    DuplicateMembership,

    /// Another organization already uses this name.
    #[error("Organization name already taken: {name}")]
    DuplicateOrgName {
        /// The conflicting name.
        name: String,
    },

    /// The requested role is not one of owner, admin, member.
    #[error(transparent)]
    InvalidRole(#[from] ParseRoleError),

    /// A required field is missing or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An entity referenced by an otherwise valid request does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backing store failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// JSON body returned for failed requests.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
    error_id: String,
}

impl TenancyError {
    pub fn missing_org_context(header: impl Into<String>) -> Self {
        Self::MissingOrgContext {
            header: header.into(),
        }
    }

    pub fn invalid_org_context(header: impl Into<String>) -> Self {
        Self::InvalidOrgContext {
            header: header.into(),
        }
    }

    pub fn insufficient_role(required: impl Into<String>) -> Self {
        Self::InsufficientRole {
            required: required.into(),
        }
    }

    pub fn duplicate_org_name(name: impl Into<String>) -> Self {
        Self::DuplicateOrgName { name: name.into() }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// HTTP status equivalent of this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingOrgContext { .. }
            | Self::InvalidOrgContext { .. }
            | Self::InvalidRole(_)
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::NotAMember | Self::InsufficientRole { .. } => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicateMembership | Self::DuplicateOrgName { .. } => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message suitable for clients.
    ///
    /// Storage failures are replaced by a generic message; the details only
    /// reach the server log.
    pub fn safe_message(&self) -> String {
        match self {
            Self::Storage(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Whether this error is an authorization denial.
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::NotAMember | Self::InsufficientRole { .. })
    }
}

impl IntoResponse for TenancyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                error_id = %error_id,
                error = %self,
                "Request failed"
            );
        } else {
            tracing::debug!(
                status = status.as_u16(),
                error_id = %error_id,
                error = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: self.safe_message(),
            error_id,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(feature = "database")]
impl From<sea_orm::DbErr> for TenancyError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Result type alias for tenancy operations.
pub type Result<T> = std::result::Result<T, TenancyError>;
