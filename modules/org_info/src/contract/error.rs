use thiserror::Error;

/// Errors that are safe to expose to other modules.
///
/// Same four kinds as the domain taxonomy, with payloads flattened to text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrgInfoError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    InvalidInput { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String, timed_out: bool },
}

impl OrgInfoError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn store_unavailable(message: impl Into<String>, timed_out: bool) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            timed_out,
        }
    }

    /// Only store outages are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }
}

impl From<crate::domain::error::DomainError> for OrgInfoError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            e @ NotFound { .. } => Self::not_found(e.to_string()),
            InvalidInput { field, message } => Self::invalid_input(format!("{field}: {message}")),
            Conflict { message } => Self::conflict(message),
            StoreUnavailable { message, timed_out } => Self::store_unavailable(message, timed_out),
        }
    }
}
