use std::fmt;

use thiserror::Error;

/// Which record family an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Department,
    Employee,
    Project,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Department => "Department",
            Self::Employee => "Employee",
            Self::Project => "Project",
        })
    }
}

/// Discriminant of [`DomainError`] for callers that branch on kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Conflict,
    StoreUnavailable,
}

/// The closed failure taxonomy shared by repositories, validation and the
/// cascade orchestrator. No store driver error crosses this boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },

    #[error("invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("store unavailable: {message}")]
    StoreUnavailable { message: String, timed_out: bool },
}

impl DomainError {
    pub fn not_found(entity: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Referential failure: the employee points at a department that does not exist.
    pub fn department_not_found(id: impl fmt::Display) -> Self {
        Self::invalid_input("department_id", format!("department not found: {id}"))
    }

    /// Referential failure: a project team member that does not exist.
    pub fn employee_not_found(id: impl fmt::Display) -> Self {
        Self::invalid_input("team_member_ids", format!("employee not found: {id}"))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timed_out(operation: &str) -> Self {
        Self::StoreUnavailable {
            message: format!("{operation} timed out"),
            timed_out: true,
        }
    }

    pub fn cancelled(operation: &str) -> Self {
        Self::StoreUnavailable {
            message: format!("{operation} cancelled"),
            timed_out: false,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::StoreUnavailable
    }
}
