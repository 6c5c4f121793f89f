use serde::Serialize;

use crate::contract::error::OrgInfoError;

/// Error entry as rendered in a graph response's `errors` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphError {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    pub extensions: GraphErrorExtensions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphErrorExtensions {
    /// NOT_FOUND, BAD_USER_INPUT, CONFLICT or STORE_UNAVAILABLE
    pub code: &'static str,
    pub retryable: bool,
}

pub type GraphResult<T> = Result<T, GraphError>;

impl GraphError {
    pub fn code(&self) -> &'static str {
        self.extensions.code
    }

    /// Attach the field path that produced the error.
    pub fn at(mut self, field: &str) -> Self {
        self.path.push(field.to_string());
        self
    }
}

impl From<OrgInfoError> for GraphError {
    fn from(e: OrgInfoError) -> Self {
        let code = match &e {
            OrgInfoError::NotFound { .. } => "NOT_FOUND",
            OrgInfoError::InvalidInput { .. } => "BAD_USER_INPUT",
            OrgInfoError::Conflict { .. } => "CONFLICT",
            OrgInfoError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
        };
        Self {
            message: e.to_string(),
            path: Vec::new(),
            extensions: GraphErrorExtensions {
                code,
                retryable: e.is_retryable(),
            },
        }
    }
}
