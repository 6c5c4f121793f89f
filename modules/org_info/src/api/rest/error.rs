use axum::extract::rejection::JsonRejection;

use crate::api::rest::problem::{self, ProblemResponse, ValidationError};
use crate::domain::error::DomainError;

/// Map a domain error onto a problem response for the given request path.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    let mut resp = match e {
        DomainError::NotFound { .. } => problem::not_found(e.to_string()),
        DomainError::InvalidInput { field, message } => {
            let mut resp = problem::bad_request(message.clone());
            resp.0 = resp.0.with_errors(vec![ValidationError {
                detail: message.clone(),
                pointer: format!("/{field}"),
            }]);
            resp
        }
        DomainError::Conflict { message } => problem::conflict(message.clone()),
        DomainError::StoreUnavailable { message, timed_out } => {
            let mut resp = problem::service_unavailable(message.clone());
            if *timed_out {
                resp.0 = resp.0.with_code("STORE_TIMEOUT");
            }
            resp
        }
    };
    resp.0 = resp.0.with_instance(instance);
    resp
}

/// Malformed or mistyped JSON bodies are plain input errors.
pub fn map_json_rejection(rejection: &JsonRejection, instance: &str) -> ProblemResponse {
    let mut resp = problem::bad_request(rejection.body_text());
    resp.0 = resp.0.with_instance(instance);
    resp
}
