use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::contract::ctx::OpCtx;
use crate::domain::error::{DomainError, ErrorKind};
use crate::domain::guard::bounded;
use crate::domain::ids::parse_id;
use crate::domain::repo::{DepartmentRepository, EmployeeRepository};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// `local@domain.tld`: one `@`, a dotted domain, letters-only TLD of two or more.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Trim a required name and check its length (in characters).
pub fn validate_name(field: &str, value: &str, max_len: usize) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_input(field, format!("{field} is required")));
    }
    let len = trimmed.chars().count();
    if len > max_len {
        return Err(DomainError::invalid_input(
            field,
            format!("{field} too long: {len} characters (max: {max_len})"),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_email(email: &str) -> Result<String, DomainError> {
    if email.is_empty() {
        return Err(DomainError::invalid_input("email", "email is required"));
    }
    if !is_valid_email(email) {
        return Err(DomainError::invalid_input("email", "invalid email format"));
    }
    Ok(email.to_string())
}

pub fn validate_budget(budget: f64) -> Result<f64, DomainError> {
    if !budget.is_finite() || budget <= 0.0 {
        return Err(DomainError::invalid_input(
            "budget",
            "budget must be a positive number",
        ));
    }
    Ok(budget)
}

pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), DomainError> {
    if end < start {
        return Err(DomainError::invalid_input(
            "end_date",
            format!("end date {end} is before start date {start}"),
        ));
    }
    Ok(())
}

/// Referential gate for employee writes: the department must resolve.
///
/// Absence is reported as `InvalidInput` ("department not found"), not as
/// `NotFound`, because the request itself is what is wrong.
pub async fn ensure_department_exists(
    ctx: &OpCtx,
    departments: &dyn DepartmentRepository,
    department_id: &str,
) -> Result<Uuid, DomainError> {
    let id = parse_id("department_id", department_id)?;
    match bounded(ctx, "department.find_by_id", departments.find_by_id(department_id)).await {
        Ok(department) => Ok(department.id),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(DomainError::department_not_found(id)),
        Err(e) => Err(e),
    }
}

/// Resolve every team member id, deduplicated in input order.
pub async fn ensure_employees_exist(
    ctx: &OpCtx,
    employees: &dyn EmployeeRepository,
    employee_ids: &[String],
) -> Result<Vec<Uuid>, DomainError> {
    let mut resolved = Vec::with_capacity(employee_ids.len());
    for raw in employee_ids {
        let id = parse_id("team_member_ids", raw)?;
        if resolved.contains(&id) {
            continue;
        }
        match bounded(ctx, "employee.find_by_id", employees.find_by_id(raw)).await {
            Ok(_) => resolved.push(id),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DomainError::employee_not_found(id))
            }
            Err(e) => return Err(e),
        }
    }
    Ok(resolved)
}
