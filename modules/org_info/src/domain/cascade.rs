use tracing::{debug, info, warn};

use crate::contract::ctx::OpCtx;
use crate::contract::model::{CascadeFailure, CascadeReport};
use crate::domain::error::{DomainError, ErrorKind};
use crate::domain::guard::bounded;
use crate::domain::repo::{DepartmentRepository, EmployeeRepository};

/// Delete a department after deleting every employee that references it.
///
/// Steps: verify the department, enumerate its employees, delete each one
/// (best effort, failures are collected and the batch continues), then delete
/// the department. Nothing is mutated when verification or enumeration fails.
/// The sequence is not atomic: an employee created after enumeration is not
/// seen, and the store's foreign key decides whether the final delete then
/// fails with `Conflict`.
pub async fn cascade_delete_department(
    ctx: &OpCtx,
    departments: &dyn DepartmentRepository,
    employees: &dyn EmployeeRepository,
    id: &str,
) -> Result<CascadeReport, DomainError> {
    let department = bounded(ctx, "department.find_by_id", departments.find_by_id(id)).await?;

    let dependents = match bounded(
        ctx,
        "employee.find_by_department_id",
        employees.find_by_department_id(id),
    )
    .await
    {
        Ok(list) => list,
        Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
        Err(DomainError::StoreUnavailable { message, timed_out }) => {
            return Err(DomainError::StoreUnavailable { message, timed_out })
        }
        Err(e) => {
            return Err(DomainError::store_unavailable(format!(
                "failed to enumerate employees of department {}: {e}",
                department.id
            )))
        }
    };
    debug!(
        department_id = %department.id,
        employees = dependents.len(),
        "cascade: dependents enumerated"
    );

    let mut report = CascadeReport {
        department_id: department.id,
        deleted_employee_ids: Vec::with_capacity(dependents.len()),
        failures: Vec::new(),
    };

    for employee in dependents {
        let employee_id = employee.id.to_string();
        match bounded(ctx, "employee.delete", employees.delete(&employee_id)).await {
            Ok(()) => report.deleted_employee_ids.push(employee.id),
            // Already gone counts as deleted.
            Err(e) if e.kind() == ErrorKind::NotFound => {
                report.deleted_employee_ids.push(employee.id)
            }
            Err(e) => {
                warn!(
                    department_id = %department.id,
                    employee_id = %employee.id,
                    error = %e,
                    "cascade: failed to delete employee, continuing"
                );
                report.failures.push(CascadeFailure {
                    employee_id: employee.id,
                    reason: e.to_string(),
                    retryable: e.is_retryable(),
                });
            }
        }
    }

    if let Err(e) = bounded(ctx, "department.delete", departments.delete(id)).await {
        if !report.failures.is_empty() {
            warn!(
                department_id = %department.id,
                failed = report.failures.len(),
                error = %e,
                "cascade: department delete failed after partial employee cleanup"
            );
        }
        return Err(e);
    }

    info!(
        department_id = %department.id,
        deleted = report.deleted_employee_ids.len(),
        failed = report.failures.len(),
        "cascade: department deleted"
    );
    Ok(report)
}
