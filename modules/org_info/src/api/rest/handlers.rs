use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path},
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    Extension,
};
use tracing::{error, info, warn};

use crate::api::rest::dto::{
    CascadeReportDto, CreateDepartmentReq, CreateEmployeeReq, CreateProjectReq, DepartmentDto,
    EmployeeDto, HealthDto, ProjectDto, UpdateDepartmentReq, UpdateEmployeeReq,
    UpdateProjectReq,
};
use crate::api::rest::error::{map_domain_error, map_json_rejection};
use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::contract::ctx::OpCtx;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// Per-request store deadline, installed as a router extension.
#[derive(Debug, Clone, Copy)]
pub struct RequestTimeout(pub Duration);

impl RequestTimeout {
    fn ctx(self) -> OpCtx {
        if self.0.is_zero() {
            OpCtx::new()
        } else {
            OpCtx::with_timeout(self.0)
        }
    }
}

type ApiResult<T> = Result<T, ProblemResponse>;

fn fail(uri: &Uri, what: &str, e: &DomainError) -> ProblemResponse {
    if e.is_retryable() {
        error!("{what} failed: {e}");
    } else {
        info!("{what} rejected: {e}");
    }
    map_domain_error(e, uri.path())
}

fn body<T>(uri: &Uri, payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload.map(|Json(req)| req).map_err(|rejection| {
        warn!("rejected request body on {}: {}", uri.path(), rejection);
        map_json_rejection(&rejection, uri.path())
    })
}

/// Liveness probe
#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = HealthDto)))]
pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

// --- departments ---

/// List all departments ordered by name
#[utoipa::path(get, path = "/api/v1/departments", tag = "departments",
    responses(
        (status = 200, description = "List of departments", body = [DepartmentDto]),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn list_departments(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<DepartmentDto>>> {
    match svc.list_departments(&timeout.ctx()).await {
        Ok(departments) => Ok(Json(departments.into_iter().map(Into::into).collect())),
        Err(e) => Err(fail(&uri, "list departments", &e)),
    }
}

/// Get a department by ID
#[utoipa::path(get, path = "/api/v1/departments/{id}", tag = "departments",
    params(("id" = String, Path, description = "Department UUID")),
    responses(
        (status = 200, description = "Department found", body = DepartmentDto),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn get_department(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<DepartmentDto>> {
    match svc.get_department(&timeout.ctx(), &id).await {
        Ok(department) => Ok(Json(department.into())),
        Err(e) => Err(fail(&uri, "get department", &e)),
    }
}

/// Create a new department
#[utoipa::path(post, path = "/api/v1/departments", tag = "departments",
    request_body = CreateDepartmentReq,
    responses(
        (status = 201, description = "Created department", body = DepartmentDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 409, description = "Conflict", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn create_department(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<CreateDepartmentReq>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DepartmentDto>)> {
    let req = body(&uri, payload)?;
    info!("Creating department: {:?}", req);
    match svc.create_department(&timeout.ctx(), req.into()).await {
        Ok(department) => Ok((StatusCode::CREATED, Json(department.into()))),
        Err(e) => Err(fail(&uri, "create department", &e)),
    }
}

/// Rename a department
#[utoipa::path(put, path = "/api/v1/departments/{id}", tag = "departments",
    params(("id" = String, Path, description = "Department UUID")),
    request_body = UpdateDepartmentReq,
    responses(
        (status = 200, description = "Updated department", body = DepartmentDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn update_department(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<UpdateDepartmentReq>, JsonRejection>,
) -> ApiResult<Json<DepartmentDto>> {
    let req = body(&uri, payload)?;
    match svc.update_department(&timeout.ctx(), &id, req.into()).await {
        Ok(department) => Ok(Json(department.into())),
        Err(e) => Err(fail(&uri, "update department", &e)),
    }
}

/// Delete a department and its employees.
///
/// 204 when everything was removed, 200 with the cascade report when some
/// employee deletes failed but the department itself is gone.
#[utoipa::path(delete, path = "/api/v1/departments/{id}", tag = "departments",
    params(("id" = String, Path, description = "Department UUID")),
    responses(
        (status = 204, description = "Department and employees deleted"),
        (status = 200, description = "Department deleted, some employees left behind", body = CascadeReportDto),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 409, description = "Department still referenced", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn delete_department(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Response> {
    info!("Deleting department: {}", id);
    match svc.delete_department(&timeout.ctx(), &id).await {
        Ok(report) if report.is_complete() => Ok(StatusCode::NO_CONTENT.into_response()),
        Ok(report) => {
            warn!(
                "department {} deleted with {} employee failure(s)",
                id,
                report.failures.len()
            );
            Ok(Json(CascadeReportDto::from(report)).into_response())
        }
        Err(e) => Err(fail(&uri, "delete department", &e)),
    }
}

/// Employees of a department
#[utoipa::path(get, path = "/api/v1/departments/{id}/employees", tag = "departments",
    params(("id" = String, Path, description = "Department UUID")),
    responses(
        (status = 200, description = "Employees of the department", body = [EmployeeDto]),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn department_employees(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<EmployeeDto>>> {
    match svc.department_employees(&timeout.ctx(), &id).await {
        Ok(employees) => Ok(Json(employees.into_iter().map(Into::into).collect())),
        Err(e) => Err(fail(&uri, "list department employees", &e)),
    }
}

// --- employees ---

#[utoipa::path(get, path = "/api/v1/employees", tag = "employees",
    responses(
        (status = 200, description = "List of employees", body = [EmployeeDto]),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn list_employees(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<EmployeeDto>>> {
    match svc.list_employees(&timeout.ctx()).await {
        Ok(employees) => Ok(Json(employees.into_iter().map(Into::into).collect())),
        Err(e) => Err(fail(&uri, "list employees", &e)),
    }
}

#[utoipa::path(get, path = "/api/v1/employees/{id}", tag = "employees",
    params(("id" = String, Path, description = "Employee UUID")),
    responses(
        (status = 200, description = "Employee found", body = EmployeeDto),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn get_employee(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<EmployeeDto>> {
    match svc.get_employee(&timeout.ctx(), &id).await {
        Ok(employee) => Ok(Json(employee.into())),
        Err(e) => Err(fail(&uri, "get employee", &e)),
    }
}

/// Create an employee in an existing department
#[utoipa::path(post, path = "/api/v1/employees", tag = "employees",
    request_body = CreateEmployeeReq,
    responses(
        (status = 201, description = "Created employee", body = EmployeeDto),
        (status = 400, description = "Bad Request or unknown department", body = Problem),
        (status = 409, description = "Email already in use", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn create_employee(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<CreateEmployeeReq>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EmployeeDto>)> {
    let req = body(&uri, payload)?;
    info!("Creating employee: {:?}", req);
    match svc.create_employee(&timeout.ctx(), req.into()).await {
        Ok(employee) => Ok((StatusCode::CREATED, Json(employee.into()))),
        Err(e) => Err(fail(&uri, "create employee", &e)),
    }
}

#[utoipa::path(put, path = "/api/v1/employees/{id}", tag = "employees",
    params(("id" = String, Path, description = "Employee UUID")),
    request_body = UpdateEmployeeReq,
    responses(
        (status = 200, description = "Updated employee", body = EmployeeDto),
        (status = 400, description = "Bad Request or unknown department", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 409, description = "Email already in use", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn update_employee(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<UpdateEmployeeReq>, JsonRejection>,
) -> ApiResult<Json<EmployeeDto>> {
    let req = body(&uri, payload)?;
    match svc.update_employee(&timeout.ctx(), &id, req.into()).await {
        Ok(employee) => Ok(Json(employee.into())),
        Err(e) => Err(fail(&uri, "update employee", &e)),
    }
}

#[utoipa::path(delete, path = "/api/v1/employees/{id}", tag = "employees",
    params(("id" = String, Path, description = "Employee UUID")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn delete_employee(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<StatusCode> {
    match svc.delete_employee(&timeout.ctx(), &id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(fail(&uri, "delete employee", &e)),
    }
}

/// Projects the employee is a team member of
#[utoipa::path(get, path = "/api/v1/employees/{id}/projects", tag = "employees",
    params(("id" = String, Path, description = "Employee UUID")),
    responses(
        (status = 200, description = "Projects of the employee", body = [ProjectDto]),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn employee_projects(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<ProjectDto>>> {
    match svc.employee_projects(&timeout.ctx(), &id).await {
        Ok(projects) => Ok(Json(projects.into_iter().map(Into::into).collect())),
        Err(e) => Err(fail(&uri, "list employee projects", &e)),
    }
}

// --- projects ---

#[utoipa::path(get, path = "/api/v1/projects", tag = "projects",
    responses(
        (status = 200, description = "List of projects", body = [ProjectDto]),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn list_projects(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<ProjectDto>>> {
    match svc.list_projects(&timeout.ctx()).await {
        Ok(projects) => Ok(Json(projects.into_iter().map(Into::into).collect())),
        Err(e) => Err(fail(&uri, "list projects", &e)),
    }
}

#[utoipa::path(get, path = "/api/v1/projects/{id}", tag = "projects",
    params(("id" = String, Path, description = "Project UUID")),
    responses(
        (status = 200, description = "Project found", body = ProjectDto),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn get_project(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<ProjectDto>> {
    match svc.get_project(&timeout.ctx(), &id).await {
        Ok(project) => Ok(Json(project.into())),
        Err(e) => Err(fail(&uri, "get project", &e)),
    }
}

#[utoipa::path(post, path = "/api/v1/projects", tag = "projects",
    request_body = CreateProjectReq,
    responses(
        (status = 201, description = "Created project", body = ProjectDto),
        (status = 400, description = "Bad Request or unknown team member", body = Problem),
        (status = 409, description = "Conflict", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn create_project(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<CreateProjectReq>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProjectDto>)> {
    let req = body(&uri, payload)?;
    info!("Creating project: {}", req.name);
    match svc.create_project(&timeout.ctx(), req.into()).await {
        Ok(project) => Ok((StatusCode::CREATED, Json(project.into()))),
        Err(e) => Err(fail(&uri, "create project", &e)),
    }
}

#[utoipa::path(put, path = "/api/v1/projects/{id}", tag = "projects",
    params(("id" = String, Path, description = "Project UUID")),
    request_body = UpdateProjectReq,
    responses(
        (status = 200, description = "Updated project", body = ProjectDto),
        (status = 400, description = "Bad Request", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 409, description = "Conflict", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn update_project(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<UpdateProjectReq>, JsonRejection>,
) -> ApiResult<Json<ProjectDto>> {
    let req = body(&uri, payload)?;
    match svc.update_project(&timeout.ctx(), &id, req.into()).await {
        Ok(project) => Ok(Json(project.into())),
        Err(e) => Err(fail(&uri, "update project", &e)),
    }
}

#[utoipa::path(delete, path = "/api/v1/projects/{id}", tag = "projects",
    params(("id" = String, Path, description = "Project UUID")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn delete_project(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<StatusCode> {
    match svc.delete_project(&timeout.ctx(), &id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(fail(&uri, "delete project", &e)),
    }
}

/// Add an employee to the project team (idempotent)
#[utoipa::path(put, path = "/api/v1/projects/{id}/members/{employee_id}", tag = "projects",
    params(
        ("id" = String, Path, description = "Project UUID"),
        ("employee_id" = String, Path, description = "Employee UUID")),
    responses(
        (status = 200, description = "Project with its team", body = ProjectDto),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 404, description = "Project or employee not found", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn add_team_member(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    Path((id, employee_id)): Path<(String, String)>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<ProjectDto>> {
    match svc.add_team_member(&timeout.ctx(), &id, &employee_id).await {
        Ok(project) => Ok(Json(project.into())),
        Err(e) => Err(fail(&uri, "add team member", &e)),
    }
}

/// Remove an employee from the project team (idempotent)
#[utoipa::path(delete, path = "/api/v1/projects/{id}/members/{employee_id}", tag = "projects",
    params(
        ("id" = String, Path, description = "Project UUID"),
        ("employee_id" = String, Path, description = "Employee UUID")),
    responses(
        (status = 200, description = "Project with its team", body = ProjectDto),
        (status = 400, description = "Malformed id", body = Problem),
        (status = 404, description = "Not Found", body = Problem),
        (status = 503, description = "Store unavailable", body = Problem)))]
pub async fn remove_team_member(
    Extension(svc): Extension<Arc<Service>>,
    Extension(timeout): Extension<RequestTimeout>,
    Path((id, employee_id)): Path<(String, String)>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<ProjectDto>> {
    match svc
        .remove_team_member(&timeout.ctx(), &id, &employee_id)
        .await
    {
        Ok(project) => Ok(Json(project.into())),
        Err(e) => Err(fail(&uri, "remove team member", &e)),
    }
}
