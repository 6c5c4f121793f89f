use utoipa::OpenApi;

use crate::api::rest::{dto, handlers, problem};
use crate::contract::model::{ProjectPriority, ProjectStatus};

#[derive(OpenApi)]
#[openapi(
    info(title = "Organization records API", description = "Departments, employees and projects"),
    paths(
        handlers::health,
        handlers::list_departments,
        handlers::get_department,
        handlers::create_department,
        handlers::update_department,
        handlers::delete_department,
        handlers::department_employees,
        handlers::list_employees,
        handlers::get_employee,
        handlers::create_employee,
        handlers::update_employee,
        handlers::delete_employee,
        handlers::employee_projects,
        handlers::list_projects,
        handlers::get_project,
        handlers::create_project,
        handlers::update_project,
        handlers::delete_project,
        handlers::add_team_member,
        handlers::remove_team_member,
    ),
    components(schemas(
        dto::DepartmentDto,
        dto::CreateDepartmentReq,
        dto::UpdateDepartmentReq,
        dto::EmployeeDto,
        dto::CreateEmployeeReq,
        dto::UpdateEmployeeReq,
        dto::ProjectDto,
        dto::CreateProjectReq,
        dto::UpdateProjectReq,
        dto::CascadeReportDto,
        dto::CascadeFailureDto,
        dto::HealthDto,
        problem::Problem,
        problem::ValidationError,
        ProjectStatus,
        ProjectPriority,
    )),
    tags(
        (name = "departments", description = "Departments and cascade delete"),
        (name = "employees", description = "Employees"),
        (name = "projects", description = "Projects and their teams"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;
