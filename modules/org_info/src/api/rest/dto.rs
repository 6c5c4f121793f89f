use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{
    CascadeFailure, CascadeReport, Department, DepartmentUpdate, Employee, EmployeeUpdate,
    NewDepartment, NewEmployee, NewProject, Project, ProjectPriority, ProjectStatus,
    ProjectUpdate,
};

/// REST DTO for department representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DepartmentDto {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// REST DTO for creating a department
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateDepartmentReq {
    pub name: String,
}

/// REST DTO for updating a department
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateDepartmentReq {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// REST DTO for creating an employee. `department_id` is validated server side.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEmployeeReq {
    pub name: String,
    pub email: String,
    pub department_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateEmployeeReq {
    pub name: String,
    pub email: String,
    pub department_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectDto {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub priority: ProjectPriority,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    pub team_member_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// REST DTO for creating a project; status defaults to ACTIVE, priority to MEDIUM.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateProjectReq {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub priority: Option<ProjectPriority>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    #[serde(default)]
    pub team_member_ids: Vec<String>,
}

/// REST DTO for replacing a project. Omitting `team_member_ids` keeps the team.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateProjectReq {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub priority: ProjectPriority,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    #[serde(default)]
    pub team_member_ids: Option<Vec<String>>,
}

/// Returned by a department delete that left some employees behind.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CascadeReportDto {
    pub department_id: Uuid,
    pub deleted_employee_ids: Vec<Uuid>,
    pub failures: Vec<CascadeFailureDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CascadeFailureDto {
    pub employee_id: Uuid,
    pub reason: String,
    pub retryable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    pub status: String,
}

// Conversion implementations between REST DTOs and contract models

impl From<Department> for DepartmentDto {
    fn from(d: Department) -> Self {
        Self {
            id: d.id,
            name: d.name,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

impl From<CreateDepartmentReq> for NewDepartment {
    fn from(req: CreateDepartmentReq) -> Self {
        Self { name: req.name }
    }
}

impl From<UpdateDepartmentReq> for DepartmentUpdate {
    fn from(req: UpdateDepartmentReq) -> Self {
        Self { name: req.name }
    }
}

impl From<Employee> for EmployeeDto {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            name: e.name,
            email: e.email,
            department_id: e.department_id,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

impl From<CreateEmployeeReq> for NewEmployee {
    fn from(req: CreateEmployeeReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
            department_id: req.department_id,
        }
    }
}

impl From<UpdateEmployeeReq> for EmployeeUpdate {
    fn from(req: UpdateEmployeeReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
            department_id: req.department_id,
        }
    }
}

impl From<Project> for ProjectDto {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            status: p.status,
            priority: p.priority,
            start_date: p.start_date,
            end_date: p.end_date,
            budget: p.budget,
            team_member_ids: p.team_member_ids,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<CreateProjectReq> for NewProject {
    fn from(req: CreateProjectReq) -> Self {
        Self {
            name: req.name,
            description: req.description,
            status: req.status,
            priority: req.priority,
            start_date: req.start_date,
            end_date: req.end_date,
            budget: req.budget,
            team_member_ids: req.team_member_ids,
        }
    }
}

impl From<UpdateProjectReq> for ProjectUpdate {
    fn from(req: UpdateProjectReq) -> Self {
        Self {
            name: req.name,
            description: req.description,
            status: req.status,
            priority: req.priority,
            start_date: req.start_date,
            end_date: req.end_date,
            budget: req.budget,
            team_member_ids: req.team_member_ids,
        }
    }
}

impl From<CascadeFailure> for CascadeFailureDto {
    fn from(f: CascadeFailure) -> Self {
        Self {
            employee_id: f.employee_id,
            reason: f.reason,
            retryable: f.retryable,
        }
    }
}

impl From<CascadeReport> for CascadeReportDto {
    fn from(r: CascadeReport) -> Self {
        Self {
            department_id: r.department_id,
            deleted_employee_ids: r.deleted_employee_ids,
            failures: r.failures.into_iter().map(Into::into).collect(),
        }
    }
}
