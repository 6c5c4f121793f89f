use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::model::{
    CascadeReport, Department, DepartmentUpdate, Employee, EmployeeUpdate, NewDepartment,
    NewEmployee, NewProject, Project, ProjectPriority, ProjectStatus, ProjectUpdate,
};

// Output objects. Field names follow the graph convention (camelCase).

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDepartment {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEmployee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphProject {
    pub id: Uuid,
    pub name: String,
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

/// Payload of `deleteDepartment`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDepartmentPayload {
    pub success: bool,
    pub deleted_employee_ids: Vec<Uuid>,
    pub failed_employee_ids: Vec<Uuid>,
}

// Inputs

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentInput {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub name: String,
    pub email: String,
    pub department_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
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

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectInput {
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

impl From<Department> for GraphDepartment {
    fn from(d: Department) -> Self {
        Self {
            id: d.id,
            name: d.name,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

impl From<Employee> for GraphEmployee {
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

impl From<Project> for GraphProject {
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

impl From<CascadeReport> for DeleteDepartmentPayload {
    fn from(r: CascadeReport) -> Self {
        Self {
            success: true,
            deleted_employee_ids: r.deleted_employee_ids,
            failed_employee_ids: r.failures.into_iter().map(|f| f.employee_id).collect(),
        }
    }
}

impl From<DepartmentInput> for NewDepartment {
    fn from(i: DepartmentInput) -> Self {
        Self { name: i.name }
    }
}

impl From<DepartmentInput> for DepartmentUpdate {
    fn from(i: DepartmentInput) -> Self {
        Self { name: i.name }
    }
}

impl From<EmployeeInput> for NewEmployee {
    fn from(i: EmployeeInput) -> Self {
        Self {
            name: i.name,
            email: i.email,
            department_id: i.department_id,
        }
    }
}

impl From<EmployeeInput> for EmployeeUpdate {
    fn from(i: EmployeeInput) -> Self {
        Self {
            name: i.name,
            email: i.email,
            department_id: i.department_id,
        }
    }
}

impl From<CreateProjectInput> for NewProject {
    fn from(i: CreateProjectInput) -> Self {
        Self {
            name: i.name,
            description: i.description,
            status: i.status,
            priority: i.priority,
            start_date: i.start_date,
            end_date: i.end_date,
            budget: i.budget,
            team_member_ids: i.team_member_ids,
        }
    }
}

impl From<UpdateProjectInput> for ProjectUpdate {
    fn from(i: UpdateProjectInput) -> Self {
        Self {
            name: i.name,
            description: i.description,
            status: i.status,
            priority: i.priority,
            start_date: i.start_date,
            end_date: i.end_date,
            budget: i.budget,
            team_member_ids: i.team_member_ids,
        }
    }
}
