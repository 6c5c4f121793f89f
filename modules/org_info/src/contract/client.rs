use async_trait::async_trait;

use crate::contract::{
    ctx::OpCtx,
    error::OrgInfoError,
    model::{
        CascadeReport, Department, DepartmentUpdate, Employee, EmployeeUpdate, NewDepartment,
        NewEmployee, NewProject, Project, ProjectStatus, ProjectUpdate,
    },
};

/// Public API trait for the org_info module that other modules can use.
///
/// Identifiers are passed as raw strings; malformed ones fail with
/// [`OrgInfoError::InvalidInput`].
#[async_trait]
pub trait OrgInfoApi: Send + Sync {
    async fn create_department(
        &self,
        ctx: &OpCtx,
        new_department: NewDepartment,
    ) -> Result<Department, OrgInfoError>;

    async fn get_department(&self, ctx: &OpCtx, id: &str) -> Result<Department, OrgInfoError>;

    async fn list_departments(&self, ctx: &OpCtx) -> Result<Vec<Department>, OrgInfoError>;

    async fn update_department(
        &self,
        ctx: &OpCtx,
        id: &str,
        update: DepartmentUpdate,
    ) -> Result<Department, OrgInfoError>;

    /// Delete a department together with its employees (best effort).
    async fn delete_department(&self, ctx: &OpCtx, id: &str)
        -> Result<CascadeReport, OrgInfoError>;

    async fn create_employee(
        &self,
        ctx: &OpCtx,
        new_employee: NewEmployee,
    ) -> Result<Employee, OrgInfoError>;

    async fn get_employee(&self, ctx: &OpCtx, id: &str) -> Result<Employee, OrgInfoError>;

    async fn list_employees(&self, ctx: &OpCtx) -> Result<Vec<Employee>, OrgInfoError>;

    /// Employees of a department; empty for a department without (or unknown to) any rows.
    async fn list_employees_by_department(
        &self,
        ctx: &OpCtx,
        department_id: &str,
    ) -> Result<Vec<Employee>, OrgInfoError>;

    async fn update_employee(
        &self,
        ctx: &OpCtx,
        id: &str,
        update: EmployeeUpdate,
    ) -> Result<Employee, OrgInfoError>;

    async fn delete_employee(&self, ctx: &OpCtx, id: &str) -> Result<(), OrgInfoError>;

    async fn create_project(
        &self,
        ctx: &OpCtx,
        new_project: NewProject,
    ) -> Result<Project, OrgInfoError>;

    async fn get_project(&self, ctx: &OpCtx, id: &str) -> Result<Project, OrgInfoError>;

    async fn list_projects(&self, ctx: &OpCtx) -> Result<Vec<Project>, OrgInfoError>;

    async fn list_projects_by_status(
        &self,
        ctx: &OpCtx,
        status: ProjectStatus,
    ) -> Result<Vec<Project>, OrgInfoError>;

    async fn list_projects_by_employee(
        &self,
        ctx: &OpCtx,
        employee_id: &str,
    ) -> Result<Vec<Project>, OrgInfoError>;

    async fn update_project(
        &self,
        ctx: &OpCtx,
        id: &str,
        update: ProjectUpdate,
    ) -> Result<Project, OrgInfoError>;

    async fn delete_project(&self, ctx: &OpCtx, id: &str) -> Result<(), OrgInfoError>;

    async fn add_team_member(
        &self,
        ctx: &OpCtx,
        project_id: &str,
        employee_id: &str,
    ) -> Result<Project, OrgInfoError>;

    async fn remove_team_member(
        &self,
        ctx: &OpCtx,
        project_id: &str,
        employee_id: &str,
    ) -> Result<Project, OrgInfoError>;
}
