use std::sync::Arc;

use async_trait::async_trait;

use crate::contract::{
    client::OrgInfoApi,
    ctx::OpCtx,
    error::OrgInfoError,
    model::{
        CascadeReport, Department, DepartmentUpdate, Employee, EmployeeUpdate, NewDepartment,
        NewEmployee, NewProject, Project, ProjectStatus, ProjectUpdate,
    },
};
use crate::domain::service::Service;

/// Local implementation of the OrgInfoApi trait that delegates to the domain service
pub struct OrgInfoLocalClient {
    service: Arc<Service>,
}

impl OrgInfoLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl OrgInfoApi for OrgInfoLocalClient {
    async fn create_department(
        &self,
        ctx: &OpCtx,
        new_department: NewDepartment,
    ) -> Result<Department, OrgInfoError> {
        self.service
            .create_department(ctx, new_department)
            .await
            .map_err(Into::into)
    }

    async fn get_department(&self, ctx: &OpCtx, id: &str) -> Result<Department, OrgInfoError> {
        self.service.get_department(ctx, id).await.map_err(Into::into)
    }

    async fn list_departments(&self, ctx: &OpCtx) -> Result<Vec<Department>, OrgInfoError> {
        self.service.list_departments(ctx).await.map_err(Into::into)
    }

    async fn update_department(
        &self,
        ctx: &OpCtx,
        id: &str,
        update: DepartmentUpdate,
    ) -> Result<Department, OrgInfoError> {
        self.service
            .update_department(ctx, id, update)
            .await
            .map_err(Into::into)
    }

    async fn delete_department(
        &self,
        ctx: &OpCtx,
        id: &str,
    ) -> Result<CascadeReport, OrgInfoError> {
        self.service
            .delete_department(ctx, id)
            .await
            .map_err(Into::into)
    }

    async fn create_employee(
        &self,
        ctx: &OpCtx,
        new_employee: NewEmployee,
    ) -> Result<Employee, OrgInfoError> {
        self.service
            .create_employee(ctx, new_employee)
            .await
            .map_err(Into::into)
    }

    async fn get_employee(&self, ctx: &OpCtx, id: &str) -> Result<Employee, OrgInfoError> {
        self.service.get_employee(ctx, id).await.map_err(Into::into)
    }

    async fn list_employees(&self, ctx: &OpCtx) -> Result<Vec<Employee>, OrgInfoError> {
        self.service.list_employees(ctx).await.map_err(Into::into)
    }

    async fn list_employees_by_department(
        &self,
        ctx: &OpCtx,
        department_id: &str,
    ) -> Result<Vec<Employee>, OrgInfoError> {
        self.service
            .list_employees_by_department(ctx, department_id)
            .await
            .map_err(Into::into)
    }

    async fn update_employee(
        &self,
        ctx: &OpCtx,
        id: &str,
        update: EmployeeUpdate,
    ) -> Result<Employee, OrgInfoError> {
        self.service
            .update_employee(ctx, id, update)
            .await
            .map_err(Into::into)
    }

    async fn delete_employee(&self, ctx: &OpCtx, id: &str) -> Result<(), OrgInfoError> {
        self.service.delete_employee(ctx, id).await.map_err(Into::into)
    }

    async fn create_project(
        &self,
        ctx: &OpCtx,
        new_project: NewProject,
    ) -> Result<Project, OrgInfoError> {
        self.service
            .create_project(ctx, new_project)
            .await
            .map_err(Into::into)
    }

    async fn get_project(&self, ctx: &OpCtx, id: &str) -> Result<Project, OrgInfoError> {
        self.service.get_project(ctx, id).await.map_err(Into::into)
    }

    async fn list_projects(&self, ctx: &OpCtx) -> Result<Vec<Project>, OrgInfoError> {
        self.service.list_projects(ctx).await.map_err(Into::into)
    }

    async fn list_projects_by_status(
        &self,
        ctx: &OpCtx,
        status: ProjectStatus,
    ) -> Result<Vec<Project>, OrgInfoError> {
        self.service
            .list_projects_by_status(ctx, status)
            .await
            .map_err(Into::into)
    }

    async fn list_projects_by_employee(
        &self,
        ctx: &OpCtx,
        employee_id: &str,
    ) -> Result<Vec<Project>, OrgInfoError> {
        self.service
            .list_projects_by_employee(ctx, employee_id)
            .await
            .map_err(Into::into)
    }

    async fn update_project(
        &self,
        ctx: &OpCtx,
        id: &str,
        update: ProjectUpdate,
    ) -> Result<Project, OrgInfoError> {
        self.service
            .update_project(ctx, id, update)
            .await
            .map_err(Into::into)
    }

    async fn delete_project(&self, ctx: &OpCtx, id: &str) -> Result<(), OrgInfoError> {
        self.service.delete_project(ctx, id).await.map_err(Into::into)
    }

    async fn add_team_member(
        &self,
        ctx: &OpCtx,
        project_id: &str,
        employee_id: &str,
    ) -> Result<Project, OrgInfoError> {
        self.service
            .add_team_member(ctx, project_id, employee_id)
            .await
            .map_err(Into::into)
    }

    async fn remove_team_member(
        &self,
        ctx: &OpCtx,
        project_id: &str,
        employee_id: &str,
    ) -> Result<Project, OrgInfoError> {
        self.service
            .remove_team_member(ctx, project_id, employee_id)
            .await
            .map_err(Into::into)
    }
}
