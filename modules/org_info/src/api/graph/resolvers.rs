use std::sync::Arc;

use crate::api::graph::error::{GraphError, GraphResult};
use crate::api::graph::model::{
    CreateProjectInput, DeleteDepartmentPayload, DepartmentInput, EmployeeInput, GraphDepartment,
    GraphEmployee, GraphProject, UpdateProjectInput,
};
use crate::contract::client::OrgInfoApi;
use crate::contract::ctx::OpCtx;
use crate::contract::error::OrgInfoError;
use crate::contract::model::ProjectStatus;

/// Root of the graph face; hands out the query and mutation roots.
#[derive(Clone)]
pub struct Resolver {
    api: Arc<dyn OrgInfoApi>,
}

impl Resolver {
    pub fn new(api: Arc<dyn OrgInfoApi>) -> Self {
        Self { api }
    }

    pub fn query(&self) -> QueryRoot<'_> {
        QueryRoot {
            api: self.api.as_ref(),
        }
    }

    pub fn mutation(&self) -> MutationRoot<'_> {
        MutationRoot {
            api: self.api.as_ref(),
        }
    }
}

/// Absent records are `None` for by-id lookups, not errors.
fn optional<T>(res: Result<T, OrgInfoError>) -> Result<Option<T>, OrgInfoError> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(OrgInfoError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

fn list<T, U: From<T>>(items: Vec<T>) -> Vec<U> {
    items.into_iter().map(U::from).collect()
}

pub struct QueryRoot<'a> {
    api: &'a dyn OrgInfoApi,
}

impl QueryRoot<'_> {
    pub async fn departments(&self, ctx: &OpCtx) -> GraphResult<Vec<GraphDepartment>> {
        let departments = self
            .api
            .list_departments(ctx)
            .await
            .map_err(|e| GraphError::from(e).at("departments"))?;
        Ok(list(departments))
    }

    pub async fn department(&self, ctx: &OpCtx, id: &str) -> GraphResult<Option<GraphDepartment>> {
        let found = optional(self.api.get_department(ctx, id).await)
            .map_err(|e| GraphError::from(e).at("department"))?;
        Ok(found.map(Into::into))
    }

    /// `Department.employees` field.
    pub async fn department_employees(
        &self,
        ctx: &OpCtx,
        department: &GraphDepartment,
    ) -> GraphResult<Vec<GraphEmployee>> {
        let employees = self
            .api
            .list_employees_by_department(ctx, &department.id.to_string())
            .await
            .map_err(|e| GraphError::from(e).at("employees"))?;
        Ok(list(employees))
    }

    pub async fn employees(&self, ctx: &OpCtx) -> GraphResult<Vec<GraphEmployee>> {
        let employees = self
            .api
            .list_employees(ctx)
            .await
            .map_err(|e| GraphError::from(e).at("employees"))?;
        Ok(list(employees))
    }

    pub async fn employee(&self, ctx: &OpCtx, id: &str) -> GraphResult<Option<GraphEmployee>> {
        let found = optional(self.api.get_employee(ctx, id).await)
            .map_err(|e| GraphError::from(e).at("employee"))?;
        Ok(found.map(Into::into))
    }

    pub async fn employees_by_department(
        &self,
        ctx: &OpCtx,
        department_id: &str,
    ) -> GraphResult<Vec<GraphEmployee>> {
        let employees = self
            .api
            .list_employees_by_department(ctx, department_id)
            .await
            .map_err(|e| GraphError::from(e).at("employeesByDepartment"))?;
        Ok(list(employees))
    }

    /// `Employee.department` field; `None` if the department vanished.
    pub async fn employee_department(
        &self,
        ctx: &OpCtx,
        employee: &GraphEmployee,
    ) -> GraphResult<Option<GraphDepartment>> {
        let found = optional(
            self.api
                .get_department(ctx, &employee.department_id.to_string())
                .await,
        )
        .map_err(|e| GraphError::from(e).at("department"))?;
        Ok(found.map(Into::into))
    }

    pub async fn projects(&self, ctx: &OpCtx) -> GraphResult<Vec<GraphProject>> {
        let projects = self
            .api
            .list_projects(ctx)
            .await
            .map_err(|e| GraphError::from(e).at("projects"))?;
        Ok(list(projects))
    }

    pub async fn project(&self, ctx: &OpCtx, id: &str) -> GraphResult<Option<GraphProject>> {
        let found = optional(self.api.get_project(ctx, id).await)
            .map_err(|e| GraphError::from(e).at("project"))?;
        Ok(found.map(Into::into))
    }

    pub async fn projects_by_status(
        &self,
        ctx: &OpCtx,
        status: ProjectStatus,
    ) -> GraphResult<Vec<GraphProject>> {
        let projects = self
            .api
            .list_projects_by_status(ctx, status)
            .await
            .map_err(|e| GraphError::from(e).at("projectsByStatus"))?;
        Ok(list(projects))
    }

    pub async fn projects_by_employee(
        &self,
        ctx: &OpCtx,
        employee_id: &str,
    ) -> GraphResult<Vec<GraphProject>> {
        let projects = self
            .api
            .list_projects_by_employee(ctx, employee_id)
            .await
            .map_err(|e| GraphError::from(e).at("projectsByEmployee"))?;
        Ok(list(projects))
    }
}

pub struct MutationRoot<'a> {
    api: &'a dyn OrgInfoApi,
}

impl MutationRoot<'_> {
    pub async fn create_department(
        &self,
        ctx: &OpCtx,
        input: DepartmentInput,
    ) -> GraphResult<GraphDepartment> {
        self.api
            .create_department(ctx, input.into())
            .await
            .map(Into::into)
            .map_err(|e| GraphError::from(e).at("createDepartment"))
    }

    pub async fn update_department(
        &self,
        ctx: &OpCtx,
        id: &str,
        input: DepartmentInput,
    ) -> GraphResult<GraphDepartment> {
        self.api
            .update_department(ctx, id, input.into())
            .await
            .map(Into::into)
            .map_err(|e| GraphError::from(e).at("updateDepartment"))
    }

    /// Runs the cascade: employees first, then the department.
    pub async fn delete_department(
        &self,
        ctx: &OpCtx,
        id: &str,
    ) -> GraphResult<DeleteDepartmentPayload> {
        self.api
            .delete_department(ctx, id)
            .await
            .map(Into::into)
            .map_err(|e| GraphError::from(e).at("deleteDepartment"))
    }

    pub async fn create_employee(
        &self,
        ctx: &OpCtx,
        input: EmployeeInput,
    ) -> GraphResult<GraphEmployee> {
        self.api
            .create_employee(ctx, input.into())
            .await
            .map(Into::into)
            .map_err(|e| GraphError::from(e).at("createEmployee"))
    }

    pub async fn update_employee(
        &self,
        ctx: &OpCtx,
        id: &str,
        input: EmployeeInput,
    ) -> GraphResult<GraphEmployee> {
        self.api
            .update_employee(ctx, id, input.into())
            .await
            .map(Into::into)
            .map_err(|e| GraphError::from(e).at("updateEmployee"))
    }

    pub async fn delete_employee(&self, ctx: &OpCtx, id: &str) -> GraphResult<bool> {
        self.api
            .delete_employee(ctx, id)
            .await
            .map(|()| true)
            .map_err(|e| GraphError::from(e).at("deleteEmployee"))
    }

    pub async fn create_project(
        &self,
        ctx: &OpCtx,
        input: CreateProjectInput,
    ) -> GraphResult<GraphProject> {
        self.api
            .create_project(ctx, input.into())
            .await
            .map(Into::into)
            .map_err(|e| GraphError::from(e).at("createProject"))
    }

    pub async fn update_project(
        &self,
        ctx: &OpCtx,
        id: &str,
        input: UpdateProjectInput,
    ) -> GraphResult<GraphProject> {
        self.api
            .update_project(ctx, id, input.into())
            .await
            .map(Into::into)
            .map_err(|e| GraphError::from(e).at("updateProject"))
    }

    pub async fn delete_project(&self, ctx: &OpCtx, id: &str) -> GraphResult<bool> {
        self.api
            .delete_project(ctx, id)
            .await
            .map(|()| true)
            .map_err(|e| GraphError::from(e).at("deleteProject"))
    }

    pub async fn add_team_member(
        &self,
        ctx: &OpCtx,
        project_id: &str,
        employee_id: &str,
    ) -> GraphResult<GraphProject> {
        self.api
            .add_team_member(ctx, project_id, employee_id)
            .await
            .map(Into::into)
            .map_err(|e| GraphError::from(e).at("addTeamMember"))
    }

    pub async fn remove_team_member(
        &self,
        ctx: &OpCtx,
        project_id: &str,
        employee_id: &str,
    ) -> GraphResult<GraphProject> {
        self.api
            .remove_team_member(ctx, project_id, employee_id)
            .await
            .map(Into::into)
            .map_err(|e| GraphError::from(e).at("removeTeamMember"))
    }
}
