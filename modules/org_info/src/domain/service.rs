use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::ctx::OpCtx;
use crate::contract::model::{
    CascadeReport, Department, DepartmentUpdate, Employee, EmployeeUpdate, NewDepartment,
    NewEmployee, NewProject, Project, ProjectStatus, ProjectUpdate,
};
use crate::domain::cascade::cascade_delete_department;
use crate::domain::error::DomainError;
use crate::domain::guard::bounded;
use crate::domain::ids::parse_id;
use crate::domain::repo::{DepartmentRepository, EmployeeRepository, ProjectRepository};
use crate::domain::validation::{
    ensure_department_exists, ensure_employees_exist, validate_budget, validate_date_range,
    validate_email, validate_name,
};

/// Domain service with business rules for departments, employees and projects.
/// Depends only on the repository ports, not on any store implementation.
#[derive(Clone)]
pub struct Service {
    departments: Arc<dyn DepartmentRepository>,
    employees: Arc<dyn EmployeeRepository>,
    projects: Arc<dyn ProjectRepository>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_name_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_name_length: 100,
        }
    }
}

impl Service {
    pub fn new(
        departments: Arc<dyn DepartmentRepository>,
        employees: Arc<dyn EmployeeRepository>,
        projects: Arc<dyn ProjectRepository>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            departments,
            employees,
            projects,
            config,
        }
    }

    // --- departments ---

    #[instrument(name = "org_info.service.create_department", skip(self, ctx, new_department))]
    pub async fn create_department(
        &self,
        ctx: &OpCtx,
        new_department: NewDepartment,
    ) -> Result<Department, DomainError> {
        let name = validate_name("name", &new_department.name, self.config.max_name_length)?;
        let now = Utc::now();
        let department = Department {
            id: Uuid::new_v4(),
            name,
            created_at: now,
            updated_at: now,
        };
        bounded(
            ctx,
            "department.save",
            self.departments.save(department.clone()),
        )
        .await?;
        info!(department_id = %department.id, "department created");
        Ok(department)
    }

    #[instrument(name = "org_info.service.get_department", skip(self, ctx), fields(department_id = %id))]
    pub async fn get_department(&self, ctx: &OpCtx, id: &str) -> Result<Department, DomainError> {
        debug!("Getting department by id");
        bounded(ctx, "department.find_by_id", self.departments.find_by_id(id)).await
    }

    #[instrument(name = "org_info.service.list_departments", skip(self, ctx))]
    pub async fn list_departments(&self, ctx: &OpCtx) -> Result<Vec<Department>, DomainError> {
        let departments =
            bounded(ctx, "department.find_all", self.departments.find_all()).await?;
        debug!(count = departments.len(), "departments listed");
        Ok(departments)
    }

    #[instrument(name = "org_info.service.update_department", skip(self, ctx, update), fields(department_id = %id))]
    pub async fn update_department(
        &self,
        ctx: &OpCtx,
        id: &str,
        update: DepartmentUpdate,
    ) -> Result<Department, DomainError> {
        let name = validate_name("name", &update.name, self.config.max_name_length)?;
        let mut current = self.get_department(ctx, id).await?;
        current.name = name;
        let updated = bounded(ctx, "department.update", self.departments.update(current)).await?;
        info!("department updated");
        Ok(updated)
    }

    /// Cascade delete: the department's employees first, then the department.
    #[instrument(name = "org_info.service.delete_department", skip(self, ctx), fields(department_id = %id))]
    pub async fn delete_department(
        &self,
        ctx: &OpCtx,
        id: &str,
    ) -> Result<CascadeReport, DomainError> {
        cascade_delete_department(ctx, self.departments.as_ref(), self.employees.as_ref(), id)
            .await
    }

    /// Employees of an existing department; unknown department is `NotFound`.
    #[instrument(name = "org_info.service.department_employees", skip(self, ctx), fields(department_id = %id))]
    pub async fn department_employees(
        &self,
        ctx: &OpCtx,
        id: &str,
    ) -> Result<Vec<Employee>, DomainError> {
        self.get_department(ctx, id).await?;
        self.list_employees_by_department(ctx, id).await
    }

    // --- employees ---

    #[instrument(name = "org_info.service.list_employees_by_department", skip(self, ctx), fields(department_id = %department_id))]
    pub async fn list_employees_by_department(
        &self,
        ctx: &OpCtx,
        department_id: &str,
    ) -> Result<Vec<Employee>, DomainError> {
        bounded(
            ctx,
            "employee.find_by_department_id",
            self.employees.find_by_department_id(department_id),
        )
        .await
    }

    #[instrument(name = "org_info.service.create_employee", skip(self, ctx, new_employee))]
    pub async fn create_employee(
        &self,
        ctx: &OpCtx,
        new_employee: NewEmployee,
    ) -> Result<Employee, DomainError> {
        let name = validate_name("name", &new_employee.name, self.config.max_name_length)?;
        let email = validate_email(&new_employee.email)?;

        let department_id = ensure_department_exists(
            ctx,
            self.departments.as_ref(),
            &new_employee.department_id,
        )
        .await?;
        self.ensure_email_free(ctx, &email, None).await?;

        let now = Utc::now();
        let employee = Employee {
            id: Uuid::new_v4(),
            name,
            email,
            department_id,
            created_at: now,
            updated_at: now,
        };
        bounded(ctx, "employee.save", self.employees.save(employee.clone())).await?;
        info!(employee_id = %employee.id, %department_id, "employee created");
        Ok(employee)
    }

    #[instrument(name = "org_info.service.get_employee", skip(self, ctx), fields(employee_id = %id))]
    pub async fn get_employee(&self, ctx: &OpCtx, id: &str) -> Result<Employee, DomainError> {
        debug!("Getting employee by id");
        bounded(ctx, "employee.find_by_id", self.employees.find_by_id(id)).await
    }

    #[instrument(name = "org_info.service.list_employees", skip(self, ctx))]
    pub async fn list_employees(&self, ctx: &OpCtx) -> Result<Vec<Employee>, DomainError> {
        bounded(ctx, "employee.find_all", self.employees.find_all()).await
    }

    #[instrument(name = "org_info.service.update_employee", skip(self, ctx, update), fields(employee_id = %id))]
    pub async fn update_employee(
        &self,
        ctx: &OpCtx,
        id: &str,
        update: EmployeeUpdate,
    ) -> Result<Employee, DomainError> {
        let name = validate_name("name", &update.name, self.config.max_name_length)?;
        let email = validate_email(&update.email)?;

        let mut current = self.get_employee(ctx, id).await?;
        let department_id =
            ensure_department_exists(ctx, self.departments.as_ref(), &update.department_id)
                .await?;
        if email != current.email {
            self.ensure_email_free(ctx, &email, Some(current.id)).await?;
        }

        let moved = current.department_id != department_id;
        current.name = name;
        current.email = email;
        current.department_id = department_id;
        let updated = bounded(ctx, "employee.update", self.employees.update(current)).await?;
        info!(moved, "employee updated");
        Ok(updated)
    }

    #[instrument(name = "org_info.service.delete_employee", skip(self, ctx), fields(employee_id = %id))]
    pub async fn delete_employee(&self, ctx: &OpCtx, id: &str) -> Result<(), DomainError> {
        bounded(ctx, "employee.delete", self.employees.delete(id)).await?;
        info!("employee deleted");
        Ok(())
    }

    /// Projects an existing employee works on.
    #[instrument(name = "org_info.service.employee_projects", skip(self, ctx), fields(employee_id = %id))]
    pub async fn employee_projects(&self, ctx: &OpCtx, id: &str) -> Result<Vec<Project>, DomainError> {
        self.get_employee(ctx, id).await?;
        bounded(
            ctx,
            "project.find_by_employee_id",
            self.projects.find_by_employee_id(id),
        )
        .await
    }

    async fn ensure_email_free(
        &self,
        ctx: &OpCtx,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), DomainError> {
        let taken = bounded(
            ctx,
            "employee.email_exists",
            self.employees.email_exists(email, exclude),
        )
        .await?;
        if taken {
            return Err(DomainError::conflict(format!(
                "employee with email '{email}' already exists"
            )));
        }
        Ok(())
    }

    // --- projects ---

    #[instrument(name = "org_info.service.create_project", skip(self, ctx, new_project))]
    pub async fn create_project(
        &self,
        ctx: &OpCtx,
        new_project: NewProject,
    ) -> Result<Project, DomainError> {
        let name = validate_name("name", &new_project.name, self.config.max_name_length)?;
        let budget = validate_budget(new_project.budget)?;
        validate_date_range(new_project.start_date, new_project.end_date)?;
        let team_member_ids =
            ensure_employees_exist(ctx, self.employees.as_ref(), &new_project.team_member_ids)
                .await?;

        let now = Utc::now();
        let mut project = Project {
            id: Uuid::new_v4(),
            name,
            description: normalize_description(new_project.description),
            status: new_project.status.unwrap_or_default(),
            priority: new_project.priority.unwrap_or_default(),
            start_date: new_project.start_date,
            end_date: new_project.end_date,
            budget,
            team_member_ids,
            created_at: now,
            updated_at: now,
        };
        project.team_member_ids.sort();
        bounded(ctx, "project.save", self.projects.save(project.clone())).await?;
        info!(project_id = %project.id, team = project.team_member_ids.len(), "project created");
        Ok(project)
    }

    #[instrument(name = "org_info.service.get_project", skip(self, ctx), fields(project_id = %id))]
    pub async fn get_project(&self, ctx: &OpCtx, id: &str) -> Result<Project, DomainError> {
        debug!("Getting project by id");
        bounded(ctx, "project.find_by_id", self.projects.find_by_id(id)).await
    }

    #[instrument(name = "org_info.service.list_projects", skip(self, ctx))]
    pub async fn list_projects(&self, ctx: &OpCtx) -> Result<Vec<Project>, DomainError> {
        bounded(ctx, "project.find_all", self.projects.find_all()).await
    }

    #[instrument(name = "org_info.service.list_projects_by_status", skip(self, ctx))]
    pub async fn list_projects_by_status(
        &self,
        ctx: &OpCtx,
        status: ProjectStatus,
    ) -> Result<Vec<Project>, DomainError> {
        bounded(
            ctx,
            "project.find_by_status",
            self.projects.find_by_status(status),
        )
        .await
    }

    /// Projects by team member without checking the employee exists.
    #[instrument(name = "org_info.service.list_projects_by_employee", skip(self, ctx), fields(employee_id = %employee_id))]
    pub async fn list_projects_by_employee(
        &self,
        ctx: &OpCtx,
        employee_id: &str,
    ) -> Result<Vec<Project>, DomainError> {
        bounded(
            ctx,
            "project.find_by_employee_id",
            self.projects.find_by_employee_id(employee_id),
        )
        .await
    }

    #[instrument(name = "org_info.service.update_project", skip(self, ctx, update), fields(project_id = %id))]
    pub async fn update_project(
        &self,
        ctx: &OpCtx,
        id: &str,
        update: ProjectUpdate,
    ) -> Result<Project, DomainError> {
        let name = validate_name("name", &update.name, self.config.max_name_length)?;
        let budget = validate_budget(update.budget)?;
        validate_date_range(update.start_date, update.end_date)?;

        let mut current = self.get_project(ctx, id).await?;
        if let Some(ids) = &update.team_member_ids {
            current.team_member_ids =
                ensure_employees_exist(ctx, self.employees.as_ref(), ids).await?;
            current.team_member_ids.sort();
        }
        current.name = name;
        current.description = normalize_description(update.description);
        current.status = update.status;
        current.priority = update.priority;
        current.start_date = update.start_date;
        current.end_date = update.end_date;
        current.budget = budget;

        let updated = bounded(ctx, "project.update", self.projects.update(current)).await?;
        info!("project updated");
        Ok(updated)
    }

    #[instrument(name = "org_info.service.delete_project", skip(self, ctx), fields(project_id = %id))]
    pub async fn delete_project(&self, ctx: &OpCtx, id: &str) -> Result<(), DomainError> {
        bounded(ctx, "project.delete", self.projects.delete(id)).await?;
        info!("project deleted");
        Ok(())
    }

    #[instrument(name = "org_info.service.add_team_member", skip(self, ctx), fields(project_id = %project_id, employee_id = %employee_id))]
    pub async fn add_team_member(
        &self,
        ctx: &OpCtx,
        project_id: &str,
        employee_id: &str,
    ) -> Result<Project, DomainError> {
        parse_id("project_id", project_id)?;
        self.get_employee(ctx, employee_id).await?;
        bounded(
            ctx,
            "project.add_team_member",
            self.projects.add_team_member(project_id, employee_id),
        )
        .await
    }

    #[instrument(name = "org_info.service.remove_team_member", skip(self, ctx), fields(project_id = %project_id, employee_id = %employee_id))]
    pub async fn remove_team_member(
        &self,
        ctx: &OpCtx,
        project_id: &str,
        employee_id: &str,
    ) -> Result<Project, DomainError> {
        bounded(
            ctx,
            "project.remove_team_member",
            self.projects.remove_team_member(project_id, employee_id),
        )
        .await
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
