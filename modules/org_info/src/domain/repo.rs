//! Storage ports. The domain talks to these traits only; the SeaORM and the
//! in-memory stores both implement them.
//!
//! Identifiers arrive as raw strings and are parsed by the implementation, so
//! a malformed id is reported as `InvalidInput` by every store alike.

use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{Department, Employee, Project, ProjectStatus};
use crate::domain::error::DomainError;

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Insert a new row. Duplicate primary key surfaces as `Conflict`.
    async fn save(&self, department: Department) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Department, DomainError>;

    /// All rows ordered by name (then id). Empty when the store is empty.
    async fn find_all(&self) -> Result<Vec<Department>, DomainError>;

    /// Overwrite the name and refresh `updated_at`; returns the stored row.
    async fn update(&self, department: Department) -> Result<Department, DomainError>;

    /// Remove the row. Never cascades; dependents make the store reject it.
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn save(&self, employee: Employee) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Employee, DomainError>;

    async fn find_all(&self) -> Result<Vec<Employee>, DomainError>;

    /// Overwrite name, email and department; refresh `updated_at`.
    async fn update(&self, employee: Employee) -> Result<Employee, DomainError>;

    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    /// Employees of one department ordered by name. Empty if none.
    async fn find_by_department_id(&self, department_id: &str)
        -> Result<Vec<Employee>, DomainError>;

    /// Whether some employee other than `exclude` already uses `email`.
    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn save(&self, project: Project) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Project, DomainError>;

    async fn find_all(&self) -> Result<Vec<Project>, DomainError>;

    /// Overwrite every mutable field and replace the team with
    /// `project.team_member_ids`.
    async fn update(&self, project: Project) -> Result<Project, DomainError>;

    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    async fn find_by_status(&self, status: ProjectStatus) -> Result<Vec<Project>, DomainError>;

    /// Projects whose team includes the employee.
    async fn find_by_employee_id(&self, employee_id: &str) -> Result<Vec<Project>, DomainError>;

    /// Idempotent: adding a present member is a no-op.
    async fn add_team_member(
        &self,
        project_id: &str,
        employee_id: &str,
    ) -> Result<Project, DomainError>;

    /// Idempotent: removing an absent member is a no-op.
    async fn remove_team_member(
        &self,
        project_id: &str,
        employee_id: &str,
    ) -> Result<Project, DomainError>;
}
