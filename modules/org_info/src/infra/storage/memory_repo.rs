//! In-memory store used by tests and `--mock` runs.
//!
//! It mirrors the relational constraints of the SQL schema (primary keys,
//! unique email, restricted department delete, team rows removed with their
//! employee) so both stores answer every call with the same error kind.
//! Locks are always taken in the order departments, employees, projects and
//! are never held across an `.await`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::contract::model::{Department, Employee, Project, ProjectStatus};
use crate::domain::error::{DomainError, EntityKind};
use crate::domain::ids::{ensure_well_formed, parse_id};
use crate::domain::repo::{DepartmentRepository, EmployeeRepository, ProjectRepository};

/// Shared tables; hand the same `Arc` to all three repositories.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    departments: RwLock<HashMap<Uuid, Department>>,
    employees: RwLock<HashMap<Uuid, Employee>>,
    projects: RwLock<HashMap<Uuid, Project>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

fn sorted_by_name<T>(mut rows: Vec<T>, key: impl Fn(&T) -> (&str, Uuid)) -> Vec<T> {
    rows.sort_by(|a, b| key(a).cmp(&key(b)));
    rows
}

// ---------------------------------------------------------------------------
// Departments
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct InMemoryDepartmentRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryDepartmentRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryDepartmentRepository {
    async fn save(&self, department: Department) -> Result<(), DomainError> {
        ensure_well_formed("id", department.id)?;
        let mut departments = self.store.departments.write();
        if departments.contains_key(&department.id) {
            return Err(DomainError::conflict(format!(
                "department {} already exists",
                department.id
            )));
        }
        debug!(department_id = %department.id, "inserting department");
        departments.insert(department.id, department);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Department, DomainError> {
        let uuid = parse_id("id", id)?;
        self.store
            .departments
            .read()
            .get(&uuid)
            .cloned()
            .ok_or_else(|| DomainError::not_found(EntityKind::Department, uuid))
    }

    async fn find_all(&self) -> Result<Vec<Department>, DomainError> {
        let rows: Vec<Department> = self.store.departments.read().values().cloned().collect();
        Ok(sorted_by_name(rows, |d| (d.name.as_str(), d.id)))
    }

    async fn update(&self, department: Department) -> Result<Department, DomainError> {
        ensure_well_formed("id", department.id)?;
        let mut departments = self.store.departments.write();
        let stored = departments
            .get_mut(&department.id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Department, department.id))?;
        stored.name = department.name;
        stored.updated_at = Utc::now().max(stored.created_at);
        Ok(stored.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let uuid = parse_id("id", id)?;
        let mut departments = self.store.departments.write();
        if !departments.contains_key(&uuid) {
            return Err(DomainError::not_found(EntityKind::Department, uuid));
        }
        let dependents = self
            .store
            .employees
            .read()
            .values()
            .filter(|e| e.department_id == uuid)
            .count();
        if dependents > 0 {
            return Err(DomainError::conflict(format!(
                "department {uuid} is still referenced by {dependents} employee(s)"
            )));
        }
        departments.remove(&uuid);
        debug!(department_id = %uuid, "department row deleted");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct InMemoryEmployeeRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryEmployeeRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

fn check_employee_constraints(
    departments: &HashMap<Uuid, Department>,
    employees: &HashMap<Uuid, Employee>,
    employee: &Employee,
) -> Result<(), DomainError> {
    if !departments.contains_key(&employee.department_id) {
        return Err(DomainError::conflict(format!(
            "foreign key violated: department {} does not exist",
            employee.department_id
        )));
    }
    if employees
        .values()
        .any(|e| e.id != employee.id && e.email == employee.email)
    {
        return Err(DomainError::conflict(format!(
            "unique constraint violated: email '{}'",
            employee.email
        )));
    }
    Ok(())
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn save(&self, employee: Employee) -> Result<(), DomainError> {
        ensure_well_formed("id", employee.id)?;
        ensure_well_formed("department_id", employee.department_id)?;
        let departments = self.store.departments.read();
        let mut employees = self.store.employees.write();
        if employees.contains_key(&employee.id) {
            return Err(DomainError::conflict(format!(
                "employee {} already exists",
                employee.id
            )));
        }
        check_employee_constraints(&departments, &employees, &employee)?;
        debug!(employee_id = %employee.id, "inserting employee");
        employees.insert(employee.id, employee);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Employee, DomainError> {
        let uuid = parse_id("id", id)?;
        self.store
            .employees
            .read()
            .get(&uuid)
            .cloned()
            .ok_or_else(|| DomainError::not_found(EntityKind::Employee, uuid))
    }

    async fn find_all(&self) -> Result<Vec<Employee>, DomainError> {
        let rows: Vec<Employee> = self.store.employees.read().values().cloned().collect();
        Ok(sorted_by_name(rows, |e| (e.name.as_str(), e.id)))
    }

    async fn update(&self, employee: Employee) -> Result<Employee, DomainError> {
        ensure_well_formed("id", employee.id)?;
        ensure_well_formed("department_id", employee.department_id)?;
        let departments = self.store.departments.read();
        let mut employees = self.store.employees.write();
        if !employees.contains_key(&employee.id) {
            return Err(DomainError::not_found(EntityKind::Employee, employee.id));
        }
        check_employee_constraints(&departments, &employees, &employee)?;
        let stored = employees
            .get_mut(&employee.id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Employee, employee.id))?;
        stored.name = employee.name;
        stored.email = employee.email;
        stored.department_id = employee.department_id;
        stored.updated_at = Utc::now().max(stored.created_at);
        Ok(stored.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let uuid = parse_id("id", id)?;
        let mut employees = self.store.employees.write();
        if employees.remove(&uuid).is_none() {
            return Err(DomainError::not_found(EntityKind::Employee, uuid));
        }
        for project in self.store.projects.write().values_mut() {
            project.team_member_ids.retain(|m| *m != uuid);
        }
        debug!(employee_id = %uuid, "employee row deleted");
        Ok(())
    }

    async fn find_by_department_id(
        &self,
        department_id: &str,
    ) -> Result<Vec<Employee>, DomainError> {
        let uuid = parse_id("department_id", department_id)?;
        let rows: Vec<Employee> = self
            .store
            .employees
            .read()
            .values()
            .filter(|e| e.department_id == uuid)
            .cloned()
            .collect();
        Ok(sorted_by_name(rows, |e| (e.name.as_str(), e.id)))
    }

    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> Result<bool, DomainError> {
        Ok(self
            .store
            .employees
            .read()
            .values()
            .any(|e| e.email == email && Some(e.id) != exclude))
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct InMemoryProjectRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryProjectRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

fn check_team(
    employees: &HashMap<Uuid, Employee>,
    team_member_ids: &[Uuid],
) -> Result<(), DomainError> {
    match team_member_ids.iter().find(|id| !employees.contains_key(id)) {
        Some(missing) => Err(DomainError::conflict(format!(
            "foreign key violated: employee {missing} does not exist"
        ))),
        None => Ok(()),
    }
}

fn normalized_team(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.sort();
    ids.dedup();
    ids
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn save(&self, mut project: Project) -> Result<(), DomainError> {
        ensure_well_formed("id", project.id)?;
        let employees = self.store.employees.read();
        let mut projects = self.store.projects.write();
        if projects.contains_key(&project.id) {
            return Err(DomainError::conflict(format!(
                "project {} already exists",
                project.id
            )));
        }
        check_team(&employees, &project.team_member_ids)?;
        project.team_member_ids = normalized_team(project.team_member_ids);
        debug!(project_id = %project.id, "inserting project");
        projects.insert(project.id, project);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Project, DomainError> {
        let uuid = parse_id("id", id)?;
        self.store
            .projects
            .read()
            .get(&uuid)
            .cloned()
            .ok_or_else(|| DomainError::not_found(EntityKind::Project, uuid))
    }

    async fn find_all(&self) -> Result<Vec<Project>, DomainError> {
        let rows: Vec<Project> = self.store.projects.read().values().cloned().collect();
        Ok(sorted_by_name(rows, |p| (p.name.as_str(), p.id)))
    }

    async fn update(&self, project: Project) -> Result<Project, DomainError> {
        ensure_well_formed("id", project.id)?;
        let employees = self.store.employees.read();
        let mut projects = self.store.projects.write();
        if !projects.contains_key(&project.id) {
            return Err(DomainError::not_found(EntityKind::Project, project.id));
        }
        check_team(&employees, &project.team_member_ids)?;
        let stored = projects
            .get_mut(&project.id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Project, project.id))?;
        stored.name = project.name;
        stored.description = project.description;
        stored.status = project.status;
        stored.priority = project.priority;
        stored.start_date = project.start_date;
        stored.end_date = project.end_date;
        stored.budget = project.budget;
        stored.team_member_ids = normalized_team(project.team_member_ids);
        stored.updated_at = Utc::now().max(stored.created_at);
        Ok(stored.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let uuid = parse_id("id", id)?;
        self.store
            .projects
            .write()
            .remove(&uuid)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(EntityKind::Project, uuid))
    }

    async fn find_by_status(&self, status: ProjectStatus) -> Result<Vec<Project>, DomainError> {
        let rows: Vec<Project> = self
            .store
            .projects
            .read()
            .values()
            .filter(|p| p.status == status)
            .cloned()
            .collect();
        Ok(sorted_by_name(rows, |p| (p.name.as_str(), p.id)))
    }

    async fn find_by_employee_id(&self, employee_id: &str) -> Result<Vec<Project>, DomainError> {
        let uuid = parse_id("employee_id", employee_id)?;
        let rows: Vec<Project> = self
            .store
            .projects
            .read()
            .values()
            .filter(|p| p.team_member_ids.contains(&uuid))
            .cloned()
            .collect();
        Ok(sorted_by_name(rows, |p| (p.name.as_str(), p.id)))
    }

    async fn add_team_member(
        &self,
        project_id: &str,
        employee_id: &str,
    ) -> Result<Project, DomainError> {
        let pid = parse_id("project_id", project_id)?;
        let eid = parse_id("employee_id", employee_id)?;
        let employees = self.store.employees.read();
        let mut projects = self.store.projects.write();
        let project = projects
            .get_mut(&pid)
            .ok_or_else(|| DomainError::not_found(EntityKind::Project, pid))?;
        if !project.team_member_ids.contains(&eid) {
            check_team(&employees, &[eid])?;
            project.team_member_ids.push(eid);
            project.team_member_ids.sort();
        }
        Ok(project.clone())
    }

    async fn remove_team_member(
        &self,
        project_id: &str,
        employee_id: &str,
    ) -> Result<Project, DomainError> {
        let pid = parse_id("project_id", project_id)?;
        let eid = parse_id("employee_id", employee_id)?;
        let mut projects = self.store.projects.write();
        let project = projects
            .get_mut(&pid)
            .ok_or_else(|| DomainError::not_found(EntityKind::Project, pid))?;
        project.team_member_ids.retain(|m| *m != eid);
        Ok(project.clone())
    }
}
