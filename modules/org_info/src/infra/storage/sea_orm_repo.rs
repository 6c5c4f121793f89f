//! SeaORM-backed repositories. Each call is one logical store operation; the
//! project writes that touch the join table run inside a transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait, Unchanged,
};
use sea_orm::sea_query::JoinType;
use tracing::debug;
use uuid::Uuid;

use crate::contract::model::{Department, Employee, Project, ProjectStatus};
use crate::domain::error::{DomainError, EntityKind};
use crate::domain::ids::{ensure_well_formed, parse_id};
use crate::domain::repo::{DepartmentRepository, EmployeeRepository, ProjectRepository};
use crate::infra::storage::db_error::map_db_err;
use crate::infra::storage::entity::{department, employee, project, project_member};
use crate::infra::storage::mapper::{
    department_to_contract, employee_to_contract, project_to_contract,
};

fn outage(operation: &'static str) -> impl FnOnce(sea_orm::DbErr) -> DomainError {
    move |e| {
        map_db_err(e, operation, || {
            DomainError::store_unavailable(format!("{operation}: unexpected missing row"))
        })
    }
}

// ---------------------------------------------------------------------------
// Departments
// ---------------------------------------------------------------------------

pub struct SeaOrmDepartmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmDepartmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DepartmentRepository for SeaOrmDepartmentRepository {
    async fn save(&self, department: Department) -> Result<(), DomainError> {
        ensure_well_formed("id", department.id)?;
        debug!(department_id = %department.id, "inserting department");
        let active_model = department::ActiveModel {
            id: Set(department.id),
            name: Set(department.name),
            created_at: Set(department.created_at),
            updated_at: Set(department.updated_at),
        };
        department::Entity::insert(active_model)
            .exec_without_returning(&self.db)
            .await
            .map_err(outage("department.save"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Department, DomainError> {
        let uuid = parse_id("id", id)?;
        department::Entity::find_by_id(uuid)
            .one(&self.db)
            .await
            .map_err(outage("department.find_by_id"))?
            .map(department_to_contract)
            .ok_or_else(|| DomainError::not_found(EntityKind::Department, uuid))
    }

    async fn find_all(&self) -> Result<Vec<Department>, DomainError> {
        let rows = department::Entity::find()
            .order_by_asc(department::Column::Name)
            .order_by_asc(department::Column::Id)
            .all(&self.db)
            .await
            .map_err(outage("department.find_all"))?;
        Ok(rows.into_iter().map(department_to_contract).collect())
    }

    async fn update(&self, department: Department) -> Result<Department, DomainError> {
        let id = department.id;
        ensure_well_formed("id", id)?;
        let active_model = department::ActiveModel {
            id: Unchanged(id),
            name: Set(department.name),
            updated_at: Set(Utc::now().max(department.created_at)),
            ..Default::default()
        };
        let model = active_model.update(&self.db).await.map_err(|e| {
            map_db_err(e, "department.update", || {
                DomainError::not_found(EntityKind::Department, id)
            })
        })?;
        Ok(department_to_contract(model))
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let uuid = parse_id("id", id)?;
        let result = department::Entity::delete_by_id(uuid)
            .exec(&self.db)
            .await
            .map_err(outage("department.delete"))?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found(EntityKind::Department, uuid));
        }
        debug!(department_id = %uuid, "department row deleted");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

pub struct SeaOrmEmployeeRepository {
    db: DatabaseConnection,
}

impl SeaOrmEmployeeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmployeeRepository for SeaOrmEmployeeRepository {
    async fn save(&self, employee: Employee) -> Result<(), DomainError> {
        ensure_well_formed("id", employee.id)?;
        ensure_well_formed("department_id", employee.department_id)?;
        debug!(employee_id = %employee.id, "inserting employee");
        let active_model = employee::ActiveModel {
            id: Set(employee.id),
            name: Set(employee.name),
            email: Set(employee.email),
            department_id: Set(employee.department_id),
            created_at: Set(employee.created_at),
            updated_at: Set(employee.updated_at),
        };
        employee::Entity::insert(active_model)
            .exec_without_returning(&self.db)
            .await
            .map_err(outage("employee.save"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Employee, DomainError> {
        let uuid = parse_id("id", id)?;
        employee::Entity::find_by_id(uuid)
            .one(&self.db)
            .await
            .map_err(outage("employee.find_by_id"))?
            .map(employee_to_contract)
            .ok_or_else(|| DomainError::not_found(EntityKind::Employee, uuid))
    }

    async fn find_all(&self) -> Result<Vec<Employee>, DomainError> {
        let rows = employee::Entity::find()
            .order_by_asc(employee::Column::Name)
            .order_by_asc(employee::Column::Id)
            .all(&self.db)
            .await
            .map_err(outage("employee.find_all"))?;
        Ok(rows.into_iter().map(employee_to_contract).collect())
    }

    async fn update(&self, employee: Employee) -> Result<Employee, DomainError> {
        let id = employee.id;
        ensure_well_formed("id", id)?;
        ensure_well_formed("department_id", employee.department_id)?;
        let active_model = employee::ActiveModel {
            id: Unchanged(id),
            name: Set(employee.name),
            email: Set(employee.email),
            department_id: Set(employee.department_id),
            updated_at: Set(Utc::now().max(employee.created_at)),
            ..Default::default()
        };
        let model = active_model.update(&self.db).await.map_err(|e| {
            map_db_err(e, "employee.update", || {
                DomainError::not_found(EntityKind::Employee, id)
            })
        })?;
        Ok(employee_to_contract(model))
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let uuid = parse_id("id", id)?;
        let result = employee::Entity::delete_by_id(uuid)
            .exec(&self.db)
            .await
            .map_err(outage("employee.delete"))?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found(EntityKind::Employee, uuid));
        }
        debug!(employee_id = %uuid, "employee row deleted");
        Ok(())
    }

    async fn find_by_department_id(
        &self,
        department_id: &str,
    ) -> Result<Vec<Employee>, DomainError> {
        let uuid = parse_id("department_id", department_id)?;
        let rows = employee::Entity::find()
            .filter(employee::Column::DepartmentId.eq(uuid))
            .order_by_asc(employee::Column::Name)
            .order_by_asc(employee::Column::Id)
            .all(&self.db)
            .await
            .map_err(outage("employee.find_by_department_id"))?;
        Ok(rows.into_iter().map(employee_to_contract).collect())
    }

    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> Result<bool, DomainError> {
        let mut query = employee::Entity::find().filter(employee::Column::Email.eq(email));
        if let Some(id) = exclude {
            query = query.filter(employee::Column::Id.ne(id));
        }
        let count = query
            .count(&self.db)
            .await
            .map_err(outage("employee.email_exists"))?;
        Ok(count > 0)
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

pub struct SeaOrmProjectRepository {
    db: DatabaseConnection,
}

impl SeaOrmProjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn teams_of<C: sea_orm::ConnectionTrait>(
        conn: &C,
        project_ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, Vec<Uuid>>, DomainError> {
        if project_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = project_member::Entity::find()
            .filter(project_member::Column::ProjectId.is_in(project_ids))
            .all(conn)
            .await
            .map_err(outage("project.load_team"))?;
        let mut teams: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for row in rows {
            teams.entry(row.project_id).or_default().push(row.employee_id);
        }
        Ok(teams)
    }

    async fn with_teams(&self, rows: Vec<project::Model>) -> Result<Vec<Project>, DomainError> {
        let mut teams = Self::teams_of(&self.db, rows.iter().map(|r| r.id).collect()).await?;
        rows.into_iter()
            .map(|row| {
                let team = teams.remove(&row.id).unwrap_or_default();
                project_to_contract(row, team)
            })
            .collect()
    }

    async fn insert_members<C: sea_orm::ConnectionTrait>(
        conn: &C,
        project_id: Uuid,
        employee_ids: &[Uuid],
        operation: &'static str,
    ) -> Result<(), DomainError> {
        if employee_ids.is_empty() {
            return Ok(());
        }
        let members = employee_ids.iter().map(|employee_id| project_member::ActiveModel {
            project_id: Set(project_id),
            employee_id: Set(*employee_id),
        });
        project_member::Entity::insert_many(members)
            .exec_without_returning(conn)
            .await
            .map_err(outage(operation))?;
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for SeaOrmProjectRepository {
    async fn save(&self, project: Project) -> Result<(), DomainError> {
        ensure_well_formed("id", project.id)?;
        debug!(project_id = %project.id, team = project.team_member_ids.len(), "inserting project");
        let txn = self.db.begin().await.map_err(outage("project.save"))?;
        let active_model = project::ActiveModel {
            id: Set(project.id),
            name: Set(project.name),
            description: Set(project.description),
            status: Set(project.status.as_str().to_string()),
            priority: Set(project.priority.as_str().to_string()),
            start_date: Set(project.start_date),
            end_date: Set(project.end_date),
            budget: Set(project.budget),
            created_at: Set(project.created_at),
            updated_at: Set(project.updated_at),
        };
        project::Entity::insert(active_model)
            .exec_without_returning(&txn)
            .await
            .map_err(outage("project.save"))?;
        Self::insert_members(&txn, project.id, &project.team_member_ids, "project.save").await?;
        txn.commit().await.map_err(outage("project.save"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Project, DomainError> {
        let uuid = parse_id("id", id)?;
        let row = project::Entity::find_by_id(uuid)
            .one(&self.db)
            .await
            .map_err(outage("project.find_by_id"))?
            .ok_or_else(|| DomainError::not_found(EntityKind::Project, uuid))?;
        let mut found = self.with_teams(vec![row]).await?;
        found
            .pop()
            .ok_or_else(|| DomainError::not_found(EntityKind::Project, uuid))
    }

    async fn find_all(&self) -> Result<Vec<Project>, DomainError> {
        let rows = project::Entity::find()
            .order_by_asc(project::Column::Name)
            .order_by_asc(project::Column::Id)
            .all(&self.db)
            .await
            .map_err(outage("project.find_all"))?;
        self.with_teams(rows).await
    }

    async fn update(&self, project: Project) -> Result<Project, DomainError> {
        let id = project.id;
        ensure_well_formed("id", id)?;
        let txn = self.db.begin().await.map_err(outage("project.update"))?;
        let active_model = project::ActiveModel {
            id: Unchanged(id),
            name: Set(project.name),
            description: Set(project.description),
            status: Set(project.status.as_str().to_string()),
            priority: Set(project.priority.as_str().to_string()),
            start_date: Set(project.start_date),
            end_date: Set(project.end_date),
            budget: Set(project.budget),
            updated_at: Set(Utc::now().max(project.created_at)),
            ..Default::default()
        };
        let model = active_model.update(&txn).await.map_err(|e| {
            map_db_err(e, "project.update", || {
                DomainError::not_found(EntityKind::Project, id)
            })
        })?;
        project_member::Entity::delete_many()
            .filter(project_member::Column::ProjectId.eq(id))
            .exec(&txn)
            .await
            .map_err(outage("project.update"))?;
        Self::insert_members(&txn, id, &project.team_member_ids, "project.update").await?;
        txn.commit().await.map_err(outage("project.update"))?;
        project_to_contract(model, project.team_member_ids)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let uuid = parse_id("id", id)?;
        let txn = self.db.begin().await.map_err(outage("project.delete"))?;
        project_member::Entity::delete_many()
            .filter(project_member::Column::ProjectId.eq(uuid))
            .exec(&txn)
            .await
            .map_err(outage("project.delete"))?;
        let result = project::Entity::delete_by_id(uuid)
            .exec(&txn)
            .await
            .map_err(outage("project.delete"))?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found(EntityKind::Project, uuid));
        }
        txn.commit().await.map_err(outage("project.delete"))?;
        Ok(())
    }

    async fn find_by_status(&self, status: ProjectStatus) -> Result<Vec<Project>, DomainError> {
        let rows = project::Entity::find()
            .filter(project::Column::Status.eq(status.as_str()))
            .order_by_asc(project::Column::Name)
            .order_by_asc(project::Column::Id)
            .all(&self.db)
            .await
            .map_err(outage("project.find_by_status"))?;
        self.with_teams(rows).await
    }

    async fn find_by_employee_id(&self, employee_id: &str) -> Result<Vec<Project>, DomainError> {
        let uuid = parse_id("employee_id", employee_id)?;
        let rows = project::Entity::find()
            .join(JoinType::InnerJoin, project::Relation::ProjectMember.def())
            .filter(project_member::Column::EmployeeId.eq(uuid))
            .order_by_asc(project::Column::Name)
            .order_by_asc(project::Column::Id)
            .all(&self.db)
            .await
            .map_err(outage("project.find_by_employee_id"))?;
        self.with_teams(rows).await
    }

    async fn add_team_member(
        &self,
        project_id: &str,
        employee_id: &str,
    ) -> Result<Project, DomainError> {
        let pid = parse_id("project_id", project_id)?;
        let eid = parse_id("employee_id", employee_id)?;
        let current = self.find_by_id(project_id).await?;
        if current.team_member_ids.contains(&eid) {
            return Ok(current);
        }
        Self::insert_members(&self.db, pid, &[eid], "project.add_team_member").await?;
        debug!(project_id = %pid, employee_id = %eid, "team member added");
        self.find_by_id(project_id).await
    }

    async fn remove_team_member(
        &self,
        project_id: &str,
        employee_id: &str,
    ) -> Result<Project, DomainError> {
        let pid = parse_id("project_id", project_id)?;
        let eid = parse_id("employee_id", employee_id)?;
        self.find_by_id(project_id).await?;
        project_member::Entity::delete_by_id((pid, eid))
            .exec(&self.db)
            .await
            .map_err(outage("project.remove_team_member"))?;
        self.find_by_id(project_id).await
    }
}
