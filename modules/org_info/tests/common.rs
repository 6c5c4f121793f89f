#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use org_info::domain::repo::{DepartmentRepository, EmployeeRepository, ProjectRepository};
use org_info::domain::service::{Service, ServiceConfig};
use org_info::infra::storage::{
    InMemoryDepartmentRepository, InMemoryEmployeeRepository, InMemoryProjectRepository,
    InMemoryStore, SeaOrmDepartmentRepository, SeaOrmEmployeeRepository,
    SeaOrmProjectRepository,
};
use org_info::model::{Department, Employee, Project, ProjectPriority, ProjectStatus};
use org_info::OrgInfo;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

/// The three repositories of one store, sharing its tables.
#[derive(Clone)]
pub struct Stores {
    pub label: &'static str,
    pub departments: Arc<dyn DepartmentRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub projects: Arc<dyn ProjectRepository>,
}

impl Stores {
    pub fn service(&self) -> Service {
        Service::new(
            self.departments.clone(),
            self.employees.clone(),
            self.projects.clone(),
            ServiceConfig::default(),
        )
    }
}

pub fn memory_stores() -> Stores {
    let store = InMemoryStore::new();
    Stores {
        label: "memory",
        departments: Arc::new(InMemoryDepartmentRepository::new(store.clone())),
        employees: Arc::new(InMemoryEmployeeRepository::new(store.clone())),
        projects: Arc::new(InMemoryProjectRepository::new(store)),
    }
}

/// Fresh in-memory SQLite database with the schema applied.
pub async fn sqlite_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect to in-memory sqlite");
    OrgInfo::migrate(&db).await.expect("run migrations");
    db
}

pub async fn sqlite_stores() -> Stores {
    let db = sqlite_db().await;
    Stores {
        label: "sqlite",
        departments: Arc::new(SeaOrmDepartmentRepository::new(db.clone())),
        employees: Arc::new(SeaOrmEmployeeRepository::new(db.clone())),
        projects: Arc::new(SeaOrmProjectRepository::new(db)),
    }
}

/// One instance of every store implementation.
pub async fn all_stores() -> Vec<Stores> {
    vec![memory_stores(), sqlite_stores().await]
}

pub fn memory_service() -> Arc<Service> {
    Arc::new(memory_stores().service())
}

pub fn department(name: &str) -> Department {
    let now = Utc::now();
    Department {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn employee(name: &str, email: &str, department_id: Uuid) -> Employee {
    let now = Utc::now();
    Employee {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        department_id,
        created_at: now,
        updated_at: now,
    }
}

pub fn project(name: &str, status: ProjectStatus, team: Vec<Uuid>) -> Project {
    let now = Utc::now();
    let mut team_member_ids = team;
    team_member_ids.sort();
    Project {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        status,
        priority: ProjectPriority::Medium,
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        budget: 50_000.0,
        team_member_ids,
        created_at: now,
        updated_at: now,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
