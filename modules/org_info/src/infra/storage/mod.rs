//! Store implementations of the domain repository ports.

pub mod db_error;
pub mod entity;
pub mod mapper;
pub mod memory_repo;
pub mod migrations;
pub mod sea_orm_repo;

pub use memory_repo::{
    InMemoryDepartmentRepository, InMemoryEmployeeRepository, InMemoryProjectRepository,
    InMemoryStore,
};
pub use sea_orm_repo::{
    SeaOrmDepartmentRepository, SeaOrmEmployeeRepository, SeaOrmProjectRepository,
};
