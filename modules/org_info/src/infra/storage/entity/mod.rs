pub mod department;
pub mod employee;
pub mod project;
pub mod project_member;
