pub mod cascade;
pub mod error;
pub(crate) mod guard;
pub mod ids;
pub mod repo;
pub mod service;
pub mod validation;
