//! Resolver adapter for the graph-query surface.
//!
//! A schema layer binds its `Query`/`Mutation` fields to [`QueryRoot`] and
//! [`MutationRoot`]; everything here goes through the public [`OrgInfoApi`]
//! contract, so no business rule lives in this module.
//!
//! [`OrgInfoApi`]: crate::contract::client::OrgInfoApi

pub mod error;
pub mod model;
pub mod resolvers;

pub use error::{GraphError, GraphResult};
pub use resolvers::{MutationRoot, QueryRoot, Resolver};
