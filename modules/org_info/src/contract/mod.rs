pub mod client;
pub mod ctx;
pub mod error;
pub mod model;

pub use client::OrgInfoApi;
pub use ctx::OpCtx;
pub use error::OrgInfoError;
pub use model::*;
