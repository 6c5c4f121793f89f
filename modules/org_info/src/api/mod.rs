pub mod graph;
pub mod rest;
