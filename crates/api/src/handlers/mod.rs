//! HTTP handlers, one module per resource.

pub mod auth;
pub mod criteria;
pub mod dashboard;
pub mod evaluations;
pub mod members;
pub mod profiles;
