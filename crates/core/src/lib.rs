//! Domain logic for the staff evaluation service.
//!
//! This crate performs no I/O. Rows are loaded by `staffeval-db` and passed
//! in by the caller; everything here is plain data in, plain data out.

pub mod access;
pub mod assessment_status;
pub mod criteria;
pub mod error;
pub mod members;
pub mod reporting;
pub mod roles;
pub mod scoring;
pub mod types;
