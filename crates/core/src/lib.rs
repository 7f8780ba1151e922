//! Domain layer for the contractor management service.
//!
//! Everything in this crate is pure: status machines, aggregation, permission
//! rules, validation helpers and CSV encoding. Persistence lives in
//! `contractor-db`, HTTP in `contractor-api`.

pub mod budget;
pub mod contract;
pub mod csv;
pub mod error;
pub mod invoice;
pub mod pagination;
pub mod roles;
pub mod status;
pub mod timesheet;
pub mod types;
pub mod validation;
