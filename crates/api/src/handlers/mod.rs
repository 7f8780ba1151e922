//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers validate input, check cross-record invariants, delegate to the
//! corresponding repository in `contractor_db`, and map errors via [`AppError`].

pub mod admin;
pub mod auth;
pub mod contract;
pub mod contractor;
pub mod engagement;
pub mod export;
pub mod invoice;
pub mod project;
pub mod supplier;
pub mod timesheet;

use contractor_core::error::CoreError;
use contractor_core::types::DbId;

use crate::error::AppError;

/// Turn a missing row into a 404 for `entity`.
pub(crate) fn found<T>(row: Option<T>, entity: &'static str, id: DbId) -> Result<T, AppError> {
    row.ok_or(AppError::Core(CoreError::NotFound { entity, id }))
}

/// A referenced record outside the caller's organization (or missing) is a
/// field error on the referencing field, not a 404 for the request.
pub(crate) fn referenced<T>(
    row: Option<T>,
    field: &'static str,
    entity: &str,
) -> Result<T, AppError> {
    row.ok_or_else(|| {
        AppError::Core(CoreError::InvalidFields(vec![
            contractor_core::error::FieldError::new(field, format!("{entity} does not exist")),
        ]))
    })
}
