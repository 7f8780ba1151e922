//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` + `Validate` update DTO (all `Option` fields) for patches

pub mod contract;
pub mod contractor;
pub mod engagement;
pub mod invoice;
pub mod organization;
pub mod project;
pub mod role;
pub mod session;
pub mod supplier;
pub mod timesheet;
pub mod user;
