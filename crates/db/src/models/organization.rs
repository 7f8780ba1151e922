//! Organization (tenant) model.

use serde::Serialize;
use sqlx::FromRow;
use contractor_core::types::{DbId, Timestamp};

/// A row from the `organizations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organization {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The first administrator created together with a new organization.
///
/// The password is already hashed.
#[derive(Debug)]
pub struct NewOwner {
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
}
