//! Supplier entity model and DTOs.

use contractor_core::csv::{opt_field, CsvRow};
use contractor_core::types::{DbId, Timestamp};
use contractor_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `suppliers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Supplier {
    pub id: DbId,
    pub organization_id: DbId,
    pub name: String,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CsvRow for Supplier {
    fn headers() -> &'static [&'static str] {
        &["id", "name", "contact_email", "phone", "address", "created_at"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            opt_field(&self.contact_email),
            opt_field(&self.phone),
            opt_field(&self.address),
            self.created_at.to_rfc3339(),
        ]
    }
}

/// DTO for creating a new supplier.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSupplier {
    #[validate(
        length(max = 200, message = "must be at most 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub contact_email: Option<String>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub address: Option<String>,
}

/// DTO for updating an existing supplier. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSupplier {
    #[validate(
        length(max = 200, message = "must be at most 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub contact_email: Option<String>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub address: Option<String>,
}
