//! Contractor entity model and DTOs.

use contractor_core::csv::{opt_field, CsvRow};
use contractor_core::types::{DbId, Timestamp};
use contractor_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `contractors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contractor {
    pub id: DbId,
    pub organization_id: DbId,
    pub supplier_id: Option<DbId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Contractor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl CsvRow for Contractor {
    fn headers() -> &'static [&'static str] {
        &[
            "id",
            "first_name",
            "last_name",
            "email",
            "phone",
            "supplier_id",
            "is_active",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            opt_field(&self.phone),
            opt_field(&self.supplier_id),
            self.is_active.to_string(),
        ]
    }
}

/// DTO for creating a new contractor.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContractor {
    pub supplier_id: Option<DbId>,
    #[validate(
        length(max = 100, message = "must be at most 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub first_name: String,
    #[validate(
        length(max = 100, message = "must be at most 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub phone: Option<String>,
}

/// DTO for updating an existing contractor. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateContractor {
    pub supplier_id: Option<DbId>,
    #[validate(
        length(max = 100, message = "must be at most 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub first_name: Option<String>,
    #[validate(
        length(max = 100, message = "must be at most 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub last_name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}
