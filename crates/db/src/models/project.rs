//! Project entity model and DTOs.

use contractor_core::types::{Amount, Date, DbId, Timestamp};
use contractor_core::validation::{validate_currency, validate_money, validate_not_blank};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project row from the `projects` table.
///
/// Spend is never stored here; see `ProjectRepo::spend_breakdown`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub organization_id: DbId,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub budget: Amount,
    pub currency: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(
        length(max = 200, message = "must be at most 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(
        length(max = 50, message = "must be at most 50 characters"),
        custom(function = "validate_not_blank")
    )]
    pub code: String,
    pub description: Option<String>,
    /// Defaults to 0 if omitted.
    #[validate(custom(function = "validate_money"))]
    pub budget: Option<Amount>,
    #[validate(custom(function = "validate_currency"))]
    pub currency: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(
        length(max = 200, message = "must be at most 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_money"))]
    pub budget: Option<Amount>,
    #[validate(custom(function = "validate_currency"))]
    pub currency: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}
