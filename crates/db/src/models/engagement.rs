//! Engagement entity model and DTOs.

use contractor_core::contract::EngagementStatus;
use contractor_core::types::{Date, DbId, Timestamp};
use contractor_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `engagements` table: a contractor assigned to a project
/// under a contract.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Engagement {
    pub id: DbId,
    pub organization_id: DbId,
    pub contractor_id: DbId,
    pub project_id: DbId,
    pub contract_id: DbId,
    pub role_title: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    #[sqlx(try_from = "String")]
    pub status: EngagementStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new engagement.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEngagement {
    pub contractor_id: DbId,
    pub project_id: DbId,
    pub contract_id: DbId,
    #[validate(
        length(max = 200, message = "must be at most 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub role_title: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
}

/// DTO for updating an existing engagement. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEngagement {
    #[validate(
        length(max = 200, message = "must be at most 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub role_title: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub status: Option<EngagementStatus>,
}
