//! Contract entity model and DTOs.

use contractor_core::contract::ContractStatus;
use contractor_core::types::{Amount, Date, DbId, Timestamp};
use contractor_core::validation::{validate_currency, validate_not_blank, validate_rate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `contracts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contract {
    pub id: DbId,
    pub organization_id: DbId,
    pub contractor_id: DbId,
    pub supplier_id: Option<DbId>,
    pub title: String,
    /// Hourly rate.
    pub rate: Amount,
    pub currency: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    #[sqlx(try_from = "String")]
    pub status: ContractStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new contract.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContract {
    pub contractor_id: DbId,
    pub supplier_id: Option<DbId>,
    #[validate(
        length(max = 200, message = "must be at most 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,
    #[validate(custom(function = "validate_rate"))]
    pub rate: Amount,
    #[validate(custom(function = "validate_currency"))]
    pub currency: Option<String>,
    pub start_date: Date,
    pub end_date: Option<Date>,
    /// Defaults to `DRAFT` if omitted.
    pub status: Option<ContractStatus>,
}

/// DTO for updating an existing contract. All fields are optional.
///
/// The contractor cannot be changed once the contract exists.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateContract {
    pub supplier_id: Option<DbId>,
    #[validate(
        length(max = 200, message = "must be at most 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,
    #[validate(custom(function = "validate_rate"))]
    pub rate: Option<Amount>,
    #[validate(custom(function = "validate_currency"))]
    pub currency: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub status: Option<ContractStatus>,
}
