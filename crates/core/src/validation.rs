//! Field validators shared by the create/update DTOs.
//!
//! The `validate_*` functions with a `ValidationError` return type plug into
//! `#[validate(custom(function = ...))]`; the ones returning [`CoreError`]
//! are for cross-field rules checked in handlers.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

use crate::error::CoreError;
use crate::types::{Amount, Date};

/// ISO 4217 style currency code: three upper-case letters.
static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid regex"));

/// Currency used when a create request omits one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Decimal places stored for money, rates and hours.
pub const DECIMAL_SCALE: u32 = 2;

/// Precision of the `NUMERIC(14, 2)` money columns.
pub const MONEY_PRECISION: u32 = 14;

/// Precision of the `NUMERIC(12, 2)` contract rate column.
pub const RATE_PRECISION: u32 = 12;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub fn validate_currency(code: &str) -> Result<(), ValidationError> {
    if CURRENCY_RE.is_match(code) {
        Ok(())
    } else {
        Err(error(
            "currency",
            "must be a three-letter upper-case currency code",
        ))
    }
}

pub fn validate_non_negative(value: &Amount) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(error("non_negative", "must not be negative"))
    } else {
        Ok(())
    }
}

/// Why `value` does not fit a `NUMERIC(precision, 2)` column, if it does not.
pub fn numeric_overflow(value: &Amount, precision: u32) -> Option<String> {
    if value.normalize().scale() > DECIMAL_SCALE {
        return Some(format!("must have at most {DECIMAL_SCALE} decimal places"));
    }
    let limit = Decimal::from(10u64.pow(precision - DECIMAL_SCALE));
    if value.abs() >= limit {
        return Some(format!("must be less than {limit}"));
    }
    None
}

fn bounded(value: &Amount, precision: u32) -> Result<(), ValidationError> {
    validate_non_negative(value)?;
    match numeric_overflow(value, precision) {
        Some(message) => {
            let mut err = ValidationError::new("numeric_range");
            err.message = Some(message.into());
            Err(err)
        }
        None => Ok(()),
    }
}

/// Non-negative amount that fits a money column.
pub fn validate_money(value: &Amount) -> Result<(), ValidationError> {
    bounded(value, MONEY_PRECISION)
}

/// Non-negative rate that fits the contract rate column.
pub fn validate_rate(value: &Amount) -> Result<(), ValidationError> {
    bounded(value, RATE_PRECISION)
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "must not be blank"))
    } else {
        Ok(())
    }
}

/// An optional end date must not precede the start date.
pub fn validate_date_range(
    field: &str,
    start: Date,
    end: Option<Date>,
) -> Result<(), CoreError> {
    match end {
        Some(end) if end < start => Err(CoreError::Validation(format!(
            "{field} end date {end} is before start date {start}"
        ))),
        _ => Ok(()),
    }
}
