//! Invoice status tracking and payment guard.

use rust_decimal::Decimal;

use crate::error::{CoreError, FieldError};
use crate::types::Amount;
use crate::validation::{numeric_overflow, MONEY_PRECISION};

/// Maximum length of a payment reference.
pub const MAX_PAYMENT_REFERENCE_LENGTH: usize = 200;

crate::define_status_enum! {
    /// Invoice lifecycle: DRAFT -> SUBMITTED -> PAID.
    InvoiceStatus {
        Draft => "DRAFT",
        Submitted => "SUBMITTED",
        Paid => "PAID",
    }
}

impl InvoiceStatus {
    /// Whether the invoice counts toward a project's spend.
    pub fn counts_as_spend(self) -> bool {
        match self {
            InvoiceStatus::Draft => false,
            InvoiceStatus::Submitted | InvoiceStatus::Paid => true,
        }
    }
}

/// Invoice total is always `amount + tax`.
pub fn total_amount(amount: Amount, tax_amount: Amount) -> Amount {
    amount + tax_amount
}

/// The stored total must fit the same money column as its parts.
pub fn check_total(amount: Amount, tax_amount: Amount) -> Result<Amount, CoreError> {
    let total = total_amount(amount, tax_amount);
    match numeric_overflow(&total, MONEY_PRECISION) {
        Some(message) => Err(CoreError::InvalidFields(vec![FieldError::new(
            "tax_amount",
            format!("amount plus tax {message}"),
        )])),
        None => Ok(total),
    }
}

/// DRAFT -> SUBMITTED.
pub fn check_submit(current: InvoiceStatus) -> Result<InvoiceStatus, CoreError> {
    match current {
        InvoiceStatus::Draft => Ok(InvoiceStatus::Submitted),
        InvoiceStatus::Submitted | InvoiceStatus::Paid => Err(CoreError::Validation(format!(
            "Cannot submit an invoice in status {current}"
        ))),
    }
}

/// Payment details accepted on SUBMITTED -> PAID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub paid_amount: Amount,
    pub payment_reference: String,
}

/// SUBMITTED -> PAID. Requires a positive amount and a non-blank reference.
///
/// There is no reconciliation against the invoice total: partial and over
/// payments are recorded as given.
pub fn check_mark_paid(
    current: InvoiceStatus,
    paid_amount: Option<Amount>,
    payment_reference: Option<&str>,
) -> Result<Payment, CoreError> {
    match current {
        InvoiceStatus::Submitted => {}
        InvoiceStatus::Draft | InvoiceStatus::Paid => {
            return Err(CoreError::Validation(format!(
                "Cannot mark an invoice in status {current} as paid"
            )))
        }
    }

    let mut errors = Vec::new();

    let amount = match paid_amount {
        Some(a) if a <= Decimal::ZERO => {
            errors.push(FieldError::new("paid_amount", "must be greater than zero"));
            None
        }
        Some(a) => match numeric_overflow(&a, MONEY_PRECISION) {
            Some(message) => {
                errors.push(FieldError::new("paid_amount", message));
                None
            }
            None => Some(a),
        },
        None => {
            errors.push(FieldError::new("paid_amount", "is required"));
            None
        }
    };

    let reference = match payment_reference.map(str::trim) {
        Some(r) if r.is_empty() => {
            errors.push(FieldError::new("payment_reference", "must not be blank"));
            None
        }
        Some(r) if r.chars().count() > MAX_PAYMENT_REFERENCE_LENGTH => {
            errors.push(FieldError::new(
                "payment_reference",
                format!("must be at most {MAX_PAYMENT_REFERENCE_LENGTH} characters"),
            ));
            None
        }
        Some(r) => Some(r.to_string()),
        None => {
            errors.push(FieldError::new("payment_reference", "is required"));
            None
        }
    };

    match (amount, reference) {
        (Some(paid_amount), Some(payment_reference)) => Ok(Payment {
            paid_amount,
            payment_reference,
        }),
        _ => Err(CoreError::InvalidFields(errors)),
    }
}
