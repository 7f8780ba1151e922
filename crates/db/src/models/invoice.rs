//! Invoice entity model and DTOs.

use contractor_core::csv::{opt_field, CsvRow};
use contractor_core::invoice::InvoiceStatus;
use contractor_core::types::{Amount, Date, DbId, Timestamp};
use contractor_core::validation::{validate_currency, validate_money, validate_not_blank};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `invoices` table.
///
/// `total_amount` is a generated column (`amount + tax_amount`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invoice {
    pub id: DbId,
    pub organization_id: DbId,
    pub project_id: DbId,
    pub supplier_id: Option<DbId>,
    pub contractor_id: Option<DbId>,
    pub timesheet_id: Option<DbId>,
    pub invoice_number: String,
    pub amount: Amount,
    pub tax_amount: Amount,
    pub total_amount: Amount,
    pub currency: String,
    pub issue_date: Date,
    pub due_date: Option<Date>,
    #[sqlx(try_from = "String")]
    pub status: InvoiceStatus,
    pub submitted_at: Option<Timestamp>,
    pub paid_at: Option<Timestamp>,
    pub paid_amount: Option<Amount>,
    pub payment_reference: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CsvRow for Invoice {
    fn headers() -> &'static [&'static str] {
        &[
            "id",
            "invoice_number",
            "project_id",
            "supplier_id",
            "contractor_id",
            "amount",
            "tax_amount",
            "total_amount",
            "currency",
            "issue_date",
            "due_date",
            "status",
            "paid_at",
            "paid_amount",
            "payment_reference",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.invoice_number.clone(),
            self.project_id.to_string(),
            opt_field(&self.supplier_id),
            opt_field(&self.contractor_id),
            self.amount.to_string(),
            self.tax_amount.to_string(),
            self.total_amount.to_string(),
            self.currency.clone(),
            self.issue_date.to_string(),
            opt_field(&self.due_date),
            self.status.to_string(),
            self.paid_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            opt_field(&self.paid_amount),
            opt_field(&self.payment_reference),
        ]
    }
}

/// DTO for creating a new invoice. Invoices start as `DRAFT`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvoice {
    pub project_id: DbId,
    pub supplier_id: Option<DbId>,
    pub contractor_id: Option<DbId>,
    pub timesheet_id: Option<DbId>,
    #[validate(
        length(max = 100, message = "must be at most 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub invoice_number: String,
    #[validate(custom(function = "validate_money"))]
    pub amount: Amount,
    /// Defaults to 0 if omitted.
    #[validate(custom(function = "validate_money"))]
    pub tax_amount: Option<Amount>,
    #[validate(custom(function = "validate_currency"))]
    pub currency: Option<String>,
    /// Defaults to today if omitted.
    pub issue_date: Option<Date>,
    pub due_date: Option<Date>,
}

/// Request body for marking an invoice paid.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkInvoicePaid {
    pub paid_amount: Option<Amount>,
    pub payment_reference: Option<String>,
    /// Defaults to now if omitted.
    pub paid_at: Option<Timestamp>,
}

/// Optional filters for listing invoices.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceFilter {
    pub project_id: Option<DbId>,
    pub status: Option<InvoiceStatus>,
}
