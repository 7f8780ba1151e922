//! Repository for the `invoices` table.

use contractor_core::invoice::{InvoiceStatus, Payment};
use contractor_core::types::{DbId, Timestamp};
use contractor_core::validation::DEFAULT_CURRENCY;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::invoice::{CreateInvoice, Invoice, InvoiceFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, project_id, supplier_id, contractor_id, timesheet_id, \
                       invoice_number, amount, tax_amount, total_amount, currency, issue_date, \
                       due_date, status, submitted_at, paid_at, paid_amount, payment_reference, \
                       created_at, updated_at";

/// Provides persistence for invoices and their payment lifecycle.
pub struct InvoiceRepo;

impl InvoiceRepo {
    /// Insert a new `DRAFT` invoice, returning the created row.
    ///
    /// A duplicate number within the organization violates `uq_invoices_org_number`.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateInvoice,
    ) -> Result<Invoice, sqlx::Error> {
        let query = format!(
            "INSERT INTO invoices
                (organization_id, project_id, supplier_id, contractor_id, timesheet_id,
                 invoice_number, amount, tax_amount, currency, issue_date, due_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, CURRENT_DATE), $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(organization_id)
            .bind(input.project_id)
            .bind(input.supplier_id)
            .bind(input.contractor_id)
            .bind(input.timesheet_id)
            .bind(input.invoice_number.trim())
            .bind(input.amount)
            .bind(input.tax_amount.unwrap_or(Decimal::ZERO))
            .bind(input.currency.as_deref().unwrap_or(DEFAULT_CURRENCY))
            .bind(input.issue_date)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Find an invoice by ID within an organization.
    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM invoices WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List invoices with optional project / status filters, newest first.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        filter: &InvoiceFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Invoice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invoices
             WHERE organization_id = $1
               AND ($2::BIGINT IS NULL OR project_id = $2)
               AND ($3::TEXT IS NULL OR status = $3)
             ORDER BY issue_date DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(organization_id)
            .bind(filter.project_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Every invoice in the organization, for export.
    pub async fn list_all(pool: &PgPool, organization_id: DbId) -> Result<Vec<Invoice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invoices
             WHERE organization_id = $1
             ORDER BY issue_date ASC, id ASC"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// Move a `DRAFT` invoice to `SUBMITTED`.
    ///
    /// Returns `None` if the invoice is no longer a draft.
    pub async fn submit(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!(
            "UPDATE invoices SET status = $3, submitted_at = NOW()
             WHERE id = $1 AND organization_id = $2 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(InvoiceStatus::Submitted.as_str())
            .bind(InvoiceStatus::Draft.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Move a `SUBMITTED` invoice to `PAID`, recording the payment.
    ///
    /// `paid_at` defaults to now. Returns `None` if the invoice is no longer
    /// `SUBMITTED`.
    pub async fn mark_paid(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        payment: &Payment,
        paid_at: Option<Timestamp>,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!(
            "UPDATE invoices SET
                status = $3,
                paid_amount = $4,
                payment_reference = $5,
                paid_at = COALESCE($6, NOW())
             WHERE id = $1 AND organization_id = $2 AND status = $7
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(InvoiceStatus::Paid.as_str())
            .bind(payment.paid_amount)
            .bind(&payment.payment_reference)
            .bind(paid_at)
            .bind(InvoiceStatus::Submitted.as_str())
            .fetch_optional(pool)
            .await
    }
}
