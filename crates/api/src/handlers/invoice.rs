//! Handlers for the `/invoices` resource and its payment lifecycle.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contractor_core::error::{CoreError, FieldError};
use contractor_core::invoice::{check_mark_paid, check_submit, check_total};
use contractor_core::roles::Permission;
use contractor_core::types::DbId;
use contractor_core::validation::validate_date_range;
use contractor_db::models::invoice::{CreateInvoice, Invoice, InvoiceFilter, MarkInvoicePaid};
use contractor_db::repositories::{
    ContractorRepo, InvoiceRepo, ProjectRepo, SupplierRepo, TimesheetRepo,
};
use validator::Validate;

use super::{found, referenced};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/invoices
///
/// Every linked record must live in the caller's organization. A linked
/// timesheet must belong to the invoiced project.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateInvoice>,
) -> AppResult<(StatusCode, Json<DataResponse<Invoice>>)> {
    user.require(Permission::ManageInvoices)?;
    input.validate()?;
    check_total(input.amount, input.tax_amount.unwrap_or_default())?;
    if let Some(issue_date) = input.issue_date {
        validate_date_range("Invoice", issue_date, input.due_date)?;
    }

    let org = user.organization_id;
    let project = ProjectRepo::find_by_id(&state.pool, org, input.project_id).await?;
    referenced(project, "project_id", "Project")?;

    if let Some(supplier_id) = input.supplier_id {
        let supplier = SupplierRepo::find_by_id(&state.pool, org, supplier_id).await?;
        referenced(supplier, "supplier_id", "Supplier")?;
    }
    if let Some(contractor_id) = input.contractor_id {
        let contractor = ContractorRepo::find_by_id(&state.pool, org, contractor_id).await?;
        referenced(contractor, "contractor_id", "Contractor")?;
    }
    if let Some(timesheet_id) = input.timesheet_id {
        let timesheet = TimesheetRepo::find_by_id(&state.pool, org, timesheet_id).await?;
        let timesheet = referenced(timesheet, "timesheet_id", "Timesheet")?;
        if timesheet.project_id != input.project_id {
            return Err(AppError::Core(CoreError::InvalidFields(vec![FieldError::new(
                "timesheet_id",
                "must belong to the invoiced project",
            )])));
        }
    }

    let invoice = InvoiceRepo::create(&state.pool, org, &input).await?;
    tracing::info!(
        invoice_id = invoice.id,
        project_id = invoice.project_id,
        user_id = user.user_id,
        total = %invoice.total_amount,
        "Invoice created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: invoice })))
}

/// GET /api/v1/invoices?project_id=&status=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<InvoiceFilter>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Invoice>>>> {
    let invoices = InvoiceRepo::list(
        &state.pool,
        user.organization_id,
        &filter,
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: invoices }))
}

/// GET /api/v1/invoices/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Invoice>>> {
    let invoice = InvoiceRepo::find_by_id(&state.pool, user.organization_id, id).await?;
    Ok(Json(DataResponse {
        data: found(invoice, "Invoice", id)?,
    }))
}

/// PATCH /api/v1/invoices/{id}/submit
pub async fn submit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Invoice>>> {
    user.require(Permission::ManageInvoices)?;

    let current = found(
        InvoiceRepo::find_by_id(&state.pool, user.organization_id, id).await?,
        "Invoice",
        id,
    )?;
    check_submit(current.status)?;

    let invoice = InvoiceRepo::submit(&state.pool, user.organization_id, id)
        .await?
        .ok_or_else(|| concurrent_change(id))?;

    tracing::info!(
        invoice_id = id,
        user_id = user.user_id,
        from = %current.status,
        to = %invoice.status,
        "Invoice status changed"
    );
    Ok(Json(DataResponse { data: invoice }))
}

/// PATCH /api/v1/invoices/{id}/mark-paid
///
/// Body: `{ "paid_amount": "1200.00", "payment_reference": "TX-42", "paid_at"?: ... }`.
pub async fn mark_paid(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<MarkInvoicePaid>,
) -> AppResult<Json<DataResponse<Invoice>>> {
    user.require(Permission::ManageInvoices)?;

    let current = found(
        InvoiceRepo::find_by_id(&state.pool, user.organization_id, id).await?,
        "Invoice",
        id,
    )?;
    let payment = check_mark_paid(
        current.status,
        input.paid_amount,
        input.payment_reference.as_deref(),
    )?;

    let invoice =
        InvoiceRepo::mark_paid(&state.pool, user.organization_id, id, &payment, input.paid_at)
            .await?
            .ok_or_else(|| concurrent_change(id))?;

    tracing::info!(
        invoice_id = id,
        user_id = user.user_id,
        from = %current.status,
        to = %invoice.status,
        paid_amount = %payment.paid_amount,
        "Invoice status changed"
    );
    Ok(Json(DataResponse { data: invoice }))
}

fn concurrent_change(id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Invoice {id} was modified by another request; reload and try again"
    )))
}
