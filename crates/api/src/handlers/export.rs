//! CSV downloads of organization records.
//!
//! Each endpoint returns the whole organization's rows, header first.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use contractor_core::csv::{build_csv, CsvRow};
use contractor_core::roles::Permission;
use contractor_db::repositories::{ContractorRepo, InvoiceRepo, SupplierRepo, TimesheetRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/exports/suppliers.csv
pub async fn suppliers(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    user.require(Permission::ExportData)?;
    let rows = SupplierRepo::list_all(&state.pool, user.organization_id).await?;
    Ok(csv_attachment("suppliers.csv", &rows, &user))
}

/// GET /api/v1/exports/contractors.csv
pub async fn contractors(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    user.require(Permission::ExportData)?;
    let rows = ContractorRepo::list_all(&state.pool, user.organization_id).await?;
    Ok(csv_attachment("contractors.csv", &rows, &user))
}

/// GET /api/v1/exports/timesheets.csv
pub async fn timesheets(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    user.require(Permission::ExportData)?;
    let rows = TimesheetRepo::export_rows(&state.pool, user.organization_id).await?;
    Ok(csv_attachment("timesheets.csv", &rows, &user))
}

/// GET /api/v1/exports/invoices.csv
pub async fn invoices(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    user.require(Permission::ExportData)?;
    let rows = InvoiceRepo::list_all(&state.pool, user.organization_id).await?;
    Ok(csv_attachment("invoices.csv", &rows, &user))
}

fn csv_attachment<R: CsvRow>(
    filename: &'static str,
    rows: &[R],
    user: &AuthUser,
) -> impl IntoResponse {
    tracing::debug!(
        export = filename,
        rows = rows.len(),
        user_id = user.user_id,
        "CSV export"
    );
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        build_csv(rows),
    )
}
