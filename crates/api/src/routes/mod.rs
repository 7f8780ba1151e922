pub mod admin;
pub mod auth;
pub mod contract;
pub mod contractor;
pub mod engagement;
pub mod export;
pub mod health;
pub mod invoice;
pub mod project;
pub mod supplier;
pub mod timesheet;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register org + admin (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /admin/users                                     list, create (admin only)
/// /admin/users/{id}                                deactivate (DELETE)
///
/// /suppliers                                       list, create
/// /suppliers/{id}                                  get, update, delete
/// /contractors                                     list, create
/// /contractors/{id}                                get, update
/// /contracts                                       list, create
/// /contracts/{id}                                  get, update
/// /projects                                        list, create
/// /projects/{id}                                   get, update
/// /projects/{id}/budget-utilization                utilization report
/// /engagements                                     list, create
/// /engagements/{id}                                get, update
///
/// /timesheets                                      list, create
/// /timesheets/{id}                                 get with entries
/// /timesheets/{id}/entries                         replace entries (PUT)
/// /timesheets/{id}/submit                          DRAFT -> SUBMITTED (PATCH)
/// /timesheets/{id}/approve                         SUBMITTED -> APPROVED (PATCH)
/// /timesheets/{id}/reject                          SUBMITTED -> REJECTED (PATCH)
///
/// /invoices                                        list, create
/// /invoices/{id}                                   get
/// /invoices/{id}/submit                            DRAFT -> SUBMITTED (PATCH)
/// /invoices/{id}/mark-paid                         SUBMITTED -> PAID (PATCH)
///
/// /exports/{suppliers,contractors,timesheets,invoices}.csv
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/suppliers", supplier::router())
        .nest("/contractors", contractor::router())
        .nest("/contracts", contract::router())
        .nest("/projects", project::router())
        .nest("/engagements", engagement::router())
        .nest("/timesheets", timesheet::router())
        .nest("/invoices", invoice::router())
        .nest("/exports", export::router())
}
