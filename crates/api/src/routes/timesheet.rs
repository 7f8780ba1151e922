use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::timesheet;
use crate::state::AppState;

/// Routes mounted at `/timesheets`.
///
/// ```text
/// GET   /                 -> list (?engagement_id, project_id, status)
/// POST  /                 -> create
/// GET   /{id}             -> get_by_id
/// PUT   /{id}/entries     -> replace_entries (DRAFT only)
/// PATCH /{id}/submit      -> submit
/// PATCH /{id}/approve     -> approve (reviewers)
/// PATCH /{id}/reject      -> reject (reviewers)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(timesheet::list).post(timesheet::create))
        .route("/{id}", get(timesheet::get_by_id))
        .route("/{id}/entries", put(timesheet::replace_entries))
        .route("/{id}/submit", patch(timesheet::submit))
        .route("/{id}/approve", patch(timesheet::approve))
        .route("/{id}/reject", patch(timesheet::reject))
}
