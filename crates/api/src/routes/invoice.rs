use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::invoice;
use crate::state::AppState;

/// Routes mounted at `/invoices`.
///
/// ```text
/// GET   /                 -> list (?project_id, status)
/// POST  /                 -> create
/// GET   /{id}             -> get_by_id
/// PATCH /{id}/submit      -> submit
/// PATCH /{id}/mark-paid   -> mark_paid
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(invoice::list).post(invoice::create))
        .route("/{id}", get(invoice::get_by_id))
        .route("/{id}/submit", patch(invoice::submit))
        .route("/{id}/mark-paid", patch(invoice::mark_paid))
}
