use axum::routing::get;
use axum::Router;

use crate::handlers::export;
use crate::state::AppState;

/// Routes mounted at `/exports`. Manager or admin only.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suppliers.csv", get(export::suppliers))
        .route("/contractors.csv", get(export::contractors))
        .route("/timesheets.csv", get(export::timesheets))
        .route("/invoices.csv", get(export::invoices))
}
