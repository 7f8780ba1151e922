use axum::routing::get;
use axum::Router;

use crate::handlers::engagement;
use crate::state::AppState;

/// Routes mounted at `/engagements`.
///
/// ```text
/// GET  /       -> list
/// POST /       -> create
/// GET  /{id}   -> get_by_id
/// PUT  /{id}   -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(engagement::list).post(engagement::create))
        .route("/{id}", get(engagement::get_by_id).put(engagement::update))
}
