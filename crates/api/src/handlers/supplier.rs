//! Handlers for the `/suppliers` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contractor_core::types::DbId;
use contractor_db::models::supplier::{CreateSupplier, Supplier, UpdateSupplier};
use contractor_db::repositories::SupplierRepo;
use validator::Validate;

use super::found;
use crate::error::AppResult;
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/suppliers
pub async fn create(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<CreateSupplier>,
) -> AppResult<(StatusCode, Json<DataResponse<Supplier>>)> {
    input.validate()?;
    let supplier = SupplierRepo::create(&state.pool, user.organization_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: supplier })))
}

/// GET /api/v1/suppliers
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Supplier>>>> {
    let suppliers =
        SupplierRepo::list(&state.pool, user.organization_id, page.limit(), page.offset()).await?;
    Ok(Json(DataResponse { data: suppliers }))
}

/// GET /api/v1/suppliers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Supplier>>> {
    let supplier = SupplierRepo::find_by_id(&state.pool, user.organization_id, id).await?;
    Ok(Json(DataResponse {
        data: found(supplier, "Supplier", id)?,
    }))
}

/// PUT /api/v1/suppliers/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSupplier>,
) -> AppResult<Json<DataResponse<Supplier>>> {
    input.validate()?;
    let supplier = SupplierRepo::update(&state.pool, user.organization_id, id, &input).await?;
    Ok(Json(DataResponse {
        data: found(supplier, "Supplier", id)?,
    }))
}

/// DELETE /api/v1/suppliers/{id}
///
/// Hard delete. Contractors, contracts and invoices keep their rows with the
/// supplier link cleared.
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = SupplierRepo::delete(&state.pool, user.organization_id, id).await?;
    found(deleted.then_some(()), "Supplier", id)?;
    tracing::info!(supplier_id = id, user_id = user.user_id, "Supplier deleted");
    Ok(StatusCode::NO_CONTENT)
}
