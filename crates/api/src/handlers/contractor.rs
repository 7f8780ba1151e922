//! Handlers for the `/contractors` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contractor_core::types::DbId;
use contractor_db::models::contractor::{Contractor, CreateContractor, UpdateContractor};
use contractor_db::repositories::{ContractorRepo, SupplierRepo};
use validator::Validate;

use super::{found, referenced};
use crate::error::AppResult;
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/contractors
pub async fn create(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<CreateContractor>,
) -> AppResult<(StatusCode, Json<DataResponse<Contractor>>)> {
    input.validate()?;
    if let Some(supplier_id) = input.supplier_id {
        let supplier =
            SupplierRepo::find_by_id(&state.pool, user.organization_id, supplier_id).await?;
        referenced(supplier, "supplier_id", "Supplier")?;
    }
    let contractor = ContractorRepo::create(&state.pool, user.organization_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: contractor })))
}

/// GET /api/v1/contractors
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Contractor>>>> {
    let contractors =
        ContractorRepo::list(&state.pool, user.organization_id, page.limit(), page.offset())
            .await?;
    Ok(Json(DataResponse { data: contractors }))
}

/// GET /api/v1/contractors/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Contractor>>> {
    let contractor = ContractorRepo::find_by_id(&state.pool, user.organization_id, id).await?;
    Ok(Json(DataResponse {
        data: found(contractor, "Contractor", id)?,
    }))
}

/// PUT /api/v1/contractors/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContractor>,
) -> AppResult<Json<DataResponse<Contractor>>> {
    input.validate()?;
    if let Some(supplier_id) = input.supplier_id {
        let supplier =
            SupplierRepo::find_by_id(&state.pool, user.organization_id, supplier_id).await?;
        referenced(supplier, "supplier_id", "Supplier")?;
    }
    let contractor = ContractorRepo::update(&state.pool, user.organization_id, id, &input).await?;
    Ok(Json(DataResponse {
        data: found(contractor, "Contractor", id)?,
    }))
}
