//! Handlers for the `/contracts` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contractor_core::types::DbId;
use contractor_core::validation::validate_date_range;
use contractor_db::models::contract::{Contract, CreateContract, UpdateContract};
use contractor_db::repositories::{ContractRepo, ContractorRepo, SupplierRepo};
use validator::Validate;

use super::{found, referenced};
use crate::error::AppResult;
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::query::{ContractListParams, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/contracts
pub async fn create(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<CreateContract>,
) -> AppResult<(StatusCode, Json<DataResponse<Contract>>)> {
    input.validate()?;
    validate_date_range("Contract", input.start_date, input.end_date)?;

    let contractor =
        ContractorRepo::find_by_id(&state.pool, user.organization_id, input.contractor_id).await?;
    referenced(contractor, "contractor_id", "Contractor")?;
    if let Some(supplier_id) = input.supplier_id {
        let supplier =
            SupplierRepo::find_by_id(&state.pool, user.organization_id, supplier_id).await?;
        referenced(supplier, "supplier_id", "Supplier")?;
    }

    let contract = ContractRepo::create(&state.pool, user.organization_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: contract })))
}

/// GET /api/v1/contracts
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ContractListParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Contract>>>> {
    let contracts = ContractRepo::list(
        &state.pool,
        user.organization_id,
        params.contractor_id,
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: contracts }))
}

/// GET /api/v1/contracts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Contract>>> {
    let contract = ContractRepo::find_by_id(&state.pool, user.organization_id, id).await?;
    Ok(Json(DataResponse {
        data: found(contract, "Contract", id)?,
    }))
}

/// PUT /api/v1/contracts/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContract>,
) -> AppResult<Json<DataResponse<Contract>>> {
    input.validate()?;

    let existing = found(
        ContractRepo::find_by_id(&state.pool, user.organization_id, id).await?,
        "Contract",
        id,
    )?;
    validate_date_range(
        "Contract",
        input.start_date.unwrap_or(existing.start_date),
        input.end_date.or(existing.end_date),
    )?;
    if let Some(supplier_id) = input.supplier_id {
        let supplier =
            SupplierRepo::find_by_id(&state.pool, user.organization_id, supplier_id).await?;
        referenced(supplier, "supplier_id", "Supplier")?;
    }

    let contract = ContractRepo::update(&state.pool, user.organization_id, id, &input).await?;
    let contract = found(contract, "Contract", id)?;
    if input.status.is_some() {
        tracing::info!(
            contract_id = id,
            user_id = user.user_id,
            status = %contract.status,
            "Contract status updated"
        );
    }
    Ok(Json(DataResponse { data: contract }))
}
