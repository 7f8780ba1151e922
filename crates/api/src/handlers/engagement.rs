//! Handlers for the `/engagements` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contractor_core::contract::ensure_contract_engageable;
use contractor_core::error::{CoreError, FieldError};
use contractor_core::types::DbId;
use contractor_core::validation::validate_date_range;
use contractor_db::models::engagement::{CreateEngagement, Engagement, UpdateEngagement};
use contractor_db::repositories::{ContractRepo, ContractorRepo, EngagementRepo, ProjectRepo};
use validator::Validate;

use super::{found, referenced};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::query::{EngagementListParams, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/engagements
///
/// The contract must belong to the engaged contractor and still be in force.
pub async fn create(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<CreateEngagement>,
) -> AppResult<(StatusCode, Json<DataResponse<Engagement>>)> {
    input.validate()?;
    validate_date_range("Engagement", input.start_date, input.end_date)?;

    let org = user.organization_id;
    let contractor = ContractorRepo::find_by_id(&state.pool, org, input.contractor_id).await?;
    referenced(contractor, "contractor_id", "Contractor")?;
    let project = ProjectRepo::find_by_id(&state.pool, org, input.project_id).await?;
    referenced(project, "project_id", "Project")?;
    let contract = ContractRepo::find_by_id(&state.pool, org, input.contract_id).await?;
    let contract = referenced(contract, "contract_id", "Contract")?;

    if contract.contractor_id != input.contractor_id {
        return Err(AppError::Core(CoreError::InvalidFields(vec![FieldError::new(
            "contract_id",
            "must belong to the engaged contractor",
        )])));
    }
    ensure_contract_engageable(contract.status)?;

    let engagement = EngagementRepo::create(&state.pool, org, &input).await?;
    tracing::info!(
        engagement_id = engagement.id,
        project_id = engagement.project_id,
        contractor_id = engagement.contractor_id,
        user_id = user.user_id,
        "Engagement created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: engagement })))
}

/// GET /api/v1/engagements
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<EngagementListParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Engagement>>>> {
    let engagements = EngagementRepo::list(
        &state.pool,
        user.organization_id,
        params.project_id,
        params.contractor_id,
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: engagements }))
}

/// GET /api/v1/engagements/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Engagement>>> {
    let engagement = EngagementRepo::find_by_id(&state.pool, user.organization_id, id).await?;
    Ok(Json(DataResponse {
        data: found(engagement, "Engagement", id)?,
    }))
}

/// PUT /api/v1/engagements/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEngagement>,
) -> AppResult<Json<DataResponse<Engagement>>> {
    input.validate()?;
    let existing = found(
        EngagementRepo::find_by_id(&state.pool, user.organization_id, id).await?,
        "Engagement",
        id,
    )?;
    validate_date_range(
        "Engagement",
        input.start_date.unwrap_or(existing.start_date),
        input.end_date.or(existing.end_date),
    )?;

    let engagement = EngagementRepo::update(&state.pool, user.organization_id, id, &input).await?;
    let engagement = found(engagement, "Engagement", id)?;
    if existing.status != engagement.status {
        tracing::info!(
            engagement_id = id,
            user_id = user.user_id,
            from = %existing.status,
            to = %engagement.status,
            "Engagement status changed"
        );
    }
    Ok(Json(DataResponse { data: engagement }))
}
