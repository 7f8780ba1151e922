//! Handlers for the `/projects` resource, including budget utilization.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contractor_core::budget::BudgetUtilization;
use contractor_core::error::CoreError;
use contractor_core::types::DbId;
use contractor_core::validation::validate_date_range;
use contractor_db::models::project::{CreateProject, Project, UpdateProject};
use contractor_db::repositories::ProjectRepo;
use serde::Serialize;
use validator::Validate;

use super::found;
use crate::error::AppResult;
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Budget utilization report for `GET /projects/{id}/budget-utilization`.
#[derive(Debug, Serialize)]
pub struct BudgetUtilizationResponse {
    pub project_id: DbId,
    pub currency: String,
    #[serde(flatten)]
    pub utilization: BudgetUtilization,
}

/// Start and end dates are both optional for projects.
fn check_project_dates(project: &Project, input: &UpdateProject) -> Result<(), CoreError> {
    match (input.start_date.or(project.start_date), input.end_date.or(project.end_date)) {
        (Some(start), end) => validate_date_range("Project", start, end),
        (None, _) => Ok(()),
    }
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input.validate()?;
    if let Some(start) = input.start_date {
        validate_date_range("Project", start, input.end_date)?;
    }
    let project = ProjectRepo::create(&state.pool, user.organization_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects =
        ProjectRepo::list(&state.pool, user.organization_id, page.limit(), page.offset()).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::find_by_id(&state.pool, user.organization_id, id).await?;
    Ok(Json(DataResponse {
        data: found(project, "Project", id)?,
    }))
}

/// PUT /api/v1/projects/{id}
///
/// The project code is immutable once created.
pub async fn update(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    input.validate()?;
    let existing = found(
        ProjectRepo::find_by_id(&state.pool, user.organization_id, id).await?,
        "Project",
        id,
    )?;
    check_project_dates(&existing, &input)?;

    let project = ProjectRepo::update(&state.pool, user.organization_id, id, &input).await?;
    Ok(Json(DataResponse {
        data: found(project, "Project", id)?,
    }))
}

/// GET /api/v1/projects/{id}/budget-utilization
///
/// Recomputed from invoices and approved timesheets on every call.
pub async fn budget_utilization(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BudgetUtilizationResponse>>> {
    let project = found(
        ProjectRepo::find_by_id(&state.pool, user.organization_id, id).await?,
        "Project",
        id,
    )?;
    let spend = ProjectRepo::spend_breakdown(&state.pool, user.organization_id, id).await?;
    let utilization = BudgetUtilization::compute(project.budget, spend);

    tracing::debug!(
        project_id = id,
        total_spent = %utilization.total_spent,
        band = %utilization.band,
        "Budget utilization computed"
    );

    Ok(Json(DataResponse {
        data: BudgetUtilizationResponse {
            project_id: project.id,
            currency: project.currency,
            utilization,
        },
    }))
}
