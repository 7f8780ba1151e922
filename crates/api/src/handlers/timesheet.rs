//! Handlers for the `/timesheets` resource and its lifecycle transitions.
//!
//! Transitions are planned against the current row with
//! [`plan_transition`] and persisted with a status-guarded update. A guard
//! miss means another request moved the timesheet first and yields 409.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contractor_core::contract::ensure_engagement_active;
use contractor_core::error::CoreError;
use contractor_core::roles::Permission;
use contractor_core::timesheet::{plan_transition, validate_entries, Period, TimesheetAction};
use contractor_core::types::DbId;
use contractor_db::models::timesheet::{
    CreateTimesheet, RejectTimesheet, ReplaceEntries, Timesheet, TimesheetDetail, TimesheetFilter,
};
use contractor_db::repositories::{EngagementRepo, TimesheetRepo};
use validator::Validate;

use super::{found, referenced};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/timesheets
///
/// Create a `DRAFT` timesheet with its entries. The project is copied from
/// the engagement.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateTimesheet>,
) -> AppResult<(StatusCode, Json<DataResponse<TimesheetDetail>>)> {
    user.require(Permission::EditTimesheets)?;
    input.validate()?;
    let period = Period::new(input.period_start, input.period_end)?;
    validate_entries(&period, &input.entries)?;

    let engagement =
        EngagementRepo::find_by_id(&state.pool, user.organization_id, input.engagement_id).await?;
    let engagement = referenced(engagement, "engagement_id", "Engagement")?;
    ensure_engagement_active(engagement.status)?;

    let (timesheet, entries) = TimesheetRepo::create(
        &state.pool,
        user.organization_id,
        engagement.project_id,
        user.user_id,
        &input,
    )
    .await?;

    tracing::info!(
        timesheet_id = timesheet.id,
        engagement_id = timesheet.engagement_id,
        user_id = user.user_id,
        entries = entries.len(),
        "Timesheet created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: TimesheetDetail::new(timesheet, entries),
        }),
    ))
}

/// GET /api/v1/timesheets?engagement_id=&project_id=&status=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<TimesheetFilter>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Timesheet>>>> {
    let timesheets = TimesheetRepo::list(
        &state.pool,
        user.organization_id,
        &filter,
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: timesheets }))
}

/// GET /api/v1/timesheets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TimesheetDetail>>> {
    let detail = load_detail(&state, user.organization_id, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/timesheets/{id}/entries
///
/// Replace every entry. Only allowed while the timesheet is `DRAFT`.
pub async fn replace_entries(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ReplaceEntries>,
) -> AppResult<Json<DataResponse<TimesheetDetail>>> {
    user.require(Permission::EditTimesheets)?;
    input.validate()?;

    let timesheet = found(
        TimesheetRepo::find_by_id(&state.pool, user.organization_id, id).await?,
        "Timesheet",
        id,
    )?;
    if !timesheet.status.entries_editable() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Cannot edit entries of a timesheet in status {}",
            timesheet.status
        ))));
    }
    let period = Period::new(timesheet.period_start, timesheet.period_end)?;
    validate_entries(&period, &input.entries)?;

    let entries =
        TimesheetRepo::replace_entries(&state.pool, user.organization_id, id, &input.entries)
            .await?
            .ok_or_else(|| concurrent_change(id))?;
    let entries = TimesheetRepo::entries_for(&state.pool, id).await?;

    tracing::info!(
        timesheet_id = id,
        user_id = user.user_id,
        entries = entries.len(),
        "Timesheet entries replaced"
    );

    Ok(Json(DataResponse {
        data: TimesheetDetail::new(timesheet, entries),
    }))
}

/// PATCH /api/v1/timesheets/{id}/submit
pub async fn submit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TimesheetDetail>>> {
    user.require(Permission::EditTimesheets)?;
    apply(&state, &user, id, TimesheetAction::Submit).await
}

/// PATCH /api/v1/timesheets/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TimesheetDetail>>> {
    user.require(Permission::ReviewTimesheets)?;
    apply(&state, &user, id, TimesheetAction::Approve).await
}

/// PATCH /api/v1/timesheets/{id}/reject
///
/// Body: `{ "reason": "..." }`. The reason is required.
pub async fn reject(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<RejectTimesheet>,
) -> AppResult<Json<DataResponse<TimesheetDetail>>> {
    user.require(Permission::ReviewTimesheets)?;
    apply(
        &state,
        &user,
        id,
        TimesheetAction::Reject {
            reason: input.reason,
        },
    )
    .await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_detail(
    state: &AppState,
    organization_id: DbId,
    id: DbId,
) -> AppResult<TimesheetDetail> {
    let timesheet = found(
        TimesheetRepo::find_by_id(&state.pool, organization_id, id).await?,
        "Timesheet",
        id,
    )?;
    let entries = TimesheetRepo::entries_for(&state.pool, id).await?;
    Ok(TimesheetDetail::new(timesheet, entries))
}

/// Plan `action` against the stored timesheet and persist it.
async fn apply(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    action: TimesheetAction,
) -> AppResult<Json<DataResponse<TimesheetDetail>>> {
    let current = load_detail(state, user.organization_id, id).await?;
    let timesheet = &current.timesheet;

    let transition = plan_transition(
        timesheet.status,
        timesheet.period_start,
        timesheet.period_end,
        &current.entries,
        &action,
    )?;

    let reviewer = match action {
        TimesheetAction::Submit => None,
        TimesheetAction::Approve | TimesheetAction::Reject { .. } => Some(user.user_id),
    };

    let updated = TimesheetRepo::apply_transition(
        &state.pool,
        user.organization_id,
        id,
        &transition,
        reviewer,
    )
    .await?
    .ok_or_else(|| concurrent_change(id))?;
    let entries = TimesheetRepo::entries_for(&state.pool, id).await?;

    tracing::info!(
        timesheet_id = id,
        user_id = user.user_id,
        action = action.name(),
        from = %transition.from,
        to = %updated.status,
        "Timesheet status changed"
    );

    Ok(Json(DataResponse {
        data: TimesheetDetail::new(updated, entries),
    }))
}

fn concurrent_change(id: DbId) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Timesheet {id} was modified by another request; reload and try again"
    )))
}
