//! Handlers for the `/admin` resource (user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`]. Users are only
//! ever deactivated, never deleted.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use contractor_core::error::{CoreError, FieldError};
use contractor_core::roles::VALID_ROLES;
use contractor_core::types::DbId;
use contractor_core::validation::validate_not_blank;
use contractor_db::models::user::{CreateUser, UserResponse};
use contractor_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(
        length(max = 200, message = "must be at most 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub full_name: String,
    pub password: String,
    /// Role name: `admin`, `manager` or `contractor`.
    pub role: String,
}

/// POST /api/v1/admin/users
///
/// Create a user in the admin's organization. Returns 201 with a
/// [`UserResponse`] (never the password hash).
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate()?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;

    if !VALID_ROLES.contains(&input.role.as_str()) {
        return Err(AppError::Core(CoreError::InvalidFields(vec![FieldError::new(
            "role",
            format!("must be one of: {}", VALID_ROLES.join(", ")),
        )])));
    }
    let role = RoleRepo::find_by_name(&state.pool, &input.role)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Role '{}' is not seeded", input.role)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        organization_id: admin.organization_id,
        email: input.email.trim().to_lowercase(),
        full_name: input.full_name.trim().to_string(),
        password_hash,
        role_id: role.id,
    };
    let user = UserRepo::create(&state.pool, &create).await?;

    tracing::info!(
        user_id = user.id,
        role = %user.role,
        created_by = admin.user_id,
        "User created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list_by_organization(&state.pool, admin.organization_id).await?;
    let data = users.iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Deactivate a user and revoke their sessions. Admins cannot deactivate
/// themselves.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "You cannot deactivate your own account".into(),
        ));
    }

    if !UserRepo::deactivate(&state.pool, admin.organization_id, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(user_id = id, deactivated_by = admin.user_id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}
