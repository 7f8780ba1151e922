//! HTTP-level integration tests for registration, login, token refresh,
//! logout, lockout and admin user management.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user, get, get_auth, login, post_json, post_json_auth, register_org,
    TEST_PASSWORD,
};
use contractor_core::roles::{ROLE_CONTRACTOR, ROLE_MANAGER};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Register / login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_creates_org_and_admin(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({
        "organization_name": "Initech",
        "email": "boss@initech.test",
        "full_name": "Bill Lumbergh",
        "password": TEST_PASSWORD,
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["email"], "boss@initech.test");
    assert_eq!(json["user"]["role"], "admin");
    assert!(json["user"]["organization_id"].is_number());
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_short_password_and_bad_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({
        "organization_name": "Initech",
        "email": "boss@initech.test",
        "full_name": "Bill",
        "password": "short",
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({
        "organization_name": "Initech",
        "email": "not-an-email",
        "full_name": "Bill",
        "password": TEST_PASSWORD,
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"][0]["field"], "email");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_is_a_conflict(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_org(&app, "Initech", "boss@initech.test").await;

    let body = json!({
        "organization_name": "Initrode",
        "email": "BOSS@initech.test",
        "full_name": "Someone",
        "password": TEST_PASSWORD,
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_success_and_wrong_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = register_org(&app, "Initech", "boss@initech.test").await;

    let response = login(&app, "boss@initech.test", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], admin.user_id);

    // Emails are matched case-insensitively.
    let response = login(&app, "Boss@Initech.test", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = login(&app, "boss@initech.test", "wrong-password-here").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = login(&app, "ghost@initech.test", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn account_locks_after_repeated_failures(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_org(&app, "Initech", "boss@initech.test").await;

    for _ in 0..5 {
        let response = login(&app, "boss@initech.test", "wrong-password-here").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Even the right password is refused while locked.
    let response = login(&app, "boss@initech.test", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_or_invalid_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/suppliers").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");

    let response = get_auth(app, "/api/v1/suppliers", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_rotates_the_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = register_org(&app, "Initech", "boss@initech.test").await;

    let body = json!({ "refresh_token": admin.refresh_token });
    let response = post_json(app.clone(), "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_ne!(json["refresh_token"], admin.refresh_token.as_str());

    // The old refresh token was revoked by the rotation.
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_refresh_tokens(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = register_org(&app, "Initech", "boss@initech.test").await;

    let response = post_json_auth(app.clone(), "/api/v1/auth/logout", json!({}), &admin.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = json!({ "refresh_token": admin.refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Admin user management
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_and_lists_users(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = register_org(&app, "Initech", "boss@initech.test").await;
    let manager = create_user(&app, &admin, "pm@initech.test", ROLE_MANAGER).await;
    assert_eq!(manager.organization_id, admin.organization_id);

    let response = get_auth(app, "/api/v1/admin/users", &admin.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let users = body_json(response).await["data"].as_array().unwrap().clone();
    assert_eq!(users.len(), 2);
    assert!(users.iter().any(|u| u["role"] == "manager"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_role_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = register_org(&app, "Initech", "boss@initech.test").await;

    let body = json!({
        "email": "x@initech.test",
        "full_name": "X",
        "password": TEST_PASSWORD,
        "role": "superuser",
    });
    let response = post_json_auth(app, "/api/v1/admin/users", body, &admin.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["fields"][0]["field"], "role");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_admins_cannot_manage_users(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = register_org(&app, "Initech", "boss@initech.test").await;
    let manager = create_user(&app, &admin, "pm@initech.test", ROLE_MANAGER).await;
    let contractor = create_user(&app, &admin, "dev@initech.test", ROLE_CONTRACTOR).await;

    for session in [&manager, &contractor] {
        let response = get_auth(app.clone(), "/api/v1/admin/users", &session.token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_user_cannot_log_in(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = register_org(&app, "Initech", "boss@initech.test").await;
    let manager = create_user(&app, &admin, "pm@initech.test", ROLE_MANAGER).await;

    let uri = format!("/api/v1/admin/users/{}", manager.user_id);
    let response = common::delete_auth(app.clone(), &uri, &admin.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = login(&app, "pm@initech.test", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Refresh tokens were revoked along with the account.
    let body = json!({ "refresh_token": manager.refresh_token });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_cannot_deactivate_self_or_other_orgs(pool: PgPool) {
    let app = common::build_test_app(pool);
    let admin = register_org(&app, "Initech", "boss@initech.test").await;
    let other = register_org(&app, "Initrode", "boss@initrode.test").await;

    let uri = format!("/api/v1/admin/users/{}", admin.user_id);
    let response = common::delete_auth(app.clone(), &uri, &admin.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/api/v1/admin/users/{}", other.user_id);
    let response = common::delete_auth(app, &uri, &admin.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
