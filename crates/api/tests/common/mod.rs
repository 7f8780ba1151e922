#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use contractor_api::auth::jwt::JwtConfig;
use contractor_api::config::ServerConfig;
use contractor_api::router::build_app_router;
use contractor_api::state::AppState;

/// Password used for every user created through these helpers.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::PATCH, uri, Some(token), None).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Decimals are serialized as JSON strings.
pub fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal should be a string")).unwrap()
}

// ---------------------------------------------------------------------------
// Session helpers
// ---------------------------------------------------------------------------

/// A signed-in user.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub refresh_token: String,
    pub user_id: i64,
    pub organization_id: i64,
}

impl Session {
    fn from_auth_response(json: &Value) -> Self {
        Self {
            token: json["access_token"].as_str().unwrap().to_string(),
            refresh_token: json["refresh_token"].as_str().unwrap().to_string(),
            user_id: json["user"]["id"].as_i64().unwrap(),
            organization_id: json["user"]["organization_id"].as_i64().unwrap(),
        }
    }
}

/// Register a new organization and return its admin's session.
pub async fn register_org(app: &Router, organization: &str, email: &str) -> Session {
    let body = json!({
        "organization_name": organization,
        "email": email,
        "full_name": "Org Admin",
        "password": TEST_PASSWORD,
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    Session::from_auth_response(&body_json(response).await)
}

pub async fn login(app: &Router, email: &str, password: &str) -> Response {
    let body = json!({ "email": email, "password": password });
    post_json(app.clone(), "/api/v1/auth/login", body).await
}

/// Create a user with `role` in the admin's organization and sign them in.
pub async fn create_user(app: &Router, admin: &Session, email: &str, role: &str) -> Session {
    let body = json!({
        "email": email,
        "full_name": format!("{role} user"),
        "password": TEST_PASSWORD,
        "role": role,
    });
    let response = post_json_auth(app.clone(), "/api/v1/admin/users", body, &admin.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = login(app, email, TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    Session::from_auth_response(&body_json(response).await)
}

// ---------------------------------------------------------------------------
// Directory fixture
// ---------------------------------------------------------------------------

/// Ids of a supplier, contractor, contract (rate 50), project (budget 1000)
/// and an active engagement linking them.
#[derive(Debug, Clone, Copy)]
pub struct Directory {
    pub supplier_id: i64,
    pub contractor_id: i64,
    pub contract_id: i64,
    pub project_id: i64,
    pub engagement_id: i64,
}

async fn create(app: &Router, token: &str, uri: &str, body: Value) -> i64 {
    let response = post_json_auth(app.clone(), uri, body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED, "POST {uri}");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

pub async fn seed_directory(app: &Router, token: &str) -> Directory {
    let supplier_id = create(
        app,
        token,
        "/api/v1/suppliers",
        json!({ "name": "Acme Staffing", "contact_email": "ops@acme.test" }),
    )
    .await;
    let contractor_id = create(
        app,
        token,
        "/api/v1/contractors",
        json!({
            "supplier_id": supplier_id,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@contractors.test",
        }),
    )
    .await;
    let contract_id = create(
        app,
        token,
        "/api/v1/contracts",
        json!({
            "contractor_id": contractor_id,
            "supplier_id": supplier_id,
            "title": "Analytical engine work",
            "rate": "50.00",
            "start_date": "2024-01-01",
            "status": "ACTIVE",
        }),
    )
    .await;
    let project_id = create(
        app,
        token,
        "/api/v1/projects",
        json!({ "name": "Engine", "code": "ENG", "budget": "1000.00" }),
    )
    .await;
    let engagement_id = create(
        app,
        token,
        "/api/v1/engagements",
        json!({
            "contractor_id": contractor_id,
            "project_id": project_id,
            "contract_id": contract_id,
            "role_title": "Programmer",
            "start_date": "2024-01-01",
        }),
    )
    .await;

    Directory {
        supplier_id,
        contractor_id,
        contract_id,
        project_id,
        engagement_id,
    }
}

/// Create a timesheet for January 1-7 2024 with the given `(date, hours)` entries.
pub async fn create_timesheet(
    app: &Router,
    token: &str,
    engagement_id: i64,
    entries: &[(Option<&str>, &str)],
) -> Response {
    let entries: Vec<Value> = entries
        .iter()
        .map(|(date, hours)| json!({ "date": date, "hours": hours }))
        .collect();
    let body = json!({
        "engagement_id": engagement_id,
        "period_start": "2024-01-01",
        "period_end": "2024-01-07",
        "entries": entries,
    });
    post_json_auth(app.clone(), "/api/v1/timesheets", body, token).await
}
