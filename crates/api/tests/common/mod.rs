#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use staffeval_api::auth::jwt::{generate_access_token, JwtConfig};
use staffeval_api::auth::password::hash_password;
use staffeval_api::config::ServerConfig;
use staffeval_api::router::build_app_router;
use staffeval_api::state::AppState;
use staffeval_core::roles::Role;
use staffeval_core::scoring::ScoringScale;
use staffeval_core::types::DbId;
use staffeval_db::models::criterion::Criterion;
use staffeval_db::models::profile::{CreateMember, Member};
use staffeval_db::repositories::{CriterionRepo, MemberRepo};

pub const TEST_PASSWORD: &str = "evaluation-pass-1";

/// Test configuration: local CORS origin, fixed secret, default scale.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        scoring_scale: ScoringScale::Weighted10,
        allow_self_registration: true,
    }
}

/// The production router over `pool` with [`test_config`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with(pool, test_config())
}

pub fn build_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a member directly. The email is derived from `name`.
pub async fn create_member(pool: &PgPool, name: &str, role: Role) -> Member {
    let input = CreateMember {
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        full_name: name.to_string(),
        role,
        department: Some("Operations".to_string()),
    };
    MemberRepo::create(pool, &input)
        .await
        .expect("member creation should succeed")
}

/// A valid access token for `user_id` under [`test_config`].
pub fn token_for(user_id: DbId) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

pub async fn create_criterion(pool: &PgPool, title: &str, weight: i32) -> Criterion {
    let input = staffeval_core::criteria::NewCriterion {
        title: title.to_string(),
        weight,
        description: None,
    };
    CriterionRepo::create(pool, &input)
        .await
        .expect("criterion creation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect the body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
