//! End-to-end scenario tests for the identity crate
//!
//! Drives the assembled router over the in-memory store, asserting the
//! HTTP contract: status codes, bodies, and the uniformity of the
//! login failure response.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::application::config::IdentityConfig;
use crate::application::token::TokenIssuer;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::PasswordPolicy;
use crate::infra::memory::InMemoryCredentialStore;
use crate::presentation::router::identity_router_generic;
use platform::password::HashParams;

fn test_config() -> IdentityConfig {
    IdentityConfig {
        token_secret: "unit-test-secret-0123456789abcdef".to_string(),
        token_issuer: "test-issuer".to_string(),
        token_audience: "test-audience".to_string(),
        token_ttl: Duration::from_secs(3600),
        password_policy: PasswordPolicy::default(),
        // Small work factor keeps the suite fast
        hash_params: HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
    }
}

fn test_app() -> Router {
    identity_router_generic(InMemoryCredentialStore::new(), test_config()).unwrap()
}

fn json_request(uri: &str, method: Method, body: Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(Method::GET)
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn register_body(email: &str, password: &str) -> Value {
    json!({
        "name": "Test User",
        "username": "testuser",
        "email": email,
        "password": password,
    })
}

async fn register(app: &Router, email: &str, password: &str) -> axum::response::Response {
    app.clone()
        .oneshot(json_request(
            "/register",
            Method::POST,
            register_body(email, password),
        ))
        .await
        .unwrap()
}

async fn login(app: &Router, email: &str, password: &str) -> axum::response::Response {
    app.clone()
        .oneshot(json_request(
            "/login",
            Method::POST,
            json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap()
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_returns_confirmation() {
    let app = test_app();

    let response = register(&app, "a@x.com", "abcdef").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Account registered successfully");
}

#[tokio::test]
async fn test_register_duplicate_email_rejected() {
    let app = test_app();

    let response = register(&app, "a@x.com", "abcdef").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = register(&app, "a@x.com", "abcdef").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["detail"], "Email is already in use");
}

#[tokio::test]
async fn test_register_duplicate_email_is_case_insensitive() {
    let app = test_app();

    let response = register(&app, "a@x.com", "abcdef").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = register(&app, "A@X.COM", "abcdef").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_short_password_cites_minimum_length() {
    let app = test_app();

    let response = register(&app, "a@x.com", "12345").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["field"], "password");
    assert!(
        errors[0]["message"]
            .as_str()
            .unwrap()
            .contains("at least 6")
    );
}

#[tokio::test]
async fn test_register_reports_every_failing_field() {
    let app = test_app();

    let response = register(&app, "not-an-email", "123").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[tokio::test]
async fn test_failed_registration_creates_no_account() {
    let app = test_app();

    let response = register(&app, "a@x.com", "12345").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.clone().oneshot(get_request("/")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_returns_three_segment_token() {
    let config = test_config();
    let store = InMemoryCredentialStore::new();
    let app = identity_router_generic(store, config.clone()).unwrap();

    register(&app, "a@x.com", "abcdef").await;

    let response = login(&app, "a@x.com", "abcdef").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let token = body["token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);

    // The token validates and its subject names the registered account
    let issuer = TokenIssuer::new(&config);
    let claims = issuer.validate(token).unwrap();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/{}", claims.sub)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["email"], "a@x.com");
}

#[tokio::test]
async fn test_login_email_lookup_is_case_insensitive() {
    let app = test_app();
    register(&app, "a@x.com", "abcdef").await;

    let response = login(&app, "A@X.com", "abcdef").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = test_app();
    register(&app, "a@x.com", "abcdef").await;

    // Wrong password for an existing account
    let wrong_password = login(&app, "a@x.com", "wrong!").await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

    // Unknown email entirely
    let unknown_email = login(&app, "nope@x.com", "anything").await;
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    // Byte-identical bodies: no email-enumeration oracle
    let wrong_body = body_bytes(wrong_password).await;
    let unknown_body = body_bytes(unknown_email).await;
    assert_eq!(wrong_body, unknown_body);

    let body: Value = serde_json::from_slice(&wrong_body).unwrap();
    assert_eq!(body["detail"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_with_malformed_email_is_generic_failure() {
    let app = test_app();
    register(&app, "a@x.com", "abcdef").await;

    let malformed = login(&app, "not-an-email", "abcdef").await;
    assert_eq!(malformed.status(), StatusCode::UNAUTHORIZED);

    let unknown = login(&app, "nope@x.com", "abcdef").await;
    let malformed_body = body_bytes(malformed).await;
    let unknown_body = body_bytes(unknown).await;
    assert_eq!(malformed_body, unknown_body);
}

// ============================================================================
// Bearer-protected route
// ============================================================================

#[tokio::test]
async fn test_me_requires_valid_token() {
    let app = test_app();
    register(&app, "a@x.com", "abcdef").await;

    // No token
    let response = app.clone().oneshot(get_request("/me")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Garbage token
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/me")
                .method(Method::GET)
                .header(header::AUTHORIZATION, "Bearer not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Real token
    let response = login(&app, "a@x.com", "abcdef").await;
    let body = body_json(response).await;
    let token = body["token"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/me")
                .method(Method::GET)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "You are authenticated as testuser");
}

#[tokio::test]
async fn test_me_rejects_expired_token() {
    let config = test_config();
    let store = InMemoryCredentialStore::new();
    let app = identity_router_generic(store.clone(), config.clone()).unwrap();

    register(&app, "a@x.com", "abcdef").await;

    let account = store
        .find_by_email(&crate::domain::value_object::Email::new("a@x.com").unwrap())
        .await
        .unwrap()
        .unwrap();

    // Issue a token whose TTL has already elapsed
    let issuer = TokenIssuer::new(&config);
    let issued_at = chrono::Utc::now() - chrono::Duration::hours(2);
    let token = issuer.issue_at(&account.account_id, issued_at).unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/me")
                .method(Method::GET)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["detail"], "Token has expired");
}

// ============================================================================
// Account CRUD
// ============================================================================

#[tokio::test]
async fn test_list_and_get() {
    let app = test_app();
    register(&app, "a@x.com", "abcdef").await;
    register(&app, "b@x.com", "abcdef").await;

    let response = app.clone().oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let accounts = body.as_array().unwrap();
    assert_eq!(accounts.len(), 2);

    // Responses never carry the digest in any spelling
    let raw = serde_json::to_string(&body).unwrap();
    assert!(!raw.contains("password"));
    assert!(!raw.contains("argon2"));

    let id = accounts[0]["id"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(get_request(&format!("/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_unknown_account_is_404() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/{}", uuid::Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Unparseable IDs read as not-found too
    let response = app.clone().oneshot(get_request("/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_account() {
    let app = test_app();
    register(&app, "a@x.com", "abcdef").await;

    let response = app.clone().oneshot(get_request("/")).await.unwrap();
    let body = body_json(response).await;
    let id = body[0]["id"].as_str().unwrap().to_string();

    // Path/body mismatch
    let response = app
        .clone()
        .oneshot(json_request(
            &format!("/{id}"),
            Method::PUT,
            json!({
                "id": uuid::Uuid::new_v4().to_string(),
                "name": "New",
                "username": "new",
                "email": "a@x.com",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Valid update
    let response = app
        .clone()
        .oneshot(json_request(
            &format!("/{id}"),
            Method::PUT,
            json!({
                "id": id,
                "name": "Renamed User",
                "username": "renamed",
                "email": "renamed@x.com",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/{id}")))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["name"], "Renamed User");
    assert_eq!(body["email"], "renamed@x.com");
}

#[tokio::test]
async fn test_update_to_taken_email_rejected() {
    let app = test_app();
    register(&app, "a@x.com", "abcdef").await;
    register(&app, "b@x.com", "abcdef").await;

    let response = app.clone().oneshot(get_request("/")).await.unwrap();
    let body = body_json(response).await;
    let first = body
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["email"] == "a@x.com")
        .unwrap();
    let id = first["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            &format!("/{id}"),
            Method::PUT,
            json!({
                "id": id,
                "name": "Test User",
                "username": "testuser",
                "email": "b@x.com",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_account() {
    let app = test_app();
    register(&app, "a@x.com", "abcdef").await;

    let response = app.clone().oneshot(get_request("/")).await.unwrap();
    let body = body_json(response).await;
    let id = body[0]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/{id}"))
                .method(Method::DELETE)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Second delete: already gone
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/{id}"))
                .method(Method::DELETE)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // And login for the deleted account fails generically
    let response = login(&app, "a@x.com", "abcdef").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
