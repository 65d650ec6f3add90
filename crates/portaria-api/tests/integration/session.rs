//! Login, session lookup, and the auth boundary.

use axum::http::{Method, StatusCode};
use serde_json::json;

use portaria_auth_supabase::{AccessClaims, issue_access_token};
use portaria_backend::IdentityProvider;
use portaria_core::Role;

use crate::common::{DOMAIN, PASSWORD, SECRET, TestApp};

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();
    let (status, body) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_admin_login_lands_on_admin() {
    let app = TestApp::new();
    app.add_user("chefe", Role::Admin).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "chefe", "password": PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
    assert_eq!(body["landing"], "/admin");
    assert_eq!(body["token_type"], "bearer");
    assert!(body["access_token"].as_str().unwrap().len() > 20);
}

#[tokio::test]
async fn test_operational_login_lands_on_services() {
    let app = TestApp::new();
    app.add_user("portaria1", Role::Reception).await;

    let (_, body) = app
        .call(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": " portaria1 ", "password": PASSWORD })),
        )
        .await;
    assert_eq!(body["role"], "recepcao");
    assert_eq!(body["landing"], "/services");
}

#[tokio::test]
async fn test_unknown_username_is_reported_as_usuario() {
    let app = TestApp::new();
    let (status, body) = app
        .call(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "ninguem", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["reason"], "usuario");
}

#[tokio::test]
async fn test_wrong_password_is_reported_as_senha() {
    let app = TestApp::new();
    app.add_user("chefe", Role::Admin).await;
    let (status, body) = app
        .call(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "chefe", "password": "errada" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["reason"], "senha");
}

#[tokio::test]
async fn test_malformed_login_body() {
    let app = TestApp::new();
    let (status, body) = app
        .call(Method::POST, "/api/login", None, Some(json!({ "user": "x" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["category"], "request");
}

#[tokio::test]
async fn test_me_reports_profile() {
    let app = TestApp::new();
    let token = app.signed_in("mario", Role::Maintenance).await;

    let (status, body) = app.get("/api/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "mario");
    assert_eq!(body["role"], "manutencao");
    assert_eq!(body["role_label"], "Manutenção");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new();
    let (status, body) = app.call(Method::GET, "/api/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["category"], "authentication");

    let (status, _) = app.get("/api/catalog", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_account_without_profile_is_forbidden() {
    let app = TestApp::new();
    let email = format!("orfao@{DOMAIN}");
    let id = app.backend.create_user(&email, PASSWORD).await.unwrap();
    let claims = AccessClaims::for_user(&id.to_string(), &email, "authenticated", 600);
    let token = issue_access_token(&claims, SECRET).unwrap();

    let (status, body) = app.get("/api/me", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["category"], "forbidden");
}

#[tokio::test]
async fn test_token_from_other_domain_is_rejected() {
    let app = TestApp::new();
    let id = app.add_user("chefe", Role::Admin).await;
    let claims = AccessClaims::for_user(&id.to_string(), "chefe@elsewhere.com", "authenticated", 600);
    let token = issue_access_token(&claims, SECRET).unwrap();

    let (status, _) = app.get("/api/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_disabled_acts_as_admin() {
    let app = TestApp::without_auth();
    let (status, body) = app.call(Method::GET, "/api/me", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");

    let (status, _) = app.call(Method::GET, "/api/users", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_catalog() {
    let app = TestApp::new();
    let token = app.signed_in("portaria1", Role::Reception).await;
    let (status, body) = app.get("/api/catalog", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"][0], "Manutenção");
    assert_eq!(body["services"][0]["services"][1], "Correios");
}
