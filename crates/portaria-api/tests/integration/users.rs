//! User administration.

use axum::http::StatusCode;
use serde_json::json;

use portaria_backend::ProfileStore;
use portaria_core::{Profile, Role, UserId};

use crate::common::{PASSWORD, TestApp};

#[tokio::test]
async fn test_admin_creates_user_who_can_log_in() {
    let app = TestApp::new();
    let admin = app.signed_in("chefe", Role::Admin).await;

    let (status, body) = app
        .post(
            "/api/users",
            &admin,
            json!({ "username": "joana", "password": "abc123", "role": "recepcao" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "joana");
    assert_eq!(body["role"], "recepcao");

    let token = app.login("joana", "abc123").await;
    let (_, me) = app.get("/api/me", &token).await;
    assert_eq!(me["role"], "recepcao");

    let (_, users) = app.get("/api/users", &admin).await;
    let names: Vec<&str> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["chefe", "joana"]);
}

#[tokio::test]
async fn test_non_admin_cannot_manage_users() {
    let app = TestApp::new();
    let token = app.signed_in("portaria1", Role::Reception).await;

    let (status, _) = app.get("/api/users", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            "/api/users",
            &token,
            json!({ "username": "x", "password": "abc123", "role": "admin" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_user_validation() {
    let app = TestApp::new();
    let admin = app.signed_in("chefe", Role::Admin).await;

    let (status, body) = app
        .post(
            "/api/users",
            &admin,
            json!({ "username": "joana", "password": "123", "role": "recepcao" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["category"], "validation");

    let (status, _) = app
        .post(
            "/api/users",
            &admin,
            json!({ "username": "jo ana", "password": "abc123", "role": "recepcao" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .post(
            "/api/users",
            &admin,
            json!({ "username": "joana", "password": "abc123", "role": "gerente" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_username_surfaces_provider_message() {
    let app = TestApp::new();
    let admin = app.signed_in("chefe", Role::Admin).await;
    app.add_user("joana", Role::Reception).await;

    let (status, body) = app
        .post(
            "/api/users",
            &admin,
            json!({ "username": "joana", "password": "abc123", "role": "recepcao" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["category"], "backend");
    assert_eq!(
        body["error"]["message"],
        "A user with this email address has already been registered"
    );
}

#[tokio::test]
async fn test_reset_password() {
    let app = TestApp::new();
    let admin = app.signed_in("chefe", Role::Admin).await;
    let id = app.add_user("joana", Role::Reception).await;

    let (status, _) = app
        .put(
            &format!("/api/users/{id}/password"),
            &admin,
            json!({ "password": "short" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .put(
            &format!("/api/users/{id}/password"),
            &admin,
            json!({ "password": "nova123" }),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    app.login("joana", "nova123").await;
    let (status, body) = app
        .call(
            axum::http::Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "joana", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["reason"], "senha");
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::new();
    let admin = app.signed_in("chefe", Role::Admin).await;
    let id = app.add_user("joana", Role::Reception).await;

    let (status, _) = app.delete(&format!("/api/users/{id}"), &admin).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .call(
            axum::http::Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "joana", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["reason"], "usuario");

    let (status, _) = app.delete(&format!("/api/users/{id}"), &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete("/api/users/not-a-uuid", &admin).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_removes_profile_without_identity() {
    let app = TestApp::new();
    let admin = app.signed_in("chefe", Role::Admin).await;

    let id = UserId::new();
    app.backend
        .insert_profile(&Profile {
            id,
            username: "orfao".to_string(),
            role: Role::Maintenance,
        })
        .await
        .unwrap();

    let (status, _) = app.delete(&format!("/api/users/{id}"), &admin).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(app.backend.find_profile(id).await.unwrap().is_none());

    let (_, users) = app.get("/api/users", &admin).await;
    assert_eq!(users.as_array().unwrap().len(), 1);

    let (status, _) = app.delete(&format!("/api/users/{id}"), &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
