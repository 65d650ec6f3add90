//! Room-access authorizations.

use axum::http::StatusCode;
use serde_json::json;

use portaria_core::Role;

use crate::common::TestApp;

fn person(name: &str, cpf: &str, rooms: &[&str]) -> serde_json::Value {
    json!({ "name": name, "cpf": cpf, "rooms": rooms })
}

#[tokio::test]
async fn test_reception_adds_and_lists_for_today() {
    let app = TestApp::new();
    let token = app.signed_in("portaria1", Role::Reception).await;

    let (status, body) = app
        .post(
            "/api/authorizations",
            &token,
            person(" Ana Souza ", "123.456.789-00", &["Sala 101", " Sala 101", ""]),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Ana Souza");
    assert_eq!(body["rooms"], json!(["Sala 101"]));
    assert_eq!(body["status"], "active");
    assert_eq!(body["date"], "2026-10-18");

    let (status, list) = app.get("/api/authorizations", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["date"], "2026-10-18");
    assert_eq!(list["total"], 1);
}

#[tokio::test]
async fn test_list_is_per_day_and_searchable() {
    let app = TestApp::new();
    let token = app.signed_in("chefe", Role::Admin).await;

    app.post(
        "/api/authorizations",
        &token,
        json!({ "date": "2026-10-20", "name": "Bruno Lima", "cpf": "111.222.333-44", "rooms": ["Auditório"] }),
    )
    .await;
    app.post(
        "/api/authorizations",
        &token,
        json!({ "date": "2026-10-20", "name": "Carla Dias", "cpf": "555.666.777-88", "rooms": ["Sala 2"] }),
    )
    .await;

    let (_, today) = app.get("/api/authorizations", &token).await;
    assert_eq!(today["total"], 0);

    let (_, all) = app.get("/api/authorizations?date=2026-10-20", &token).await;
    assert_eq!(all["total"], 2);
    // newest first
    assert_eq!(all["items"][0]["name"], "Carla Dias");

    let (_, by_name) = app
        .get("/api/authorizations?date=2026-10-20&q=bruno", &token)
        .await;
    assert_eq!(by_name["total"], 1);

    let (_, by_room) = app
        .get("/api/authorizations?date=2026-10-20&q=AUDIT", &token)
        .await;
    assert_eq!(by_room["items"][0]["name"], "Bruno Lima");

    let (_, by_cpf) = app
        .get("/api/authorizations?date=2026-10-20&q=666.777", &token)
        .await;
    assert_eq!(by_cpf["items"][0]["name"], "Carla Dias");
}

#[tokio::test]
async fn test_bad_date_is_rejected() {
    let app = TestApp::new();
    let token = app.signed_in("chefe", Role::Admin).await;
    let (status, body) = app
        .get("/api/authorizations?date=20/10/2026", &token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["category"], "validation");
}

#[tokio::test]
async fn test_maintenance_may_read_and_write() {
    let app = TestApp::new();
    let token = app.signed_in("mario", Role::Maintenance).await;

    let (status, created) = app
        .post("/api/authorizations", &token, person("Ana", "1", &["101"]))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, bulk) = app
        .post(
            "/api/authorizations/bulk",
            &token,
            json!({ "text": "Bruno;2;102" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bulk["inserted"], 1);

    let (status, edited) = app
        .put(
            &format!("/api/authorizations/{id}"),
            &token,
            person("Ana Lima", "1", &["101", "103"]),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["name"], "Ana Lima");

    let (status, _) = app
        .delete(&format!("/api/authorizations/{id}"), &token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, list) = app.get("/api/authorizations", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let app = TestApp::new();
    let token = app.signed_in("portaria1", Role::Reception).await;

    let (status, _) = app
        .post("/api/authorizations", &token, person("Ana", "  ", &["101"]))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .post("/api/authorizations", &token, person("Ana", "1", &[" "]))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_bulk_import() {
    let app = TestApp::new();
    let token = app.signed_in("portaria1", Role::Reception).await;

    let text = "Ana;111;101,102\n\nsem separador\nBruno;222;\nCarla;333; 201 , ,202\n";
    let (status, body) = app
        .post(
            "/api/authorizations/bulk",
            &token,
            json!({ "date": "2026-10-18", "text": text }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inserted"], 2);
    assert_eq!(body["rejected"][0]["line"], 3);
    assert_eq!(body["rejected"][1]["line"], 4);
    assert_eq!(body["rejected"][1]["reason"], "missing rooms");

    let (_, list) = app.get("/api/authorizations?q=carla", &token).await;
    assert_eq!(list["items"][0]["rooms"], json!(["201", "202"]));
}

#[tokio::test]
async fn test_bulk_without_valid_lines_writes_nothing() {
    let app = TestApp::new();
    let token = app.signed_in("portaria1", Role::Reception).await;

    let (status, body) = app
        .post(
            "/api/authorizations/bulk",
            &token,
            json!({ "text": "apenas um nome\n;;\n" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inserted"], 0);
    assert_eq!(body["rejected"].as_array().unwrap().len(), 2);

    let (_, list) = app.get("/api/authorizations", &token).await;
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn test_update_and_delete() {
    let app = TestApp::new();
    let token = app.signed_in("portaria1", Role::Reception).await;
    let (_, created) = app
        .post("/api/authorizations", &token, person("Ana", "1", &["101"]))
        .await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = app
        .put(
            &format!("/api/authorizations/{id}"),
            &token,
            person("Ana Maria", "1", &["101", "305"]),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Ana Maria");
    assert_eq!(updated["rooms"], json!(["101", "305"]));

    let (status, _) = app
        .put(
            &format!("/api/authorizations/{id}"),
            &token,
            person("", "1", &["101"]),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .delete(&format!("/api/authorizations/{id}"), &token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .delete(&format!("/api/authorizations/{id}"), &token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["category"], "not_found");

    let (status, _) = app.delete("/api/authorizations/abc", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
