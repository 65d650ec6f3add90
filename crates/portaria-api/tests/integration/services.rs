//! Service tickets.

use axum::http::StatusCode;
use serde_json::{Value, json};

use portaria_core::Role;

use crate::common::TestApp;

fn ticket(title: &str, service: &str, category: &str, date: &str) -> Value {
    json!({
        "title": title,
        "responsible": "Carlos",
        "service": service,
        "category": category,
        "date": date,
    })
}

async fn seed(app: &TestApp, admin: &str) {
    for body in [
        ticket("Lâmpada do hall", "Trocar Lâmpada", "Manutenção", "2026-10-18"),
        ticket("Pacote sala 12", "Correios", "Recepção", "2026-10-18"),
        ticket("Backup", "Acompanhamento de Internet", "Sistema", "2026-10-18"),
    ] {
        let (status, _) = app.post("/api/services", admin, body).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_status_derivation_on_read() {
    let app = TestApp::new();
    let admin = app.signed_in("chefe", Role::Admin).await;

    let (_, past) = app
        .post(
            "/api/services",
            &admin,
            ticket("Vazamento", "Inspeção de Vazamento", "Manutenção", "2026-10-17"),
        )
        .await;
    assert_eq!(past["status"], "pendente");

    let (_, future) = app
        .post(
            "/api/services",
            &admin,
            ticket("Disjuntor", "Desligar Disjuntor", "Manutenção", "2026-10-19"),
        )
        .await;
    assert_eq!(future["status"], "aberto");

    let (_, list) = app.get("/api/services?date=2026-10-17", &admin).await;
    assert_eq!(list["items"][0]["status"], "pendente");

    let id = past["id"].as_i64().unwrap();
    let (status, done) = app
        .post(&format!("/api/services/{id}/complete"), &admin, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "concluido");

    let (_, list) = app.get("/api/services?date=2026-10-17", &admin).await;
    assert_eq!(list["items"][0]["status"], "concluido");
}

#[tokio::test]
async fn test_date_defaults_to_today() {
    let app = TestApp::new();
    let admin = app.signed_in("chefe", Role::Admin).await;
    let mut body = ticket("Laser", "Laser", "Recepção", "");
    body.as_object_mut().unwrap().remove("date");

    let (status, created) = app.post("/api/services", &admin, body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["date"], "2026-10-18");
    assert_eq!(created["status"], "aberto");
}

#[tokio::test]
async fn test_every_role_sees_every_category() {
    let app = TestApp::new();
    let admin = app.signed_in("chefe", Role::Admin).await;
    seed(&app, &admin).await;

    let (_, all) = app.get("/api/services", &admin).await;
    assert_eq!(all["total"], 3);

    for (name, role) in [("mario", Role::Maintenance), ("portaria1", Role::Reception)] {
        let token = app.signed_in(name, role).await;
        let (status, seen) = app.get("/api/services", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(seen["total"], 3);
        assert_eq!(seen["items"], all["items"]);
    }
}

#[tokio::test]
async fn test_search() {
    let app = TestApp::new();
    let admin = app.signed_in("chefe", Role::Admin).await;
    seed(&app, &admin).await;

    let (_, by_title) = app.get("/api/services?q=L%C3%82MPADA", &admin).await;
    assert_eq!(by_title["total"], 1);

    let (_, by_category) = app.get("/api/services?q=sist", &admin).await;
    assert_eq!(by_category["items"][0]["title"], "Backup");

    let (_, none) = app.get("/api/services?q=inexistente", &admin).await;
    assert_eq!(none["total"], 0);
}

#[tokio::test]
async fn test_only_admin_manages_tickets() {
    let app = TestApp::new();
    let reception = app.signed_in("portaria1", Role::Reception).await;

    let (status, _) = app
        .post(
            "/api/services",
            &reception,
            ticket("Pacote", "Correios", "Recepção", "2026-10-18"),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete("/api/services/1", &reception).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_validation() {
    let app = TestApp::new();
    let admin = app.signed_in("chefe", Role::Admin).await;
    let (status, body) = app
        .post(
            "/api/services",
            &admin,
            ticket("   ", "Correios", "Recepção", "2026-10-18"),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["category"], "validation");
}

#[tokio::test]
async fn test_any_role_completes_any_ticket() {
    let app = TestApp::new();
    let admin = app.signed_in("chefe", Role::Admin).await;
    seed(&app, &admin).await;
    let (_, all) = app.get("/api/services", &admin).await;
    let id_of = |service: &str| {
        all["items"]
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["service"] == service)
            .unwrap()["id"]
            .as_i64()
            .unwrap()
    };

    let maintenance = app.signed_in("mario", Role::Maintenance).await;
    for service in ["Correios", "Acompanhamento de Internet", "Trocar Lâmpada"] {
        let (status, done) = app
            .post(
                &format!("/api/services/{}/complete", id_of(service)),
                &maintenance,
                json!({}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(done["status"], "concluido");
    }

    let (status, again) = app
        .post(
            &format!("/api/services/{}/complete", id_of("Correios")),
            &maintenance,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["status"], "concluido");

    let (status, _) = app
        .post("/api/services/999/complete", &maintenance, json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_without_date_keeps_scheduled_day() {
    let app = TestApp::new();
    let admin = app.signed_in("chefe", Role::Admin).await;
    let (_, created) = app
        .post(
            "/api/services",
            &admin,
            ticket("Vazamento", "Inspeção de Vazamento", "Manutenção", "2026-10-21"),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let mut body = ticket("Vazamento no subsolo", "Inspeção de Vazamento", "Manutenção", "");
    body.as_object_mut().unwrap().remove("date");
    let (status, edited) = app.put(&format!("/api/services/{id}"), &admin, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["title"], "Vazamento no subsolo");
    assert_eq!(edited["date"], "2026-10-21");

    let mut body = ticket("Fantasma", "Laser", "Recepção", "");
    body.as_object_mut().unwrap().remove("date");
    let (status, _) = app.put("/api/services/999", &admin, body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_keeps_status_and_delete() {
    let app = TestApp::new();
    let admin = app.signed_in("chefe", Role::Admin).await;
    let (_, created) = app
        .post(
            "/api/services",
            &admin,
            ticket("Registro", "Abertura de Registro", "Manutenção", "2026-10-18"),
        )
        .await;
    let id = created["id"].as_i64().unwrap();
    app.post(&format!("/api/services/{id}/complete"), &admin, json!({}))
        .await;

    let (status, edited) = app
        .put(
            &format!("/api/services/{id}"),
            &admin,
            ticket("Registro geral", "Fechamento de Registro", "Manutenção", "2026-10-21"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["title"], "Registro geral");
    assert_eq!(edited["status"], "concluido");

    let (status, _) = app.delete(&format!("/api/services/{id}"), &admin).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .post(&format!("/api/services/{id}/complete"), &admin, json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
