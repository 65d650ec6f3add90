//! Static choices and liveness.

use axum::Json;
use serde_json::{Value, json};

use portaria_core::catalog::Catalog;

/// `GET /api/catalog`: service kinds by desk, categories, and roles.
pub async fn catalog() -> Json<Catalog> {
    Json(Catalog::builtin())
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
