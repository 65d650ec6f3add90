//! API server implementation

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use portaria_auth::{AuthConfig, AuthLayer, TokenValidator};

use crate::routes::{authorizations, catalog, services, session, users};
use crate::{AppState, Result};

/// Builds the console router.
///
/// `/health` and `/api/login` are public; everything else requires a bearer
/// token accepted by `validator` (unless `auth.enabled` is false).
pub fn router<V: TokenValidator>(state: AppState, validator: Arc<V>, auth: AuthConfig) -> Router {
    let protected = Router::new()
        .route("/api/me", get(session::me))
        .route("/api/catalog", get(catalog::catalog))
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/{id}", delete(users::remove))
        .route("/api/users/{id}/password", put(users::reset_password))
        .route(
            "/api/authorizations",
            get(authorizations::list).post(authorizations::create),
        )
        .route("/api/authorizations/bulk", post(authorizations::bulk))
        .route(
            "/api/authorizations/{id}",
            put(authorizations::update).delete(authorizations::remove),
        )
        .route("/api/services", get(services::list).post(services::create))
        .route(
            "/api/services/{id}",
            put(services::update).delete(services::remove),
        )
        .route("/api/services/{id}/complete", post(services::complete))
        .layer(AuthLayer::new(validator, auth));

    Router::new()
        .route("/health", get(catalog::health))
        .route("/api/login", post(session::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Portaria API server
pub struct Server {
    router: Router,
}

impl Server {
    /// Create a new server instance
    pub fn new<V: TokenValidator>(state: AppState, validator: Arc<V>, auth: AuthConfig) -> Self {
        Self {
            router: router(state, validator, auth),
        }
    }

    /// The router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Binds `addr` and serves until `shutdown` resolves.
    pub async fn run<F>(self, addr: &str, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serves on an already-bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(addr = %listener.local_addr()?, "Portaria API listening");
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("Portaria API stopped");
        Ok(())
    }
}
