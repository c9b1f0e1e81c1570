//! JSON REST api over the same operations the shell uses.

pub mod auth;
pub mod error;
pub mod extract;
mod events;
mod interactions;
mod map;
mod organizations;
mod people;
mod preferences;
mod stats;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use rusqlite::Connection;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{PrmError, PrmResult};
use error::{ApiError, ApiResult};

#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(conn: Connection, config: Config) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            config: Arc::new(config),
        }
    }

    /// Runs `f` against the shared connection on the blocking pool.
    pub async fn with_conn<T, F>(&self, f: F) -> ApiResult<T>
    where
        F: FnOnce(&Connection) -> PrmResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let result = tokio::task::spawn_blocking(move || {
            let conn = db
                .lock()
                .map_err(|_| PrmError::Other("database lock poisoned".into()))?;
            f(&conn)
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "storage task failed");
            ApiError::internal()
        })?;
        result.map_err(ApiError::from)
    }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/people", get(people::list).post(people::create))
        .route(
            "/people/{id}",
            get(people::show).put(people::update).delete(people::remove),
        )
        .route(
            "/organizations",
            get(organizations::list).post(organizations::create),
        )
        .route(
            "/organizations/{id}",
            put(organizations::update).delete(organizations::remove),
        )
        .route("/events", get(events::list).post(events::create))
        .route(
            "/events/{id}",
            get(events::show).put(events::update).delete(events::remove),
        )
        .route("/events/{id}/interactions", post(events::log_attendance))
        .route(
            "/interactions",
            get(interactions::list).post(interactions::create),
        )
        .route(
            "/interactions/{id}",
            put(interactions::update).delete(interactions::remove),
        )
        .route(
            "/preferences",
            get(preferences::list).put(preferences::upsert),
        )
        .route("/preferences/resolved", get(preferences::resolved))
        .route("/map", get(map::show))
        .route("/stats", get(stats::show))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_user,
        ));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "api listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
    }
    tracing::info!("shutting down");
}
