pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod selection;

#[cfg(test)]
pub(crate) mod test_support;

use axum::extract::FromRef;
use axum::http::Method;
use axum::Router;
use axum_extra::extract::cookie::Key;
use gridvault_core::{SheetService, SheetStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{AccountService, AccountStore, SessionManager, SessionStore};
use crate::config::Config;
use crate::db::Database;
use crate::selection::ActiveSheet;

/// How often expired sessions are deleted
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub sheets: SheetService,
    pub accounts: AccountService,
    pub sessions: SessionManager,
    /// Active sheet for requests without a session
    pub active: Arc<ActiveSheet>,
    pub cookie_key: Key,
    pub require_auth: bool,
}

impl AppState {
    pub fn new(
        sheet_store: Arc<dyn SheetStore>,
        account_store: Arc<dyn AccountStore>,
        session_store: Arc<dyn SessionStore>,
        config: &Config,
    ) -> Self {
        Self {
            sheets: SheetService::new(sheet_store),
            accounts: AccountService::new(account_store),
            sessions: SessionManager::new(
                session_store,
                config.session_ttl,
                config.secure_cookies,
            ),
            active: Arc::new(ActiveSheet::new()),
            cookie_key: Key::derive_from(config.session_secret.as_bytes()),
            require_auth: config.require_auth,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Build the router with every route and layer
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::router(&state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Periodically delete expired sessions
fn spawn_session_purge(sessions: SessionManager) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            match sessions.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "expired sessions removed"),
                Err(e) => tracing::warn!("session purge failed: {}", e),
            }
        }
    });
}

/// Run the server with the given configuration
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    // Initialize database
    let db = Arc::new(Database::connect(&config).await?);
    tracing::info!("Connected to database");

    // Run migrations
    db.migrate().await?;

    // Create application state
    let state = AppState::new(db.clone(), db.clone(), db, &config);
    spawn_session_purge(state.sessions.clone());

    if state.require_auth {
        tracing::info!("sheet and table routes require a session");
    }

    // Build the router
    let app = build_router(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
