use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::AppState;
use crate::auth::identity_middleware;
use crate::config::AppConfig;
use crate::routes;

/// Largest request body accepted (uploads included).
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Build the full router: routes, identity middleware, static files and tracing.
pub fn build_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config.server.static_dir);

    routes::router()
        .nest_service("/static", static_dir)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Periodically drop browser sessions idle for longer than the configured timeout.
fn spawn_session_cleanup(state: &AppState) {
    let sessions = state.sessions.clone();
    let idle = state.config.sessions.idle_timeout();
    let every = state.config.sessions.cleanup_interval();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let removed = sessions.cleanup_expired_with_timeout(idle);
            if removed > 0 {
                debug!(
                    name: "sessions.cleanup",
                    removed,
                    remaining = sessions.len(),
                    "Expired browser sessions removed"
                );
            }
        }
    });
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let state = AppState::new(Arc::clone(&config))?;
    info!(
        name: "backend.config.loaded",
        base_url = %state.backend.base_url(),
        "Backend configuration loaded"
    );

    spawn_session_cleanup(&state);
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
