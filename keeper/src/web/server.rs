// File: keeper/src/web/server.rs
use crate::web::{handlers, AppState};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub async fn start_web_server(state: AppState) -> Result<()> {
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        // === TRIGGER ROUTES ===
        .route("/api/events/finalize", post(handlers::handle_finalize_event))
        // === STORE ROUTES ===
        .route("/api/stores", get(handlers::list_stores))
        .route("/api/stores/{store}/enforce", post(handlers::enforce_scope))
        .route("/api/stores/{store}/stats", get(handlers::get_scope_stats))
        .route("/api/stores/{store}/sweep", post(handlers::sweep_store))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
