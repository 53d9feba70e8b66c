use crate::web::{handlers, AppState};
use anyhow::Result;
use axum::{routing::get, Router};
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
        // === HEALTH CHECK ROUTES ===
        .route("/hacheck", get(handlers::hacheck_by_header))
        .route(
            "/hacheck/miningaddress/{mining_address}",
            get(handlers::hacheck_by_mining_address),
        )
        .route(
            "/hacheck/{node_group}/{node_id}",
            get(handlers::hacheck_by_node),
        )
        // === SNAPSHOT ROUTES ===
        .route("/heights", get(handlers::get_reference_pool_heights))
        .route("/heights/nodes", get(handlers::get_service_node_heights))
        .route("/heights/pools/sources", get(handlers::get_pool_sources))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
