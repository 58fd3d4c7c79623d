// rest/mod.rs — Public REST API server.
//
// Axum HTTP server exposing the goal-tracking operations.
//
// Endpoints:
//   POST /goals
//   POST /completions
//   GET  /summary
//   GET  /pending-goals
//   GET  /health
//
// CORS is permissive — the API serves browser clients on other origins.

pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Health (no body, no auth)
        .route("/health", get(routes::health::health))
        // Goals
        .route("/goals", post(routes::goals::create_goal))
        // Completions (quota-enforced)
        .route("/completions", post(routes::completions::register_completion))
        // Weekly reporting
        .route("/summary", get(routes::summary::week_summary))
        .route("/pending-goals", get(routes::summary::pending_goals))
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
