mod agent;
mod config;
mod errors;
mod routes;
mod service;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{Router, routing::get, routing::post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::agent::GeminiAgentService;
use crate::config::AppConfig;
use crate::routes::api_routes::{
    AppState, health_handler, list_modes_handler, list_topics_handler, turn_handler,
};
use crate::service::turn_service::TurnService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qmei_tutor=debug,tutor_core=debug,tower_http=debug".into()),
        )
        .init();

    let config = AppConfig::from_env();

    // ── Dependency wiring ─────────────────────────────────────────────────────
    let agent = GeminiAgentService::new(&config);
    if agent.is_configured() {
        info!("Gemini model '{}' ready", agent.model());
    } else {
        warn!("Gemini is not configured; every turn will return the fallback reply");
    }

    let state = AppState {
        model: agent.model().to_string(),
        configured: agent.is_configured(),
        turns: TurnService::new(Arc::new(agent), config.turn_timeout),
        started_at: chrono::Utc::now(),
    };

    let cors = match config
        .frontend_origin
        .as_deref()
        .and_then(|origin| origin.parse::<HeaderValue>().ok())
    {
        Some(origin) => CorsLayer::new().allow_origin(origin),
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods(Any)
    .allow_headers(Any);

    // ── Router ────────────────────────────────────────────────────────────────
    let app = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/topics", get(list_topics_handler))
        .route("/api/modes", get(list_modes_handler))
        .route("/api/turn", post(turn_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/");

    axum::serve(listener, app).await?;
    Ok(())
}
