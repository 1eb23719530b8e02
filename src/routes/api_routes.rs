use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tutor_core::{LearningMode, ModeDetails, Topic, TopicKey, TurnReply, TurnRequest};

use crate::service::turn_service::TurnService;

/// Shared router state.
#[derive(Clone)]
pub struct AppState {
    pub turns: TurnService,
    pub model: String,
    pub configured: bool,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub configured: bool,
    pub started_at: DateTime<Utc>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET `/api/health`
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.model.clone(),
        configured: state.configured,
        started_at: state.started_at,
    })
}

/// GET `/api/topics`: the topic registry, in display order
pub async fn list_topics_handler() -> Json<Vec<&'static Topic>> {
    Json(TopicKey::ALL.into_iter().map(TopicKey::details).collect())
}

/// GET `/api/modes`: the learning-mode registry, in display order
pub async fn list_modes_handler() -> Json<Vec<&'static ModeDetails>> {
    Json(LearningMode::ALL.into_iter().map(LearningMode::details).collect())
}

/// POST `/api/turn`: one AI turn. Always answers 200; failures come back as
/// the fallback reply.
pub async fn turn_handler(
    State(state): State<AppState>,
    Json(request): Json<TurnRequest>,
) -> Json<TurnReply> {
    Json(state.turns.respond(&request).await)
}
