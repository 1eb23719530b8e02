use async_trait::async_trait;
use futures_util::future::{Either, select};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use tutor_core::{TurnGenerator, TurnReply, TurnRequest};

const API_BASE: &str = "http://localhost:3000";

/// Backend turn budget plus headroom for the round trip.
const TURN_DEADLINE_MS: u32 = 25_000;

/// POST one turn to the backend.
pub async fn request_turn(request: &TurnRequest) -> Result<TurnReply, String> {
    let resp = Request::post(&format!("{API_BASE}/api/turn"))
        .json(request)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    resp.json::<TurnReply>().await.map_err(|e| e.to_string())
}

/// Turn generator that talks to the backend. Network errors, non-2xx
/// answers and a stalled request all resolve to the fallback reply.
pub struct HttpTurnGenerator;

#[async_trait(?Send)]
impl TurnGenerator for HttpTurnGenerator {
    async fn generate(&self, request: &TurnRequest) -> TurnReply {
        let call = Box::pin(request_turn(request));
        let deadline = Box::pin(TimeoutFuture::new(TURN_DEADLINE_MS));

        match select(call, deadline).await {
            Either::Left((Ok(reply), _)) => reply,
            Either::Left((Err(e), _)) => {
                log::error!("Turn request failed: {e}");
                TurnReply::fallback()
            }
            Either::Right(_) => {
                log::error!("Turn request timed out after {TURN_DEADLINE_MS} ms");
                TurnReply::fallback()
            }
        }
    }
}
