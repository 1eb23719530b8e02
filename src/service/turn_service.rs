use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};
use tutor_core::{MAX_MESSAGE_CHARS, TurnGenerator, TurnReply, TurnRequest, decode_reply};

use crate::agent::ReplySource;
use crate::errors::AppError;

/// The AI turn generator: calls the model, repairs and validates its reply,
/// and turns every failure into the fallback reply.
#[derive(Clone)]
pub struct TurnService {
    source: Arc<dyn ReplySource>,
    timeout: Duration,
}

impl TurnService {
    pub fn new(source: Arc<dyn ReplySource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// Never fails; see [`TurnService::try_respond`] for the error paths.
    pub async fn respond(&self, request: &TurnRequest) -> TurnReply {
        match self.try_respond(request).await {
            Ok(reply) => {
                info!(topic = %request.topic, mode = %request.mode, "AI turn generated");
                reply
            }
            Err(e) if e.is_configuration() || e.is_transport() => {
                error!(kind = e.kind(), "AI turn failed, using fallback: {e}");
                TurnReply::fallback()
            }
            Err(e) => {
                warn!(kind = e.kind(), "AI turn rejected, using fallback: {e}");
                TurnReply::fallback()
            }
        }
    }

    pub async fn try_respond(&self, request: &TurnRequest) -> Result<TurnReply, AppError> {
        // ── Validation ────────────────────────────────────────────────────────
        // Only the newest turn is bounded.
        let Some(latest) = request.history.last() else {
            return Err(AppError::EmptyField { field_name: "history".to_string() });
        };
        let latest_chars = latest.text.chars().count();
        if latest_chars > MAX_MESSAGE_CHARS {
            return Err(AppError::FieldTooLong {
                field_name: "history.last.text".to_string(),
                max_length: MAX_MESSAGE_CHARS,
                actual_length: latest_chars,
            });
        }

        // ── Call the model, bounded ───────────────────────────────────────────
        let raw = tokio::time::timeout(self.timeout, self.source.complete(request))
            .await
            .map_err(|_| AppError::Timeout { seconds: self.timeout.as_secs() })??;

        // ── Repair & validate ─────────────────────────────────────────────────
        Ok(decode_reply(&raw)?)
    }
}

#[async_trait(?Send)]
impl TurnGenerator for TurnService {
    async fn generate(&self, request: &TurnRequest) -> TurnReply {
        self.respond(request).await
    }
}

#[cfg(test)]
mod tests {
    use tutor_core::{HistoryTurn, LearningMode, ScriptVariant, SessionController, TopicKey, TurnRole};

    use super::*;

    enum Canned {
        Text(&'static str),
        Fail,
        Hang,
    }

    struct CannedSource(Canned);

    #[async_trait]
    impl ReplySource for CannedSource {
        async fn complete(&self, _request: &TurnRequest) -> Result<String, AppError> {
            match self.0 {
                Canned::Text(raw) => Ok(raw.to_string()),
                Canned::Fail => Err(AppError::ModelUnavailable { model: "test".into() }),
                Canned::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(String::new())
                }
            }
        }
    }

    fn service(canned: Canned) -> TurnService {
        TurnService::new(Arc::new(CannedSource(canned)), Duration::from_millis(50))
    }

    fn request() -> TurnRequest {
        TurnRequest {
            history: vec![HistoryTurn { role: TurnRole::User, text: "I have a mom and a dad".into() }],
            mode: LearningMode::Dialogue,
            topic: TopicKey::Family,
        }
    }

    const NICE: &str = r#"{"english":"Wow, that's nice!","chinese":"哇，真好！","suggestions":["a","b","c"]}"#;

    #[tokio::test]
    async fn valid_reply_passes_through_unchanged() {
        let reply = service(Canned::Text(NICE)).respond(&request()).await;
        assert_eq!(reply.english, "Wow, that's nice!");
        assert_eq!(reply.translations.get(ScriptVariant::Traditional), Some("哇，真好！"));
        assert_eq!(reply.suggestions, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn fenced_reply_is_unwrapped() {
        let fenced = "```json\n{\"english\":\"Hi!\",\"chinese\":\"嗨！\",\"suggestions\":[\"x\",\"y\",\"z\"]}\n```";
        let reply = service(Canned::Text(fenced)).respond(&request()).await;
        assert_eq!(reply.english, "Hi!");
    }

    #[tokio::test]
    async fn every_failure_resolves_to_fallback() {
        let cases = [
            Canned::Fail,
            Canned::Text("{oops"),
            Canned::Text(r#"{"english":"Hi","chinese":"嗨","suggestions":["a","b"]}"#),
            Canned::Text(r#"{"english":"Hi","chinese":"嗨","suggestions":["a","b","c","d"]}"#),
            Canned::Text(r#"{"chinese":"嗨","suggestions":["a","b","c"]}"#),
        ];
        for canned in cases {
            assert_eq!(service(canned).respond(&request()).await, TurnReply::fallback());
        }
    }

    #[tokio::test]
    async fn failures_are_distinguishable() {
        let transport = service(Canned::Fail).try_respond(&request()).await.unwrap_err();
        assert!(transport.is_transport());
        let malformed = service(Canned::Text("{oops")).try_respond(&request()).await.unwrap_err();
        assert_eq!(malformed.kind(), "malformed_reply");
        let invalid = service(Canned::Text(r#"{"english":"Hi","chinese":"嗨","suggestions":[]}"#))
            .try_respond(&request())
            .await
            .unwrap_err();
        assert_eq!(invalid.kind(), "invalid_reply");
    }

    #[tokio::test]
    async fn hung_model_times_out_to_fallback() {
        let svc = service(Canned::Hang);
        let err = svc.try_respond(&request()).await.unwrap_err();
        assert!(matches!(err, AppError::Timeout { .. }));
        assert_eq!(svc.respond(&request()).await, TurnReply::fallback());
    }

    #[tokio::test]
    async fn empty_history_never_reaches_the_model() {
        let empty = TurnRequest { history: vec![], ..request() };
        let err = service(Canned::Text(NICE)).try_respond(&empty).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn long_earlier_turn_does_not_block_later_turns() {
        let long = "I like cats. ".repeat(200);
        let request = TurnRequest {
            history: vec![
                HistoryTurn { role: TurnRole::User, text: long.clone() },
                HistoryTurn { role: TurnRole::Model, text: "Cats are great!".into() },
                HistoryTurn { role: TurnRole::User, text: "I have a dog".into() },
            ],
            ..request()
        };
        let reply = service(Canned::Text(NICE)).respond(&request).await;
        assert_eq!(reply.english, "Wow, that's nice!");

        let too_long = TurnRequest {
            history: vec![HistoryTurn { role: TurnRole::User, text: long }],
            ..self::request()
        };
        let err = service(Canned::Text(NICE)).try_respond(&too_long).await.unwrap_err();
        assert!(matches!(err, AppError::FieldTooLong { .. }));
    }

    #[tokio::test]
    async fn drives_a_session_end_to_end() {
        let svc = service(Canned::Text(NICE));
        let mut session = SessionController::new(LearningMode::Dialogue, TopicKey::Family);

        assert!(session.send_message(&svc, "I have a mom and a dad").await);

        assert_eq!(session.transcript().len(), 4);
        assert_eq!(session.suggestions(), ["a", "b", "c"]);
        assert!(!session.is_loading());
    }
}
