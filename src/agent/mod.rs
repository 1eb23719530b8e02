pub mod prompt;

use async_trait::async_trait;
use rig::completion::Chat;
use rig::message::Message as RigMessage;
use rig::prelude::CompletionClient;
use rig::providers::gemini;
use serde_json::json;
use tracing::{debug, error};
use tutor_core::{HistoryTurn, TurnRequest, TurnRole};

use crate::config::{AppConfig, Sampling};
use crate::errors::AppError;

/// Anything that can turn a [`TurnRequest`] into the model's raw reply text.
#[async_trait]
pub trait ReplySource: Send + Sync {
    async fn complete(&self, request: &TurnRequest) -> Result<String, AppError>;
}

/// Splits the history into replayed context and the final user prompt.
fn split_history(history: &[HistoryTurn]) -> Result<(Vec<RigMessage>, &str), AppError> {
    let Some((last, earlier)) = history.split_last() else {
        return Err(AppError::EmptyField { field_name: "history".to_string() });
    };
    if last.role != TurnRole::User || last.text.trim().is_empty() {
        return Err(AppError::EmptyField { field_name: "history.last.user".to_string() });
    }
    let context = earlier
        .iter()
        .map(|turn| match turn.role {
            TurnRole::User => RigMessage::user(&turn.text),
            TurnRole::Model => RigMessage::assistant(&turn.text),
        })
        .collect();
    Ok((context, &last.text))
}

enum ClientState {
    Ready(gemini::Client),
    MissingKey,
    Broken(String),
}

/// Runs one tutoring turn against Gemini via rig. A fresh agent is built per
/// request because the preamble depends on the request's mode and topic.
pub struct GeminiAgentService {
    client: ClientState,
    model: String,
    sampling: Sampling,
}

impl GeminiAgentService {
    pub fn new(config: &AppConfig) -> Self {
        let client = match &config.api_key {
            None => ClientState::MissingKey,
            Some(key) => match gemini::Client::builder().api_key(key.clone()).build() {
                Ok(client) => ClientState::Ready(client),
                Err(e) => {
                    error!("Failed to build Gemini client: {e}");
                    ClientState::Broken(e.to_string())
                }
            },
        };
        Self {
            client,
            model: config.model.clone(),
            sampling: config.sampling,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.client, ClientState::Ready(_))
    }

    fn generation_config(&self) -> serde_json::Value {
        json!({
            "generationConfig": {
                "responseMimeType": "application/json",
                "topP": self.sampling.top_p,
                "topK": self.sampling.top_k,
            }
        })
    }
}

#[async_trait]
impl ReplySource for GeminiAgentService {
    async fn complete(&self, request: &TurnRequest) -> Result<String, AppError> {
        let client = match &self.client {
            ClientState::Ready(client) => client,
            ClientState::MissingKey => return Err(AppError::MissingApiKey),
            ClientState::Broken(message) => {
                return Err(AppError::ClientBuild { message: message.clone() });
            }
        };

        let (history, prompt) = split_history(&request.history)?;
        let preamble = prompt::system_instruction(request.mode, request.topic.details());

        let agent = client
            .agent(&self.model)
            .preamble(&preamble)
            .temperature(self.sampling.temperature)
            .additional_params(self.generation_config())
            .build();

        debug!(
            mode = %request.mode,
            topic = %request.topic,
            turns = request.history.len(),
            "sending turn to Gemini"
        );

        agent.chat(prompt, history).await.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("Connection refused") || msg.contains("connect") || msg.contains("dns") {
                AppError::ModelUnavailable { model: self.model.clone() }
            } else {
                AppError::InferenceError { message: msg }
            }
        })
    }
}
