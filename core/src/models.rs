use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::{LearningMode, TopicKey};

// ── Localized text ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptVariant {
    Traditional,
    Simplified,
}

/// Localized renderings of an English line, keyed by Chinese script.
/// Replies that only carry one script are a one-entry map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations(BTreeMap<ScriptVariant, String>);

impl Translations {
    pub fn single(variant: ScriptVariant, text: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(variant, text.into());
        Self(map)
    }

    pub fn dual(traditional: impl Into<String>, simplified: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(ScriptVariant::Traditional, traditional.into());
        map.insert(ScriptVariant::Simplified, simplified.into());
        Self(map)
    }

    pub fn insert(&mut self, variant: ScriptVariant, text: impl Into<String>) {
        self.0.insert(variant, text.into());
    }

    pub fn get(&self, variant: ScriptVariant) -> Option<&str> {
        self.0.get(&variant).map(String::as_str)
    }

    /// The requested script if present, otherwise whichever script exists.
    pub fn preferred(&self, variant: ScriptVariant) -> Option<&str> {
        self.get(variant)
            .or_else(|| self.0.values().next().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// ── Chat messages ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Ai,
    User,
}

static NEXT_MESSAGE_SEQ: AtomicU64 = AtomicU64::new(0);

/// `{prefix}-{unix_millis}-{seq}`. The sequence keeps ids unique when several
/// messages are created within the same millisecond.
pub fn next_message_id(prefix: &str) -> String {
    let seq = NEXT_MESSAGE_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{}-{seq}", Utc::now().timestamp_millis())
}

fn time_label() -> String {
    Local::now().format("%H:%M").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Translations::is_empty")]
    pub translations: Translations,
    /// Display label only; transcript order is positional.
    pub timestamp: String,
}

impl ChatMessage {
    pub fn ai(id_prefix: &str, text: impl Into<String>, translations: Translations) -> Self {
        Self {
            id: next_message_id(id_prefix),
            sender: Sender::Ai,
            text: text.into(),
            translations,
            timestamp: time_label(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: next_message_id("user"),
            sender: Sender::User,
            text: text.into(),
            translations: Translations::default(),
            timestamp: time_label(),
        }
    }

    pub fn is_ai(&self) -> bool {
        self.sender == Sender::Ai
    }
}

// ── Turn request / reply ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// One message as the remote model sees it: role and English text only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: TurnRole,
    pub text: String,
}

impl From<&ChatMessage> for HistoryTurn {
    fn from(m: &ChatMessage) -> Self {
        let role = match m.sender {
            Sender::Ai => TurnRole::Model,
            Sender::User => TurnRole::User,
        };
        Self { role, text: m.text.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub history: Vec<HistoryTurn>,
    pub mode: LearningMode,
    pub topic: TopicKey,
}

impl TurnRequest {
    pub fn from_messages(messages: &[ChatMessage], mode: LearningMode, topic: TopicKey) -> Self {
        Self {
            history: messages.iter().map(HistoryTurn::from).collect(),
            mode,
            topic,
        }
    }
}

/// A validated AI turn. `suggestions` always holds exactly three entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReply {
    pub english: String,
    pub translations: Translations,
    pub suggestions: Vec<String>,
}

impl TurnReply {
    pub fn into_message(self) -> (ChatMessage, Vec<String>) {
        (ChatMessage::ai("ai", self.english, self.translations), self.suggestions)
    }
}
