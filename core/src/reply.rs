use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{ScriptVariant, Translations, TurnReply};

pub const SUGGESTION_COUNT: usize = 3;

const FALLBACK_ENGLISH: &str =
    "Oops! I seem to be having a little trouble thinking. Could you please say that again?";
const FALLBACK_TRADITIONAL: &str = "哎呀！我好像有點思考困難。可以請你再說一次嗎？";
const FALLBACK_SIMPLIFIED: &str = "哎呀！我好像有点思考困难。可以请你再说一次吗？";
const FALLBACK_SUGGESTIONS: [&str; SUGGESTION_COUNT] =
    ["Let's try again.", "What are we talking about?", "Tell me a fun fact!"];

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```(\w*)?\s*\n?(.*?)\n?\s*```$").expect("code fence pattern is valid")
});

/// Why a raw model reply could not become a [`TurnReply`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplyError {
    #[error("Model returned an empty reply")]
    Empty,

    #[error("Model reply is not valid JSON: {0}")]
    Malformed(String),

    #[error("Model reply field '{field}' is missing or empty")]
    MissingField { field: &'static str },

    #[error("Model reply has {actual} suggestions, expected 3")]
    SuggestionCount { actual: usize },
}

impl ReplyError {
    /// Unparseable, as opposed to parseable but the wrong shape.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ReplyError::Empty | ReplyError::Malformed(_))
    }
}

/// The shape the model is asked to produce. Accepts both the single
/// `chinese` field and the per-script pair.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReply {
    #[serde(default)]
    english: Option<String>,
    #[serde(default)]
    chinese: Option<String>,
    #[serde(default)]
    chinese_traditional: Option<String>,
    #[serde(default)]
    chinese_simplified: Option<String>,
    #[serde(default)]
    suggestions: Option<Vec<String>>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Unwraps a reply wrapped in a fenced code block; returns the input
/// unchanged when there is no fence or the fence is empty.
pub fn strip_code_fence(raw: &str) -> &str {
    match CODE_FENCE.captures(raw).and_then(|caps| caps.get(2)) {
        Some(inner) if !inner.as_str().trim().is_empty() => inner.as_str().trim(),
        _ => raw,
    }
}

pub fn decode_reply(raw: &str) -> Result<TurnReply, ReplyError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ReplyError::Empty);
    }
    let json = strip_code_fence(trimmed);

    let wire: WireReply =
        serde_json::from_str(json).map_err(|e| ReplyError::Malformed(e.to_string()))?;

    let english = non_empty(wire.english).ok_or(ReplyError::MissingField { field: "english" })?;

    let mut translations = Translations::default();
    if let Some(text) = non_empty(wire.chinese) {
        translations.insert(ScriptVariant::Traditional, text);
    }
    if let Some(text) = non_empty(wire.chinese_traditional) {
        translations.insert(ScriptVariant::Traditional, text);
    }
    if let Some(text) = non_empty(wire.chinese_simplified) {
        translations.insert(ScriptVariant::Simplified, text);
    }
    if translations.is_empty() {
        return Err(ReplyError::MissingField { field: "chinese" });
    }

    let suggestions = wire.suggestions.ok_or(ReplyError::MissingField { field: "suggestions" })?;
    if suggestions.len() != SUGGESTION_COUNT {
        return Err(ReplyError::SuggestionCount { actual: suggestions.len() });
    }

    Ok(TurnReply { english, translations, suggestions })
}

impl TurnReply {
    /// The constant reply used whenever a real one cannot be produced.
    pub fn fallback() -> Self {
        Self {
            english: FALLBACK_ENGLISH.to_string(),
            translations: Translations::dual(FALLBACK_TRADITIONAL, FALLBACK_SIMPLIFIED),
            suggestions: FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
