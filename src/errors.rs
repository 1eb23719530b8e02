use thiserror::Error;
use tutor_core::ReplyError;

/// Everything that can go wrong while producing an AI turn. None of these
/// reach the client; the turn service logs them and answers with the
/// fallback reply.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Configuration errors ─────────────────────────────────────────────────
    #[error("Gemini API key is not configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("Failed to build Gemini client: {message}")]
    ClientBuild { message: String },

    // ── AI Agent errors ──────────────────────────────────────────────────────
    #[error("Gemini service unreachable for model '{model}'")]
    ModelUnavailable { model: String },

    #[error("Inference error: {message}")]
    InferenceError { message: String },

    #[error("Model did not answer within {seconds}s")]
    Timeout { seconds: u64 },

    #[error(transparent)]
    Reply(#[from] ReplyError),

    // ── Validation errors ────────────────────────────────────────────────────
    #[error("Field '{field_name}' cannot be empty")]
    EmptyField { field_name: String },

    #[error("Field '{field_name}' exceeds max length of {max_length} (actual: {actual_length})")]
    FieldTooLong { field_name: String, max_length: usize, actual_length: usize },
}

impl AppError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, AppError::MissingApiKey | AppError::ClientBuild { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::ModelUnavailable { .. } | AppError::InferenceError { .. } | AppError::Timeout { .. }
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::EmptyField { .. } | AppError::FieldTooLong { .. })
    }

    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            _ if self.is_configuration() => "configuration",
            _ if self.is_transport() => "transport",
            _ if self.is_validation() => "validation",
            AppError::Reply(e) if e.is_malformed() => "malformed_reply",
            _ => "invalid_reply",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_the_failure_taxonomy() {
        assert_eq!(AppError::MissingApiKey.kind(), "configuration");
        assert_eq!(AppError::Timeout { seconds: 3 }.kind(), "transport");
        assert_eq!(AppError::from(ReplyError::Malformed("eof".into())).kind(), "malformed_reply");
        assert_eq!(AppError::from(ReplyError::SuggestionCount { actual: 4 }).kind(), "invalid_reply");
        assert_eq!(AppError::EmptyField { field_name: "history".into() }.kind(), "validation");
    }
}
