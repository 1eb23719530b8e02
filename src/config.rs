use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TURN_TIMEOUT_SECS: u64 = 20;

/// Sampling parameters sent with every turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
}

impl Default for Sampling {
    fn default() -> Self {
        Self { temperature: 0.7, top_p: 0.9, top_k: 40 }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Absent is allowed: every turn then resolves to the fallback reply.
    pub api_key: Option<String>,
    pub model: String,
    pub port: u16,
    pub turn_timeout: Duration,
    pub sampling: Sampling,
    pub frontend_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let sampling_default = Sampling::default();

        Self {
            api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
            model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            port: parse_or("PORT", non_empty("PORT"), DEFAULT_PORT),
            turn_timeout: Duration::from_secs(parse_or(
                "TURN_TIMEOUT_SECS",
                non_empty("TURN_TIMEOUT_SECS"),
                DEFAULT_TURN_TIMEOUT_SECS,
            )),
            sampling: Sampling {
                temperature: parse_or("TUTOR_TEMPERATURE", non_empty("TUTOR_TEMPERATURE"), sampling_default.temperature),
                top_p: parse_or("TUTOR_TOP_P", non_empty("TUTOR_TOP_P"), sampling_default.top_p),
                top_k: parse_or("TUTOR_TOP_K", non_empty("TUTOR_TOP_K"), sampling_default.top_k),
            },
            frontend_origin: non_empty("FRONTEND_ORIGIN"),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {key}={raw}, using default");
            default
        }),
        None => default,
    }
}
