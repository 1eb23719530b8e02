//! Conversation logic shared by the QMEI backend and the browser frontend.
//!
//! Nothing in here touches the network or the DOM; the backend and the
//! frontend plug their own [`session::TurnGenerator`],
//! [`shell::PreferenceStore`] and [`speech::SpeechCapture`] into it.

pub mod models;
pub mod registry;
pub mod reply;
pub mod session;
pub mod shell;
pub mod speech;

pub use models::{ChatMessage, HistoryTurn, ScriptVariant, Sender, Translations, TurnReply, TurnRequest, TurnRole};
pub use registry::{LearningMode, ModeDetails, ScriptPair, Topic, TopicKey};
pub use reply::{ReplyError, decode_reply};
pub use session::{MAX_MESSAGE_CHARS, PendingTurn, SessionController, TurnGenerator};
