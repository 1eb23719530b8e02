use async_trait::async_trait;
use tracing::debug;

use crate::models::{ChatMessage, Translations, TurnReply, TurnRequest};
use crate::registry::{LearningMode, TopicKey};

/// Longest learner message accepted, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Produces one AI turn from a history snapshot.
///
/// Implementations never fail: every error path resolves to
/// [`TurnReply::fallback`].
#[async_trait(?Send)]
pub trait TurnGenerator {
    async fn generate(&self, request: &TurnRequest) -> TurnReply;
}

/// A submitted user turn waiting for its AI reply.
///
/// Holds the history exactly as it was at submission time, so anything
/// appended to the session while the reply is in flight does not leak into
/// the request.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    epoch: u64,
    history: Vec<ChatMessage>,
    request: TurnRequest,
}

impl PendingTurn {
    pub fn request(&self) -> &TurnRequest {
        &self.request
    }
}

/// Owns the conversation shown to the learner and the history replayed to
/// the model.
#[derive(Debug, Clone)]
pub struct SessionController {
    current_topic: TopicKey,
    current_mode: LearningMode,
    transcript: Vec<ChatMessage>,
    api_history: Vec<ChatMessage>,
    suggestions: Vec<String>,
    is_loading: bool,
    epoch: u64,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(LearningMode::default(), TopicKey::default())
    }
}

impl SessionController {
    pub fn new(mode: LearningMode, topic: TopicKey) -> Self {
        let mut session = Self {
            current_topic: topic,
            current_mode: mode,
            transcript: Vec::new(),
            api_history: Vec::new(),
            suggestions: Vec::new(),
            is_loading: false,
            epoch: 0,
        };
        session.initialize(mode, topic);
        session
    }

    pub fn current_topic(&self) -> TopicKey {
        self.current_topic
    }

    pub fn current_mode(&self) -> LearningMode {
        self.current_mode
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn api_history(&self) -> &[ChatMessage] {
        &self.api_history
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Starts a fresh conversation: topic welcome followed by a mode welcome.
    /// Any turn still in flight is orphaned.
    pub fn initialize(&mut self, mode: LearningMode, topic: TopicKey) {
        let details = topic.details();
        let mode_details = mode.details();
        let label = mode_details.label;

        let welcome = ChatMessage::ai(
            &format!("initial-{topic}"),
            details.welcome,
            details.welcome_translation.to_translations(),
        );
        let mode_welcome = ChatMessage::ai(
            &format!("mode-welcome-{mode}"),
            format!("Great! Let's start with {} practice.", mode_details.name),
            Translations::dual(
                format!("太棒了！讓我們開始{}吧。", label.traditional),
                format!("太棒了！让我们开始{}吧。", label.simplified),
            ),
        );

        self.transcript = vec![welcome.clone(), mode_welcome.clone()];
        self.api_history = vec![welcome, mode_welcome];
        self.suggestions = details.seed_suggestions();
        self.current_mode = mode;
        self.current_topic = topic;
        self.is_loading = false;
        self.epoch += 1;
        debug!(%mode, %topic, epoch = self.epoch, "session initialized");
    }

    /// Pivots the conversation to another topic without clearing it.
    /// Returns `false` when `topic` is already current.
    pub fn change_topic(&mut self, topic: TopicKey) -> bool {
        if topic == self.current_topic {
            return false;
        }
        let details = topic.details();
        let message = ChatMessage::ai(
            &format!("topic-change-{topic}"),
            format!("Okay, let's talk about {} now!", details.name),
            Translations::dual(
                format!("好的，我們現在來聊聊{}吧！", details.label.traditional),
                format!("好的，我们现在来聊聊{}吧！", details.label.simplified),
            ),
        );
        self.append_system(message);
        self.suggestions = details.seed_suggestions();
        self.current_topic = topic;
        debug!(%topic, "topic changed");
        true
    }

    /// Switches learning mode; suggestions are left as they are.
    pub fn change_mode(&mut self, mode: LearningMode) -> bool {
        if mode == self.current_mode {
            return false;
        }
        let mode_details = mode.details();
        let topic = self.current_topic.details();
        let message = ChatMessage::ai(
            &format!("mode-change-{mode}"),
            format!(
                "Great! We've switched to {}. Let's continue our chat about {}!",
                mode_details.name, topic.name
            ),
            Translations::dual(
                format!(
                    "太棒了！我們已經切換到{}。讓我們繼續聊聊{}吧！",
                    mode_details.label.traditional, topic.label.traditional
                ),
                format!(
                    "太棒了！我们已经切换到{}。让我们继续聊聊{}吧！",
                    mode_details.label.simplified, topic.label.simplified
                ),
            ),
        );
        self.append_system(message);
        self.current_mode = mode;
        debug!(%mode, "mode changed");
        true
    }

    fn append_system(&mut self, message: ChatMessage) {
        self.transcript.push(message.clone());
        self.api_history.push(message);
    }

    /// First half of a message exchange: shows the user message, clears the
    /// suggestions, raises the loading gate and snapshots the request.
    ///
    /// Blank or over-long text, or a second submission while a reply is
    /// pending, changes nothing and returns `None`.
    pub fn begin_turn(&mut self, text: &str) -> Option<PendingTurn> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if text.chars().count() > MAX_MESSAGE_CHARS {
            debug!(chars = text.chars().count(), "ignoring over-long submission");
            return None;
        }
        if self.is_loading {
            debug!("ignoring submission while a reply is pending");
            return None;
        }

        let user_message = ChatMessage::user(text);
        self.transcript.push(user_message.clone());
        self.suggestions.clear();
        self.is_loading = true;

        let mut history = self.api_history.clone();
        history.push(user_message);
        let request = TurnRequest::from_messages(&history, self.current_mode, self.current_topic);

        Some(PendingTurn { epoch: self.epoch, history, request })
    }

    /// Second half of a message exchange. The api history is rebuilt from the
    /// submission-time snapshot plus the reply. Replies for a conversation
    /// that has since been re-initialized are dropped.
    pub fn complete_turn(&mut self, pending: PendingTurn, reply: TurnReply) -> bool {
        if pending.epoch != self.epoch {
            debug!(stale = pending.epoch, current = self.epoch, "dropping reply for a reset session");
            return false;
        }
        let (ai_message, suggestions) = reply.into_message();

        self.transcript.push(ai_message.clone());
        let mut history = pending.history;
        history.push(ai_message);
        self.api_history = history;
        self.suggestions = suggestions;
        self.is_loading = false;
        true
    }

    /// Runs a full exchange against `generator`. Returns `false` when the text
    /// was rejected.
    pub async fn send_message<G>(&mut self, generator: &G, text: &str) -> bool
    where
        G: TurnGenerator + ?Sized,
    {
        let Some(pending) = self.begin_turn(text) else {
            return false;
        };
        let reply = generator.generate(pending.request()).await;
        self.complete_turn(pending, reply)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::models::{Sender, TurnRole};
    use crate::reply::decode_reply;

    /// Replays canned raw replies through the real decoder, recording what it
    /// was asked.
    struct ScriptedGenerator {
        raw: Result<String, String>,
        seen: RefCell<Vec<TurnRequest>>,
    }

    impl ScriptedGenerator {
        fn replying(raw: &str) -> Self {
            Self { raw: Ok(raw.to_string()), seen: RefCell::new(Vec::new()) }
        }

        fn failing(reason: &str) -> Self {
            Self { raw: Err(reason.to_string()), seen: RefCell::new(Vec::new()) }
        }
    }

    #[async_trait(?Send)]
    impl TurnGenerator for ScriptedGenerator {
        async fn generate(&self, request: &TurnRequest) -> TurnReply {
            self.seen.borrow_mut().push(request.clone());
            match &self.raw {
                Ok(raw) => decode_reply(raw).unwrap_or_else(|_| TurnReply::fallback()),
                Err(_) => TurnReply::fallback(),
            }
        }
    }

    const NICE: &str = r#"{"english":"Wow, that's nice!","chinese":"哇，真好！","suggestions":["a","b","c"]}"#;

    fn texts(session: &SessionController) -> Vec<String> {
        session.transcript().iter().map(|m| m.text.clone()).collect()
    }

    #[test]
    fn initialize_shows_welcome_and_mode_welcome() {
        let session = SessionController::new(LearningMode::Dialogue, TopicKey::Family);

        assert_eq!(session.transcript().len(), 2);
        assert!(session.transcript().iter().all(ChatMessage::is_ai));
        assert_eq!(session.transcript()[0].text, TopicKey::Family.details().welcome);
        assert_eq!(session.transcript()[1].text, "Great! Let's start with dialogue practice.");
        assert_eq!(session.suggestions(), TopicKey::Family.details().seed_suggestions().as_slice());
        assert_eq!(session.api_history(), session.transcript());
        assert!(!session.is_loading());
    }

    #[test]
    fn initialize_replaces_previous_conversation() {
        let mut session = SessionController::default();
        session.change_topic(TopicKey::Food);
        session.begin_turn("pizza");

        session.initialize(LearningMode::Speech, TopicKey::Nature);

        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.current_topic(), TopicKey::Nature);
        assert_eq!(session.current_mode(), LearningMode::Speech);
        assert!(!session.is_loading());
        assert_eq!(session.suggestions()[0], "I see beautiful flowers");
    }

    #[test]
    fn same_topic_or_mode_is_a_no_op() {
        let mut session = SessionController::default();
        let before = session.transcript().to_vec();
        let suggestions = session.suggestions().to_vec();

        assert!(!session.change_topic(TopicKey::Family));
        assert!(!session.change_mode(LearningMode::Dialogue));

        assert_eq!(session.transcript(), before.as_slice());
        assert_eq!(session.suggestions(), suggestions.as_slice());
    }

    #[test]
    fn topic_change_appends_and_reseeds_suggestions() {
        let mut session = SessionController::default();

        assert!(session.change_topic(TopicKey::Animals));

        let last = session.transcript().last().unwrap();
        assert_eq!(last.text, "Okay, let's talk about animal friends now!");
        assert_eq!(
            last.translations.get(crate::models::ScriptVariant::Traditional),
            Some("好的，我們現在來聊聊動物朋友吧！")
        );
        assert_eq!(session.transcript().len(), 3);
        assert_eq!(session.api_history().len(), 3);
        assert_eq!(session.suggestions()[0], "I have a cute dog");
        assert_eq!(session.current_topic(), TopicKey::Animals);
    }

    #[test]
    fn mode_change_mentions_topic_and_keeps_suggestions() {
        let mut session = SessionController::default();
        let suggestions = session.suggestions().to_vec();

        assert!(session.change_mode(LearningMode::Sentence));

        assert_eq!(
            session.transcript().last().unwrap().text,
            "Great! We've switched to sentence building. Let's continue our chat about my family!"
        );
        assert_eq!(session.suggestions(), suggestions.as_slice());
        assert_eq!(session.api_history().len(), 3);
    }

    #[test]
    fn begin_turn_clears_suggestions_and_raises_gate() {
        let mut session = SessionController::default();

        let pending = session.begin_turn("  I have a mom and a dad  ").unwrap();

        assert!(session.suggestions().is_empty());
        assert!(session.is_loading());
        assert_eq!(session.transcript().last().unwrap().text, "I have a mom and a dad");
        assert_eq!(session.transcript().last().unwrap().sender, Sender::User);
        let last_turn = pending.request().history.last().unwrap();
        assert_eq!(last_turn.role, TurnRole::User);
        assert_eq!(pending.request().history.len(), 3);
    }

    #[test]
    fn second_submission_while_loading_is_ignored() {
        let mut session = SessionController::default();
        session.begin_turn("first").unwrap();
        let len = session.transcript().len();

        assert!(session.begin_turn("second").is_none());
        assert_eq!(session.transcript().len(), len);
    }

    #[tokio::test]
    async fn successful_turn_appends_user_and_ai() {
        let mut session = SessionController::new(LearningMode::Dialogue, TopicKey::Family);
        let generator = ScriptedGenerator::replying(NICE);

        assert!(session.send_message(&generator, "I have a mom and a dad").await);

        assert_eq!(session.transcript().len(), 4);
        assert_eq!(session.transcript()[2].sender, Sender::User);
        assert_eq!(session.transcript()[3].text, "Wow, that's nice!");
        assert_eq!(session.suggestions(), ["a", "b", "c"]);
        assert!(!session.is_loading());
        assert_eq!(session.api_history(), session.transcript());
    }

    #[tokio::test]
    async fn blank_message_changes_nothing() {
        let mut session = SessionController::default();
        let before = session.clone();
        let generator = ScriptedGenerator::replying(NICE);

        assert!(!session.send_message(&generator, "").await);
        assert!(!session.send_message(&generator, "   ").await);

        assert_eq!(session.transcript(), before.transcript());
        assert_eq!(session.suggestions(), before.suggestions());
        assert!(!session.is_loading());
        assert!(generator.seen.borrow().is_empty());
    }

    #[tokio::test]
    async fn over_long_message_is_rejected_and_session_keeps_working() {
        let mut session = SessionController::default();
        let generator = ScriptedGenerator::replying(NICE);

        let long = "I like cats. ".repeat(200);
        assert!(!session.send_message(&generator, &long).await);
        assert_eq!(session.transcript().len(), 2);
        assert!(!session.is_loading());

        let at_limit = "a".repeat(MAX_MESSAGE_CHARS);
        assert!(session.send_message(&generator, &at_limit).await);
        assert!(session.send_message(&generator, "I have a dog").await);
        assert_eq!(session.transcript().last().map(|m| m.text.as_str()), Some("Wow, that's nice!"));
        assert_eq!(generator.seen.borrow().len(), 2);
    }

    #[tokio::test]
    async fn failing_generator_still_completes_with_fallback() {
        let cases = [
            ScriptedGenerator::failing("network down"),
            ScriptedGenerator::replying("{not json"),
            ScriptedGenerator::replying(r#"{"english":"Hi","chinese":"嗨","suggestions":["a","b"]}"#),
            ScriptedGenerator::replying(r#"{"english":"Hi","chinese":"嗨","suggestions":["a","b","c","d"]}"#),
            ScriptedGenerator::replying(r#"{"chinese":"嗨","suggestions":["a","b","c"]}"#),
        ];
        let fallback = TurnReply::fallback();

        for generator in cases {
            let mut session = SessionController::default();
            assert!(session.send_message(&generator, "hello").await);
            assert!(!session.is_loading());
            assert_eq!(session.transcript().last().unwrap().text, fallback.english);
            assert_eq!(session.suggestions(), fallback.suggestions.as_slice());
        }
    }

    #[tokio::test]
    async fn suggestion_click_is_the_same_as_typing() {
        let generator = ScriptedGenerator::replying(NICE);
        let mut typed = SessionController::default();
        let mut clicked = SessionController::default();

        typed.send_message(&generator, "My family is very loving").await;
        let suggestion = clicked.suggestions()[1].clone();
        clicked.send_message(&generator, &suggestion).await;

        assert_eq!(texts(&typed), texts(&clicked));
        let seen = generator.seen.borrow();
        assert_eq!(seen[0], seen[1]);
    }

    #[test]
    fn in_flight_request_ignores_later_topic_change() {
        let mut session = SessionController::default();
        let pending = session.begin_turn("I like my sister").unwrap();
        let submitted = pending.request().clone();

        session.change_topic(TopicKey::School);

        assert_eq!(pending.request(), &submitted);
        assert!(
            pending
                .request()
                .history
                .iter()
                .all(|turn| !turn.text.contains("school life"))
        );
        assert_eq!(pending.request().topic, TopicKey::Family);

        // The transition stays on screen; the rebuilt api history skips it
        // until the next turn is snapshotted.
        session.complete_turn(pending, decode_reply(NICE).unwrap());
        assert_eq!(session.transcript().len(), 5);
        assert_eq!(session.api_history().len(), 4);
        assert!(session.transcript()[3].text.contains("school life"));
    }

    #[test]
    fn reply_after_reset_is_dropped() {
        let mut session = SessionController::default();
        let pending = session.begin_turn("hello").unwrap();

        session.initialize(LearningMode::Dialogue, TopicKey::Food);

        assert!(!session.complete_turn(pending, decode_reply(NICE).unwrap()));
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.suggestions()[0], "I love pizza and ice cream");
    }

    #[tokio::test]
    async fn transcript_only_grows_between_resets() {
        let generator = ScriptedGenerator::replying(NICE);
        let mut session = SessionController::default();
        let mut seen: Vec<ChatMessage> = session.transcript().to_vec();

        let mut check = |session: &SessionController| {
            assert!(session.transcript().len() >= seen.len());
            assert_eq!(&session.transcript()[..seen.len()], seen.as_slice());
            seen = session.transcript().to_vec();
        };

        session.change_topic(TopicKey::Hobbies);
        check(&session);
        session.send_message(&generator, "I like drawing").await;
        check(&session);
        session.change_mode(LearningMode::Speech);
        check(&session);
        session.change_mode(LearningMode::Speech);
        check(&session);
        session.send_message(&generator, "").await;
        check(&session);
        session.send_message(&generator, "I enjoy soccer").await;
        check(&session);
    }
}
