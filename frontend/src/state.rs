use leptos::prelude::*;
use leptos::task::spawn_local;
use tutor_core::shell::{AgeBand, AppShell, View};
use tutor_core::speech::MicState;
use tutor_core::{LearningMode, ScriptVariant, TopicKey, TurnGenerator};

use crate::api::HttpTurnGenerator;
use crate::storage::{BrowserStore, apply_theme};

/// Chinese script used for labels and message glosses.
pub const DISPLAY_SCRIPT: ScriptVariant = ScriptVariant::Traditional;

/// Shared application state, provided via Leptos context.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Page shell, preferences and the live session.
    pub shell: RwSignal<AppShell>,
    /// Text box contents; speech transcripts land here too.
    pub input: RwSignal<String>,
    pub mic: RwSignal<MicState>,
}

impl AppState {
    /// Create a new `AppState` from stored preferences and provide it in the
    /// current Leptos context.
    pub fn provide() -> Self {
        let shell = AppShell::from_store(&BrowserStore);
        apply_theme(shell.theme());

        let state = Self {
            shell: RwSignal::new(shell),
            input: RwSignal::new(String::new()),
            mic: RwSignal::new(MicState::default()),
        };

        provide_context(state);
        state
    }

    pub fn view(&self) -> View {
        self.shell.with(|s| s.view)
    }

    pub fn is_loading(&self) -> bool {
        self.shell.with(|s| s.session.is_loading())
    }

    pub fn current_topic(&self) -> TopicKey {
        self.shell.with(|s| s.session.current_topic())
    }

    pub fn current_mode(&self) -> LearningMode {
        self.shell.with(|s| s.session.current_mode())
    }

    pub fn start_chat(&self, mode: LearningMode) {
        self.input.set(String::new());
        self.shell.update(|s| s.start_chat(mode, &mut BrowserStore));
    }

    pub fn go_home(&self) {
        self.shell.update(AppShell::go_home);
    }

    pub fn toggle_theme(&self) {
        if let Some(theme) = self.shell.try_update(|s| s.toggle_theme(&mut BrowserStore)) {
            apply_theme(theme);
        }
    }

    pub fn toggle_sidebar(&self) {
        self.shell.update(AppShell::toggle_sidebar);
    }

    pub fn close_sidebar(&self) {
        self.shell.update(AppShell::close_sidebar);
    }

    pub fn select_age(&self, age: AgeBand) {
        self.shell.update(|s| s.select_age(age, &mut BrowserStore));
    }

    pub fn select_topic(&self, topic: TopicKey) {
        self.shell.update(|s| {
            s.select_topic(topic, &mut BrowserStore);
        });
    }

    pub fn select_mode(&self, mode: LearningMode) {
        self.shell.update(|s| {
            s.select_mode(mode, &mut BrowserStore);
        });
    }

    /// Submit a learner turn. The reply is applied when the backend answers;
    /// one that arrives after the session restarted is discarded.
    pub fn send_message(&self, text: String) {
        let Some(pending) = self.shell.try_update(|s| s.session.begin_turn(&text)).flatten() else {
            return;
        };
        self.input.set(String::new());

        let shell = self.shell;
        spawn_local(async move {
            let reply = HttpTurnGenerator.generate(pending.request()).await;
            shell.update(|s| {
                if !s.session.complete_turn(pending, reply) {
                    log::debug!("Dropped a reply for an earlier session");
                }
            });
        });
    }
}
