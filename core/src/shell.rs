//! Top-level UI state around the session: which screen is showing, theme,
//! side panel, and the handful of scalar preferences kept in browser storage.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::registry::{LearningMode, TopicKey};
use crate::session::SessionController;

pub const THEME_KEY: &str = "theme";
pub const TOPIC_KEY: &str = "selectedTopic";
pub const AGE_KEY: &str = "selectedAge";
pub const MODE_KEY: &str = "learningMode";

/// Scalar key-value storage (browser `localStorage` in the frontend).
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "3-5")]
    Preschool,
    #[default]
    #[serde(rename = "6-8")]
    EarlyPrimary,
    #[serde(rename = "9-12")]
    UpperPrimary,
}

impl AgeBand {
    pub const ALL: [AgeBand; 3] = [AgeBand::Preschool, AgeBand::EarlyPrimary, AgeBand::UpperPrimary];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBand::Preschool => "3-5",
            AgeBand::EarlyPrimary => "6-8",
            AgeBand::UpperPrimary => "9-12",
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeBand {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeBand::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("Unknown age band: {s}"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub topic: TopicKey,
    pub age: AgeBand,
    pub mode: LearningMode,
}

fn read_or_default<T: FromStr + Default>(store: &impl PreferenceStore, key: &str) -> T {
    match store.get(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            debug!(key, value = %raw, "ignoring invalid stored preference");
            T::default()
        }),
        None => T::default(),
    }
}

impl Preferences {
    /// Reads every preference; absent or unparseable values use defaults.
    pub fn load(store: &impl PreferenceStore) -> Self {
        Self {
            theme: read_or_default(store, THEME_KEY),
            topic: read_or_default(store, TOPIC_KEY),
            age: read_or_default(store, AGE_KEY),
            mode: read_or_default(store, MODE_KEY),
        }
    }

    pub fn save(&self, store: &mut impl PreferenceStore) {
        store.set(THEME_KEY, self.theme.as_str());
        store.set(TOPIC_KEY, self.topic.as_str());
        store.set(AGE_KEY, self.age.as_str());
        store.set(MODE_KEY, self.mode.as_str());
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Landing,
    Chat,
}

/// Everything the page renders from, in one value.
#[derive(Debug, Clone, Default)]
pub struct AppShell {
    pub view: View,
    pub sidebar_open: bool,
    pub preferences: Preferences,
    pub session: SessionController,
}

impl AppShell {
    pub fn from_store(store: &impl PreferenceStore) -> Self {
        let preferences = Preferences::load(store);
        Self {
            view: View::Landing,
            sidebar_open: false,
            preferences,
            session: SessionController::new(preferences.mode, preferences.topic),
        }
    }

    pub fn theme(&self) -> Theme {
        self.preferences.theme
    }

    /// Landing → chat. Always starts a fresh conversation on the saved topic.
    pub fn start_chat(&mut self, mode: LearningMode, store: &mut impl PreferenceStore) {
        self.preferences.mode = mode;
        self.preferences.save(store);
        self.session.initialize(mode, self.preferences.topic);
        self.sidebar_open = false;
        self.view = View::Chat;
    }

    /// Chat → landing. The conversation stays in memory until the next start.
    pub fn go_home(&mut self) {
        self.view = View::Landing;
        self.sidebar_open = false;
    }

    pub fn toggle_theme(&mut self, store: &mut impl PreferenceStore) -> Theme {
        self.preferences.theme = self.preferences.theme.toggled();
        store.set(THEME_KEY, self.preferences.theme.as_str());
        self.preferences.theme
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }

    pub fn select_age(&mut self, age: AgeBand, store: &mut impl PreferenceStore) {
        self.preferences.age = age;
        store.set(AGE_KEY, age.as_str());
    }

    /// Picks a topic from the side panel: closes the panel, remembers the
    /// choice, and pivots the conversation.
    pub fn select_topic(&mut self, topic: TopicKey, store: &mut impl PreferenceStore) -> bool {
        self.sidebar_open = false;
        self.preferences.topic = topic;
        store.set(TOPIC_KEY, topic.as_str());
        self.session.change_topic(topic)
    }

    pub fn select_mode(&mut self, mode: LearningMode, store: &mut impl PreferenceStore) -> bool {
        self.sidebar_open = false;
        self.preferences.mode = mode;
        store.set(MODE_KEY, mode.as_str());
        self.session.change_mode(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_yields_defaults() {
        let prefs = Preferences::load(&MemoryStore::default());
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.age, AgeBand::EarlyPrimary);
        assert_eq!(prefs.topic, TopicKey::Family);
        assert_eq!(prefs.mode, LearningMode::Dialogue);
    }

    #[test]
    fn invalid_values_fall_back_per_key() {
        let mut store = MemoryStore::default();
        store.set(THEME_KEY, "sepia");
        store.set(TOPIC_KEY, "animals");
        store.set(AGE_KEY, "13-15");
        store.set(MODE_KEY, "karaoke");

        let prefs = Preferences::load(&store);
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.topic, TopicKey::Animals);
        assert_eq!(prefs.age, AgeBand::EarlyPrimary);
        assert_eq!(prefs.mode, LearningMode::Dialogue);
    }

    #[test]
    fn mode_is_read_from_learning_mode_key() {
        let mut store = MemoryStore::default();
        store.set("learningMode", "speech");
        assert_eq!(Preferences::load(&store).mode, LearningMode::Speech);

        let mut shell = AppShell::from_store(&store);
        shell.select_mode(LearningMode::Sentence, &mut store);
        assert_eq!(store.get("learningMode").as_deref(), Some("sentence"));
    }

    #[test]
    fn preferences_survive_a_save_and_load() {
        let mut store = MemoryStore::default();
        let prefs = Preferences {
            theme: Theme::Dark,
            topic: TopicKey::School,
            age: AgeBand::UpperPrimary,
            mode: LearningMode::Speech,
        };
        prefs.save(&mut store);
        assert_eq!(store.get(AGE_KEY).as_deref(), Some("9-12"));
        assert_eq!(Preferences::load(&store), prefs);
    }

    #[test]
    fn landing_chat_home_flow() {
        let mut store = MemoryStore::default();
        store.set(TOPIC_KEY, "food");
        let mut shell = AppShell::from_store(&store);
        assert_eq!(shell.view, View::Landing);

        shell.start_chat(LearningMode::Sentence, &mut store);
        assert_eq!(shell.view, View::Chat);
        assert_eq!(shell.session.current_topic(), TopicKey::Food);
        assert_eq!(shell.session.current_mode(), LearningMode::Sentence);
        assert_eq!(store.get(MODE_KEY).as_deref(), Some("sentence"));

        shell.go_home();
        assert_eq!(shell.view, View::Landing);
    }

    #[test]
    fn selecting_topic_closes_panel_and_persists() {
        let mut store = MemoryStore::default();
        let mut shell = AppShell::from_store(&store);
        shell.start_chat(LearningMode::Dialogue, &mut store);
        shell.toggle_sidebar();
        assert!(shell.sidebar_open);

        assert!(shell.select_topic(TopicKey::Nature, &mut store));
        assert!(!shell.sidebar_open);
        assert_eq!(store.get(TOPIC_KEY).as_deref(), Some("nature"));
        assert!(!shell.select_topic(TopicKey::Nature, &mut store));
        assert_eq!(shell.session.transcript().len(), 3);
    }

    #[test]
    fn theme_toggle_is_written_through() {
        let mut store = MemoryStore::default();
        let mut shell = AppShell::from_store(&store);
        assert_eq!(shell.toggle_theme(&mut store), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(shell.toggle_theme(&mut store), Theme::Light);
    }
}
