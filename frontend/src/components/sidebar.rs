use leptos::prelude::*;
use tutor_core::{LearningMode, TopicKey};

use crate::state::{AppState, DISPLAY_SCRIPT};

/// Side panel listing topics and learning modes. Collapses on narrow
/// screens; any pick closes it.
#[component]
pub fn Sidebar() -> impl IntoView {
    let state = expect_context::<AppState>();

    let is_open = move || state.shell.with(|s| s.sidebar_open);

    view! {
        <div
            class="sidebar-backdrop"
            class:visible=is_open
            on:click=move |_| state.close_sidebar()
        />
        <aside class="sidebar" class:open=is_open>
            <div class="sidebar-header">
                <h2>"話題 Topics"</h2>
            </div>
            <div class="topic-list">
                {TopicKey::ALL
                    .into_iter()
                    .map(|key| {
                        let topic = key.details();
                        view! {
                            <div
                                class="topic-item"
                                class:active=move || state.current_topic() == key
                                on:click=move |_| state.select_topic(key)
                            >
                                <span class="item-icon">{topic.icon}</span>
                                <span>{topic.label.get(DISPLAY_SCRIPT)}</span>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
            <div class="sidebar-header">
                <h2>"模式 Modes"</h2>
            </div>
            <div class="mode-list">
                {LearningMode::ALL
                    .into_iter()
                    .map(|mode| {
                        let details = mode.details();
                        view! {
                            <div
                                class="mode-item"
                                class:active=move || state.current_mode() == mode
                                on:click=move |_| state.select_mode(mode)
                            >
                                <span class="item-icon">{details.icon}</span>
                                <span>{details.label.get(DISPLAY_SCRIPT)}</span>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </aside>
    }
}
