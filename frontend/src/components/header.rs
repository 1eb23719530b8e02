use leptos::prelude::*;
use tutor_core::shell::Theme;

use crate::state::AppState;

/// Top bar of the chat view.
#[component]
pub fn Header() -> impl IntoView {
    let state = expect_context::<AppState>();

    let is_dark = move || state.shell.with(|s| s.theme() == Theme::Dark);

    view! {
        <header class="app-header">
            <button
                class="icon-btn menu-btn"
                title="Topics and modes"
                on:click=move |_| state.toggle_sidebar()
            >
                "☰"
            </button>
            <h1 class="app-title">"QMEI 英語小老師"</h1>
            <div class="header-actions">
                <button
                    class="icon-btn"
                    title=move || if is_dark() { "Light mode" } else { "Dark mode" }
                    on:click=move |_| state.toggle_theme()
                >
                    {move || if is_dark() { "☀️" } else { "🌙" }}
                </button>
                <button class="icon-btn" title="Home" on:click=move |_| state.go_home()>
                    "🏠"
                </button>
            </div>
        </header>
    }
}
