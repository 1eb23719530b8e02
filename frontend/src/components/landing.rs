use leptos::prelude::*;
use tutor_core::LearningMode;
use tutor_core::shell::{AgeBand, Theme};

use crate::state::{AppState, DISPLAY_SCRIPT};

/// Entry page: pick an age band, then a learning mode to start chatting.
#[component]
pub fn LandingPage() -> impl IntoView {
    let state = expect_context::<AppState>();

    let is_dark = move || state.shell.with(|s| s.theme() == Theme::Dark);
    let age = move || state.shell.with(|s| s.preferences.age);

    view! {
        <main class="landing">
            <button class="icon-btn theme-toggle" on:click=move |_| state.toggle_theme()>
                {move || if is_dark() { "☀️" } else { "🌙" }}
            </button>

            <section class="landing-hero">
                <h1>"QMEI 英語小老師"</h1>
                <p>"和 QMEI 一起用英文聊天吧！Chat with QMEI in English!"</p>
            </section>

            <section class="age-picker">
                <h2>"年齡 Age"</h2>
                <div class="age-options">
                    {AgeBand::ALL
                        .into_iter()
                        .map(|band| {
                            view! {
                                <button
                                    class="age-btn"
                                    class:active=move || age() == band
                                    on:click=move |_| state.select_age(band)
                                >
                                    {band.as_str()}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
            </section>

            <section class="mode-cards">
                {LearningMode::ALL
                    .into_iter()
                    .map(|mode| {
                        let details = mode.details();
                        view! {
                            <button class="mode-card" on:click=move |_| state.start_chat(mode)>
                                <span class="mode-icon">{details.icon}</span>
                                <span class="mode-label">{details.label.get(DISPLAY_SCRIPT)}</span>
                                <span class="mode-name">{details.name}</span>
                            </button>
                        }
                    })
                    .collect_view()}
            </section>
        </main>
    }
}
