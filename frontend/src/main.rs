mod api;
mod components;
mod speech;
mod state;
mod storage;

use leptos::mount::mount_to_body;
use leptos::prelude::*;
use tutor_core::shell::View;

use components::chat::ChatArea;
use components::header::Header;
use components::landing::LandingPage;
use components::sidebar::Sidebar;
use state::AppState;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    let state = AppState::provide();

    view! {
        {move || match state.view() {
            View::Landing => view! { <LandingPage /> }.into_any(),
            View::Chat => view! {
                <div class="app-container">
                    <Header />
                    <div class="app-body">
                        <Sidebar />
                        <ChatArea />
                    </div>
                </div>
            }
            .into_any(),
        }}
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
