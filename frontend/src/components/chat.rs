use leptos::ev;
use leptos::html::Div;
use leptos::prelude::*;
use tutor_core::speech::{MicState, SpeechCapture};
use tutor_core::{ChatMessage, LearningMode, MAX_MESSAGE_CHARS};

use crate::speech::WebSpeech;
use crate::state::{AppState, DISPLAY_SCRIPT};

/// Main chat area: topic banner, transcript, and input.
#[component]
pub fn ChatArea() -> impl IntoView {
    let state = expect_context::<AppState>();
    let transcript_ref = NodeRef::<Div>::new();

    // Keep the newest message in view
    Effect::new(move |_| {
        state.shell.with(|s| s.session.transcript().len());
        state.is_loading();
        if let Some(el) = transcript_ref.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    let banner = move || {
        let topic = state.current_topic().details();
        let mode = state.current_mode().details();
        view! {
            <div class="topic-banner">
                <span class="item-icon">{topic.icon}</span>
                <span>{topic.label.get(DISPLAY_SCRIPT)}</span>
                <span class="mode-badge">{mode.icon} " " {mode.label.get(DISPLAY_SCRIPT)}</span>
            </div>
        }
    };

    view! {
        <main class="chat-area">
            {banner}
            <div class="messages" node_ref=transcript_ref>
                <For
                    each=move || state.shell.with(|s| s.session.transcript().to_vec())
                    key=|m| m.id.clone()
                    let:msg
                >
                    <MessageBubble message=msg />
                </For>
                <Show when=move || state.is_loading()>
                    <div class="message ai typing">
                        <span class="dot" />
                        <span class="dot" />
                        <span class="dot" />
                    </div>
                </Show>
            </div>

            <ChatInput />
        </main>
    }
}

/// A single chat message bubble, with its Chinese gloss under AI lines.
#[component]
fn MessageBubble(message: ChatMessage) -> impl IntoView {
    let css_class = if message.is_ai() { "message ai" } else { "message user" };
    let translation = message
        .translations
        .preferred(DISPLAY_SCRIPT)
        .map(str::to_string);

    view! {
        <div class=css_class>
            <div class="message-text">{message.text}</div>
            {translation.map(|t| view! { <div class="translation">{t}</div> })}
            <div class="timestamp">{message.timestamp}</div>
        </div>
    }
}

/// Pairs each suggestion with its position so repeated texts still get
/// distinct `For` keys.
fn keyed(suggestions: &[String]) -> Vec<(usize, String)> {
    suggestions.iter().cloned().enumerate().collect()
}

/// Suggestion chips, microphone (speech mode only), text box and send button.
#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<AppState>();
    let input = state.input;

    let speech = StoredValue::new_local(WebSpeech::new(move |event| {
        if let Some(text) = state.mic.try_update(|mic| mic.apply(event)).flatten() {
            input.set(text);
        }
    }));
    let speech_supported = speech.with_value(|s| s.is_supported());

    let is_loading = move || state.is_loading();

    let send = move || {
        let text = input.get_untracked().trim().to_string();
        if text.is_empty() || state.is_loading() {
            return;
        }
        state.send_message(text);
    };

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            send();
        }
    };

    let toggle_mic = move |_| {
        let loading = state.is_loading();
        let mut mic: MicState = state.mic.get_untracked();
        let was_recording = mic.recording;
        speech.update_value(|capture| {
            if let Err(e) = mic.toggle(capture, loading) {
                log::warn!("Microphone unavailable: {e}");
            }
        });
        if mic.recording && !was_recording {
            input.set(String::new());
        }
        state.mic.set(mic);
    };

    let use_suggestion = move |text: String| {
        if !state.is_loading() {
            state.send_message(text);
        }
    };

    let suggestions = move || state.shell.with(|s| keyed(s.session.suggestions()));
    let is_speech = move || state.current_mode() == LearningMode::Speech;
    let recording = move || state.mic.with(|m| m.recording);
    let mic_title = move || state.mic.with(|m| m.title(speech_supported, is_loading()));

    view! {
        <div class="input-area">
            <div class="suggestions">
                <For each=suggestions key=|entry| entry.clone() let:entry>
                    {
                        let (_, suggestion) = entry;
                        let text = suggestion.clone();
                        view! {
                            <button
                                class="suggestion-chip"
                                disabled=is_loading
                                on:click=move |_| use_suggestion(text.clone())
                            >
                                {suggestion}
                            </button>
                        }
                    }
                </For>
            </div>
            <div class="input-row">
                <Show when=is_speech>
                    <button
                        class="mic-btn"
                        class:recording=recording
                        title=mic_title
                        aria-label=mic_title
                        disabled=move || is_loading() || !speech_supported
                        on:click=toggle_mic
                    >
                        {move || if recording() { "⏹" } else { "🎤" }}
                    </button>
                </Show>
                <input
                    type="text"
                    placeholder="Type your message in English…"
                    maxlength=MAX_MESSAGE_CHARS.to_string()
                    prop:value=move || input.get()
                    on:input=move |ev| input.set(event_target_value(&ev))
                    on:keydown=on_keydown
                    disabled=is_loading
                />
                <button
                    class="send-btn"
                    on:click=move |_| send()
                    disabled=move || is_loading() || input.with(|t| t.trim().is_empty())
                >
                    {move || if is_loading() { "…" } else { "Send" }}
                </button>
            </div>
        </div>
    }
}
