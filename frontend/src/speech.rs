use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use tutor_core::speech::{SpeechCapture, SpeechError, SpeechEvent};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

type Handler = Closure<dyn FnMut(JsValue)>;

/// Browser speech recognition (`SpeechRecognition` or the webkit-prefixed
/// constructor), English, one utterance per start.
pub struct WebSpeech {
    recognition: Option<JsValue>,
    _handlers: Vec<Handler>,
}

fn constructor() -> Option<Function> {
    let window = web_sys::window()?;
    ["SpeechRecognition", "webkitSpeechRecognition"]
        .into_iter()
        .filter_map(|name| Reflect::get(&window, &JsValue::from_str(name)).ok())
        .find(|value| value.is_function())
        .map(|value| value.unchecked_into())
}

fn prop(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key)).ok()
}

/// `event.results[0][0].transcript`
fn first_transcript(event: &JsValue) -> Option<String> {
    let results = prop(event, "results")?;
    let result = Reflect::get_u32(&results, 0).ok()?;
    let alternative = Reflect::get_u32(&result, 0).ok()?;
    prop(&alternative, "transcript")?.as_string()
}

fn call(target: &JsValue, method: &str) -> Result<JsValue, JsValue> {
    let func: Function = Reflect::get(target, &JsValue::from_str(method))?.dyn_into()?;
    func.call0(target)
}

impl WebSpeech {
    pub fn new(on_event: impl Fn(SpeechEvent) + 'static) -> Self {
        let Some(recognition) = constructor().and_then(|ctor| Reflect::construct(&ctor, &Array::new()).ok()) else {
            return Self { recognition: None, _handlers: Vec::new() };
        };

        let settings: [(&str, JsValue); 3] = [
            ("lang", JsValue::from_str("en-US")),
            ("continuous", JsValue::FALSE),
            ("interimResults", JsValue::FALSE),
        ];
        for (key, value) in settings {
            if let Err(e) = Reflect::set(&recognition, &JsValue::from_str(key), &value) {
                log::warn!("Failed to set recognizer {key}: {e:?}");
            }
        }

        let on_event: Rc<dyn Fn(SpeechEvent)> = Rc::new(on_event);

        let emit = on_event.clone();
        let on_result = Handler::new(move |event: JsValue| {
            if let Some(text) = first_transcript(&event) {
                emit(SpeechEvent::Transcript(text));
            }
        });

        let emit = on_event.clone();
        let on_error = Handler::new(move |event: JsValue| {
            let reason = prop(&event, "error")
                .and_then(|v| v.as_string())
                .unwrap_or_else(|| "unknown".to_string());
            emit(SpeechEvent::Error(reason));
        });

        let emit = on_event;
        let on_end = Handler::new(move |_event: JsValue| emit(SpeechEvent::Ended));

        for (key, handler) in [("onresult", &on_result), ("onerror", &on_error), ("onend", &on_end)] {
            if let Err(e) = Reflect::set(&recognition, &JsValue::from_str(key), handler.as_ref()) {
                log::warn!("Failed to attach recognizer {key}: {e:?}");
            }
        }

        Self {
            recognition: Some(recognition),
            _handlers: vec![on_result, on_error, on_end],
        }
    }
}

impl SpeechCapture for WebSpeech {
    fn is_supported(&self) -> bool {
        self.recognition.is_some()
    }

    fn start_listening(&mut self) -> Result<(), SpeechError> {
        let recognition = self.recognition.as_ref().ok_or(SpeechError::Unsupported)?;
        call(recognition, "start")
            .map(|_| ())
            .map_err(|e| SpeechError::StartFailed(format!("{e:?}")))
    }

    fn stop_listening(&mut self) {
        if let Some(recognition) = &self.recognition {
            if let Err(e) = call(recognition, "stop") {
                log::warn!("Failed to stop recognizer: {e:?}");
            }
        }
    }
}

impl Drop for WebSpeech {
    fn drop(&mut self) {
        if let Some(recognition) = &self.recognition {
            if let Err(e) = call(recognition, "abort") {
                log::debug!("Failed to abort recognizer: {e:?}");
            }
        }
    }
}
