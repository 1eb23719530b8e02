//! Microphone state for speech-mode input. The recognizer itself is a
//! platform capability behind [`SpeechCapture`].

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    Transcript(String),
    Error(String),
    Ended,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Speech recognition is not supported here")]
    Unsupported,

    #[error("Speech recognition failed to start: {0}")]
    StartFailed(String),
}

pub trait SpeechCapture {
    fn is_supported(&self) -> bool;
    fn start_listening(&mut self) -> Result<(), SpeechError>;
    fn stop_listening(&mut self);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MicState {
    pub recording: bool,
}

impl MicState {
    /// Starts or stops listening. Starting is refused while a reply is
    /// pending.
    pub fn toggle(&mut self, capture: &mut dyn SpeechCapture, is_loading: bool) -> Result<(), SpeechError> {
        if self.recording {
            capture.stop_listening();
            self.recording = false;
            return Ok(());
        }
        if !capture.is_supported() {
            return Err(SpeechError::Unsupported);
        }
        if is_loading {
            return Ok(());
        }
        self.recording = true;
        if let Err(e) = capture.start_listening() {
            warn!("{e}");
            self.recording = false;
            return Err(e);
        }
        Ok(())
    }

    /// Folds a recognizer event into the state. A transcript is handed back
    /// for the input box; it is not submitted.
    pub fn apply(&mut self, event: SpeechEvent) -> Option<String> {
        match event {
            SpeechEvent::Transcript(text) => Some(text),
            SpeechEvent::Error(reason) => {
                warn!("Speech recognition error: {reason}");
                self.recording = false;
                None
            }
            SpeechEvent::Ended => {
                self.recording = false;
                None
            }
        }
    }

    pub fn title(&self, supported: bool, is_loading: bool) -> &'static str {
        if !supported {
            "Speech recognition not supported in your browser"
        } else if is_loading {
            "Cannot record while AI is thinking"
        } else if self.recording {
            "Stop recording"
        } else {
            "Start recording"
        }
    }
}
