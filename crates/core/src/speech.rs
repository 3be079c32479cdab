//! Reading stop descriptions aloud through the host's speech synthesizer.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::SpeechError;

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: u64,
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Platform text-to-speech. The host reports the end of an utterance, or
/// its failure, back through [`SpeechController::on_end`] and
/// [`SpeechController::on_error`].
pub trait SpeechEngine: Send + Sync {
    fn is_supported(&self) -> bool;
    fn speak(&self, utterance: Utterance);
    fn cancel(&self);
    fn is_speaking(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechState {
    Idle,
    Speaking { utterance: u64 },
}

/// Visibility of the play/stop controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeechButtons {
    pub speak_visible: bool,
    pub stop_visible: bool,
    pub speaking: bool,
}

impl SpeechButtons {
    pub fn render(state: SpeechState, supported: bool) -> Self {
        match (supported, state) {
            (false, _) => Self {
                speak_visible: false,
                stop_visible: false,
                speaking: false,
            },
            (true, SpeechState::Idle) => Self {
                speak_visible: true,
                stop_visible: false,
                speaking: false,
            },
            (true, SpeechState::Speaking { .. }) => Self {
                speak_visible: false,
                stop_visible: true,
                speaking: true,
            },
        }
    }
}

pub struct SpeechController {
    engine: Arc<dyn SpeechEngine>,
    state: SpeechState,
    next_utterance: u64,
    rate: f32,
    pitch: f32,
    volume: f32,
}

impl SpeechController {
    pub fn new(engine: Arc<dyn SpeechEngine>, rate: f32, pitch: f32, volume: f32) -> Self {
        Self {
            engine,
            state: SpeechState::Idle,
            next_utterance: 0,
            rate,
            pitch,
            volume,
        }
    }

    pub fn state(&self) -> SpeechState {
        self.state
    }

    pub fn buttons(&self) -> SpeechButtons {
        SpeechButtons::render(self.state, self.engine.is_supported())
    }

    /// Starts reading `text`, cancelling whatever is being read. Blank text
    /// leaves the controller idle.
    pub fn speak(&mut self, text: Option<&str>) -> Result<u64, SpeechError> {
        if !self.engine.is_supported() {
            return Err(SpeechError::Unsupported);
        }
        let text = text
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or(SpeechError::EmptyText)?;

        if let SpeechState::Speaking { utterance } = self.state {
            debug!(utterance, "cancelling previous utterance");
            self.engine.cancel();
        }

        let id = self.next_utterance;
        self.next_utterance += 1;
        self.engine.speak(Utterance {
            id,
            text: text.to_owned(),
            rate: self.rate,
            pitch: self.pitch,
            volume: self.volume,
        });
        self.state = SpeechState::Speaking { utterance: id };
        Ok(id)
    }

    pub fn stop(&mut self) {
        if self.engine.is_speaking() {
            self.engine.cancel();
        }
        self.reset();
    }

    /// Back to idle without touching the engine.
    pub fn reset(&mut self) {
        self.state = SpeechState::Idle;
    }

    pub fn on_end(&mut self, utterance: u64) {
        if self.is_current(utterance) {
            self.reset();
        }
    }

    /// Returns the error to surface, or `None` if the failing utterance had
    /// already been superseded.
    pub fn on_error(&mut self, utterance: u64, message: String) -> Option<SpeechError> {
        if !self.is_current(utterance) {
            return None;
        }
        warn!(utterance, %message, "speech synthesis failed");
        self.reset();
        Some(SpeechError::Synthesis(message))
    }

    fn is_current(&self, utterance: u64) -> bool {
        self.state == SpeechState::Speaking { utterance }
    }
}
