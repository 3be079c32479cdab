//! Platform capabilities implemented on the Kotlin/Swift side.

use std::sync::Arc;

use itinerary_map_core::speech::{SpeechEngine, Utterance};

use crate::records::LocateRequestRecord;

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct UtteranceRecord {
    pub id: u64,
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl From<Utterance> for UtteranceRecord {
    fn from(value: Utterance) -> Self {
        Self {
            id: value.id,
            text: value.text,
            rate: value.rate,
            pitch: value.pitch,
            volume: value.volume,
        }
    }
}

/// Text-to-speech of the host platform.
///
/// When an utterance finishes or fails the host must call
/// `MapSession::speech_ended` or `MapSession::speech_failed` with its id.
#[uniffi::export(with_foreign)]
pub trait SpeechSynthesizer: Send + Sync {
    fn is_supported(&self) -> bool;
    fn speak(&self, utterance: UtteranceRecord);
    fn cancel(&self);
    fn is_speaking(&self) -> bool;
}

/// Positioning of the host platform.
///
/// `request_position` only starts the lookup. The result comes back through
/// `MapSession::location_found` or `MapSession::location_failed`.
#[uniffi::export(with_foreign)]
pub trait LocationProvider: Send + Sync {
    fn is_supported(&self) -> bool;
    fn request_position(&self, request: LocateRequestRecord);
}

pub(crate) struct HostSpeech {
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl HostSpeech {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { synthesizer }
    }
}

impl SpeechEngine for HostSpeech {
    fn is_supported(&self) -> bool {
        self.synthesizer.is_supported()
    }

    fn speak(&self, utterance: Utterance) {
        self.synthesizer.speak(utterance.into());
    }

    fn cancel(&self) {
        self.synthesizer.cancel();
    }

    fn is_speaking(&self) -> bool {
        self.synthesizer.is_speaking()
    }
}
