//! Voice capture: backends post from any thread, the bridge drains on ours

mod backend;
mod bridge;
mod transcript;

pub use backend::{
    CaptureBackend, CaptureEvent, CaptureEventKind, CaptureSink, NullCaptureBackend,
    ScriptedCaptureBackend,
};
pub use bridge::{VoiceBridge, VoiceUpdate};
pub use transcript::{Transcript, TranscriptLog};
