//! Events a tutorial session emits

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tutorial::Gate;
use crate::voice::Transcript;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    ShowModels {
        names: Vec<String>,
    },
    HideModels {
        names: Vec<String>,
    },
    SnapChanged {
        entity: String,
        from: Option<String>,
        to: Option<String>,
    },
    GateSatisfied {
        step: u32,
        gate: Gate,
    },
    StepChanged {
        from: u32,
        to: u32,
        next_enabled: bool,
    },
    PlayAnimation {
        entity: String,
        sequence: String,
        clips: Vec<String>,
    },
    OpenPalette {
        step: u32,
    },
    /// Collaborators should dismiss transient surfaces
    Restarted,
    CaptureStarted {
        session: Uuid,
    },
    CaptureStopped {
        session: Uuid,
    },
    TranscriptInterim {
        session: Uuid,
        text: String,
    },
    TranscriptFinal(Transcript),
    CaptureFailed {
        reason: String,
    },
}

/// Discriminant of [`EngineEvent`], used to filter subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ShowModels,
    HideModels,
    SnapChanged,
    GateSatisfied,
    StepChanged,
    PlayAnimation,
    OpenPalette,
    Restarted,
    CaptureStarted,
    CaptureStopped,
    TranscriptInterim,
    TranscriptFinal,
    CaptureFailed,
}

impl EngineEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            EngineEvent::ShowModels { .. } => EventKind::ShowModels,
            EngineEvent::HideModels { .. } => EventKind::HideModels,
            EngineEvent::SnapChanged { .. } => EventKind::SnapChanged,
            EngineEvent::GateSatisfied { .. } => EventKind::GateSatisfied,
            EngineEvent::StepChanged { .. } => EventKind::StepChanged,
            EngineEvent::PlayAnimation { .. } => EventKind::PlayAnimation,
            EngineEvent::OpenPalette { .. } => EventKind::OpenPalette,
            EngineEvent::Restarted => EventKind::Restarted,
            EngineEvent::CaptureStarted { .. } => EventKind::CaptureStarted,
            EngineEvent::CaptureStopped { .. } => EventKind::CaptureStopped,
            EngineEvent::TranscriptInterim { .. } => EventKind::TranscriptInterim,
            EngineEvent::TranscriptFinal(_) => EventKind::TranscriptFinal,
            EngineEvent::CaptureFailed { .. } => EventKind::CaptureFailed,
        }
    }
}
