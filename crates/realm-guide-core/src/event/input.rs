//! Events the host feeds into a tutorial session

use serde::{Deserialize, Serialize};

use crate::spatial::{Point3D, Quaternion, Vector3D};

/// Entry events. Entities are referred to by scene name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    BeginDrag {
        entity: String,
        /// World position at grab time; defaults to the entity's current position
        #[serde(default)]
        position: Option<Point3D>,
        #[serde(default)]
        orientation: Option<Quaternion>,
    },
    /// Cumulative pointer translation since the drag began
    UpdateDrag {
        entity: String,
        translation: Vector3D,
    },
    EndDrag {
        entity: String,
    },
    Tap {
        entity: String,
    },
    CollisionBegin {
        a: String,
        b: String,
    },
    CollisionEnd {
        a: String,
        b: String,
    },
    /// Final text delivered by a host-side recognizer
    RecordingFinalText {
        text: String,
    },
    AdvanceStep,
    GoBackStep,
    Restart,
    PaletteSelection {
        control: String,
        value: String,
    },
    /// Release a step held by an external gate
    UnlockNext,
    /// Show or hide a single entity outside of step visibility
    EntityEnabled {
        entity: String,
        enabled: bool,
    },
}

impl InputEvent {
    pub fn begin_drag(entity: impl Into<String>) -> Self {
        InputEvent::BeginDrag {
            entity: entity.into(),
            position: None,
            orientation: None,
        }
    }

    pub fn update_drag(entity: impl Into<String>, translation: Vector3D) -> Self {
        InputEvent::UpdateDrag {
            entity: entity.into(),
            translation,
        }
    }

    pub fn end_drag(entity: impl Into<String>) -> Self {
        InputEvent::EndDrag {
            entity: entity.into(),
        }
    }

    pub fn tap(entity: impl Into<String>) -> Self {
        InputEvent::Tap {
            entity: entity.into(),
        }
    }

    pub fn select(control: impl Into<String>, value: impl Into<String>) -> Self {
        InputEvent::PaletteSelection {
            control: control.into(),
            value: value.into(),
        }
    }

    /// Short name for logs
    pub fn label(&self) -> &'static str {
        match self {
            InputEvent::BeginDrag { .. } => "begin_drag",
            InputEvent::UpdateDrag { .. } => "update_drag",
            InputEvent::EndDrag { .. } => "end_drag",
            InputEvent::Tap { .. } => "tap",
            InputEvent::CollisionBegin { .. } => "collision_begin",
            InputEvent::CollisionEnd { .. } => "collision_end",
            InputEvent::RecordingFinalText { .. } => "recording_final_text",
            InputEvent::AdvanceStep => "advance_step",
            InputEvent::GoBackStep => "go_back_step",
            InputEvent::Restart => "restart",
            InputEvent::PaletteSelection { .. } => "palette_selection",
            InputEvent::UnlockNext => "unlock_next",
            InputEvent::EntityEnabled { .. } => "entity_enabled",
        }
    }
}
