//! Step actions, gates and the signals that satisfy them

use std::fmt;

use serde::{Deserialize, Serialize};

/// Something a step does on entry, or requires before Next unlocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepAction {
    /// Exactly these managed models are visible from this step on
    ShowModels { names: Vec<String> },
    PlayAnimation { entity: String, sequence: String },
    OpenPalette,
    /// Lock Next until something outside the engine calls `unlock`
    DisableNextButton,
    RequireSnapTo { target: String },
    RequireRecording,
    RequireTap { hotspot: String },
    RequireSelection { control: String, value: String },
}

impl StepAction {
    pub fn show_models<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StepAction::ShowModels {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn play_animation(entity: impl Into<String>, sequence: impl Into<String>) -> Self {
        StepAction::PlayAnimation {
            entity: entity.into(),
            sequence: sequence.into(),
        }
    }

    pub fn require_snap_to(target: impl Into<String>) -> Self {
        StepAction::RequireSnapTo {
            target: target.into(),
        }
    }

    pub fn require_tap(hotspot: impl Into<String>) -> Self {
        StepAction::RequireTap {
            hotspot: hotspot.into(),
        }
    }

    pub fn require_selection(control: impl Into<String>, value: impl Into<String>) -> Self {
        StepAction::RequireSelection {
            control: control.into(),
            value: value.into(),
        }
    }

    /// The gate this action imposes, if it is a gate action
    pub fn gate(&self) -> Option<Gate> {
        match self {
            StepAction::DisableNextButton => Some(Gate::External),
            StepAction::RequireSnapTo { target } => Some(Gate::RequireSnapTo(target.clone())),
            StepAction::RequireRecording => Some(Gate::RequireRecordingComplete),
            StepAction::RequireTap { hotspot } => Some(Gate::RequireTap(hotspot.clone())),
            StepAction::RequireSelection { control, value } => Some(Gate::RequireSelection {
                control: control.clone(),
                value: value.clone(),
            }),
            _ => None,
        }
    }
}

/// Condition that must hold before a step's Next unlocks
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gate {
    #[default]
    None,
    RequireSnapTo(String),
    RequireRecordingComplete,
    RequireTap(String),
    RequireSelection { control: String, value: String },
    /// Released only by an explicit unlock
    External,
}

impl Gate {
    pub fn is_pending(&self) -> bool {
        !matches!(self, Gate::None)
    }

    /// Whether `signal` satisfies this gate
    pub fn accepts(&self, signal: &GateSignal) -> bool {
        match (self, signal) {
            (Gate::RequireSnapTo(want), GateSignal::Snapped(got)) => want == got,
            (Gate::RequireRecordingComplete, GateSignal::RecordingComplete) => true,
            (Gate::RequireTap(want), GateSignal::Tapped(got)) => want == got,
            (
                Gate::RequireSelection { control, value },
                GateSignal::Selected {
                    control: got_control,
                    value: got_value,
                },
            ) => control == got_control && value == got_value,
            _ => false,
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::None => write!(f, "none"),
            Gate::RequireSnapTo(target) => write!(f, "snap to {}", target),
            Gate::RequireRecordingComplete => write!(f, "recording complete"),
            Gate::RequireTap(hotspot) => write!(f, "tap {}", hotspot),
            Gate::RequireSelection { control, value } => write!(f, "select {} = {}", control, value),
            Gate::External => write!(f, "external unlock"),
        }
    }
}

/// An observed user achievement, offered to the pending gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateSignal {
    Snapped(String),
    RecordingComplete,
    Tapped(String),
    Selected { control: String, value: String },
}

impl fmt::Display for GateSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateSignal::Snapped(target) => write!(f, "snapped to {}", target),
            GateSignal::RecordingComplete => write!(f, "recording complete"),
            GateSignal::Tapped(hotspot) => write!(f, "tapped {}", hotspot),
            GateSignal::Selected { control, value } => write!(f, "selected {} = {}", control, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_accepts_matching_signal_only() {
        let gate = Gate::RequireSnapTo("Indicator8".to_string());
        assert!(gate.accepts(&GateSignal::Snapped("Indicator8".to_string())));
        assert!(!gate.accepts(&GateSignal::Snapped("Indicator14".to_string())));
        assert!(!gate.accepts(&GateSignal::RecordingComplete));
        assert!(!Gate::External.accepts(&GateSignal::RecordingComplete));
    }

    #[test]
    fn test_action_serde_shape() {
        let action: StepAction =
            toml::from_str("type = \"require_snap_to\"\ntarget = \"Indicator8\"").unwrap();
        assert_eq!(action, StepAction::require_snap_to("Indicator8"));
        assert_eq!(
            action.gate(),
            Some(Gate::RequireSnapTo("Indicator8".to_string()))
        );
        assert_eq!(StepAction::OpenPalette.gate(), None);
    }
}
