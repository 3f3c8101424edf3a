//! Scripted, gated tutorial progression

mod action;
mod machine;
mod script;

pub use action::{Gate, GateSignal, StepAction};
pub use machine::{StepEntry, TutorialMachine};
pub use script::{StepScript, TutorialStep};
