//! The linear, gated tutorial state machine

use std::collections::BTreeSet;

use super::{Gate, GateSignal, StepScript};
use crate::error::{EngineError, Result};

/// Everything a collaborator needs to apply on entering a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepEntry {
    pub step_id: u32,
    pub visible: BTreeSet<String>,
    /// (entity, sequence) pairs to start
    pub animations: Vec<(String, String)>,
    pub open_palette: bool,
    pub gate: Gate,
}

/// Tracks the current step and its pending gate.
///
/// Next is enabled exactly when no gate is pending. Entering a step (by
/// advancing, going back or restarting) always re-arms that step's gate.
#[derive(Debug)]
pub struct TutorialMachine {
    script: StepScript,
    current: u32,
    pending: Gate,
}

impl TutorialMachine {
    pub fn new(script: StepScript) -> Self {
        let pending = script.step(1).map(|s| s.gate()).unwrap_or_default();
        Self {
            script,
            current: 1,
            pending,
        }
    }

    pub fn script(&self) -> &StepScript {
        &self.script
    }

    pub fn current_id(&self) -> u32 {
        self.current
    }

    pub fn current_step(&self) -> Option<&super::TutorialStep> {
        self.script.step(self.current)
    }

    pub fn pending_gate(&self) -> &Gate {
        &self.pending
    }

    pub fn next_enabled(&self) -> bool {
        !self.pending.is_pending() && !self.is_terminal()
    }

    pub fn is_terminal(&self) -> bool {
        self.current >= self.script.last_id()
    }

    /// Effects of entering `id`, computed from the script alone
    pub fn entry(&self, id: u32) -> Result<StepEntry> {
        let step = self
            .script
            .step(id)
            .ok_or(EngineError::StepIndexOutOfRange(id))?;
        Ok(StepEntry {
            step_id: id,
            visible: self.script.visible_set(id),
            animations: step
                .animations()
                .map(|(e, s)| (e.to_string(), s.to_string()))
                .collect(),
            open_palette: step.opens_palette(),
            gate: step.gate(),
        })
    }

    pub fn advance(&mut self) -> Result<StepEntry> {
        if self.is_terminal() {
            return Err(EngineError::StepIndexOutOfRange(self.current + 1));
        }
        if self.pending.is_pending() {
            return Err(EngineError::GateLocked(self.pending.to_string()));
        }
        self.enter(self.current + 1)
    }

    pub fn go_back(&mut self) -> Result<StepEntry> {
        if self.current <= 1 {
            return Err(EngineError::StepIndexOutOfRange(0));
        }
        self.enter(self.current - 1)
    }

    pub fn restart(&mut self) -> Result<StepEntry> {
        self.enter(1)
    }

    /// Offer a signal to the pending gate; returns the gate it satisfied
    pub fn satisfy(&mut self, signal: &GateSignal) -> Result<Gate> {
        if !self.pending.accepts(signal) {
            return Err(EngineError::StaleGateEvent {
                pending: self.pending.to_string(),
                received: signal.to_string(),
            });
        }
        tracing::info!("Step {} gate satisfied: {}", self.current, signal);
        Ok(std::mem::take(&mut self.pending))
    }

    /// Release an externally held gate
    pub fn unlock(&mut self) -> Result<Gate> {
        if self.pending != Gate::External {
            return Err(EngineError::GateLocked(self.pending.to_string()));
        }
        tracing::info!("Step {} unlocked externally", self.current);
        Ok(std::mem::take(&mut self.pending))
    }

    fn enter(&mut self, id: u32) -> Result<StepEntry> {
        let entry = self.entry(id)?;
        self.current = id;
        self.pending = entry.gate.clone();
        tracing::info!("Entered step {} (gate: {})", id, self.pending);
        Ok(entry)
    }
}
