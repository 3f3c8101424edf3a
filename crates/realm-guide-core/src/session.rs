//! The tutorial session: owns every engine component and routes entry
//! events through them.
//!
//! Data flows one way: a drag moves the hero, a snap transition is offered
//! to the step machine, a satisfied gate unlocks Next, advancing produces a
//! step entry whose visibility delta is applied to the registry, and the
//! drag engine is then told which entities went away.

use std::time::Duration;

use realm_guide_config::{AppConfig, TutorialConfig};
use uuid::Uuid;

use crate::animation::{AnimationDirector, SequenceLibrary};
use crate::error::{EngineError, Result};
use crate::event::{EngineEvent, EventBus, EventKind, InputEvent, SubscriptionId};
use crate::interaction::{Contact, DragSnapEngine, SnapTransition, TriggerTracker};
use crate::scene::{EntityId, EntityRegistry};
use crate::spatial::{Point3D, Quaternion, Vector3D};
use crate::tutorial::{Gate, GateSignal, StepEntry, StepScript, TutorialMachine};
use crate::visibility::VisibilityTracker;
use crate::voice::{CaptureBackend, Transcript, TranscriptLog, VoiceBridge, VoiceUpdate};

pub struct TutorialSession {
    tutorial: TutorialConfig,
    collision_snapping: bool,
    registry: EntityRegistry,
    engine: DragSnapEngine,
    tracker: TriggerTracker,
    machine: TutorialMachine,
    visibility: VisibilityTracker,
    voice: VoiceBridge,
    transcripts: TranscriptLog,
    animations: AnimationDirector,
    bus: EventBus,
    hero: Option<EntityId>,
    microphone: Option<EntityId>,
}

impl TutorialSession {
    pub fn new(
        config: &AppConfig,
        registry: EntityRegistry,
        script: StepScript,
        backend: Box<dyn CaptureBackend>,
    ) -> Self {
        let hero = registry.id(&config.tutorial.hero);
        if hero.is_none() {
            tracing::warn!("Hero '{}' not found in scene", config.tutorial.hero);
        }
        let microphone = registry.id(&config.tutorial.microphone_hotspot);

        // Managed models that are enabled when the scene loads
        let visible = script
            .managed_names()
            .into_iter()
            .filter(|name| {
                registry
                    .id(name)
                    .and_then(|id| registry.get(id))
                    .map(|e| e.enabled)
                    .unwrap_or(false)
            })
            .collect::<Vec<_>>();

        Self {
            tutorial: config.tutorial.clone(),
            collision_snapping: config.drag.collision_snapping,
            engine: DragSnapEngine::new(config.drag.clone()),
            tracker: TriggerTracker::new(config.drag.trigger_padding),
            machine: TutorialMachine::new(script),
            visibility: VisibilityTracker::seeded(visible),
            voice: VoiceBridge::new(backend),
            transcripts: TranscriptLog::default(),
            animations: AnimationDirector::default(),
            bus: EventBus::new(),
            registry,
            hero,
            microphone,
        }
    }

    pub fn with_sequences(mut self, library: SequenceLibrary) -> Self {
        self.animations = AnimationDirector::new(library);
        self
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &DragSnapEngine {
        &self.engine
    }

    pub fn machine(&self) -> &TutorialMachine {
        &self.machine
    }

    pub fn transcripts(&self) -> &TranscriptLog {
        &self.transcripts
    }

    pub fn animations(&self) -> &AnimationDirector {
        &self.animations
    }

    pub fn current_step_id(&self) -> u32 {
        self.machine.current_id()
    }

    pub fn next_enabled(&self) -> bool {
        self.machine.next_enabled()
    }

    pub fn hero(&self) -> Option<EntityId> {
        self.hero
    }

    pub fn is_capturing(&self) -> bool {
        self.voice.is_capturing()
    }

    pub fn subscribe<F>(&mut self, kinds: &[EventKind], handler: F) -> SubscriptionId
    where
        F: FnMut(&EngineEvent) + Send + 'static,
    {
        self.bus.subscribe(kinds, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Enter the first step
    pub fn start(&mut self) -> Vec<EngineEvent> {
        let mut out = Vec::new();
        match self.machine.entry(1) {
            Ok(entry) => self.apply_entry(0, entry, &mut out),
            Err(err) => tracing::warn!("Cannot start tutorial: {}", err),
        }
        self.finish(out)
    }

    /// Route one entry event; returns everything it caused
    pub fn handle(&mut self, event: InputEvent) -> Vec<EngineEvent> {
        let label = event.label();
        let mut out = Vec::new();
        if let Err(err) = self.dispatch(event, &mut out) {
            if err.is_user_visible() {
                tracing::warn!("{} failed: {}", label, err);
            } else {
                tracing::debug!("Ignoring {}: {}", label, err);
            }
        }
        self.drain_voice(&mut out);
        self.finish(out)
    }

    /// Deliver whatever the capture backend posted since the last call
    pub fn pump_voice(&mut self) -> Vec<EngineEvent> {
        let mut out = Vec::new();
        self.drain_voice(&mut out);
        self.finish(out)
    }

    /// Advance animation playback and pump voice
    pub fn tick(&mut self, dt: Duration) -> Vec<EngineEvent> {
        self.animations.update(dt);
        self.pump_voice()
    }

    fn dispatch(&mut self, event: InputEvent, out: &mut Vec<EngineEvent>) -> Result<()> {
        match event {
            InputEvent::BeginDrag {
                entity,
                position,
                orientation,
            } => {
                let id = self.registry.require(&entity)?;
                self.begin_drag(id, position, orientation)
            }
            InputEvent::UpdateDrag {
                entity,
                translation,
            } => {
                let id = self.registry.require(&entity)?;
                self.update_drag(id, translation, out)
            }
            InputEvent::EndDrag { entity } => {
                let id = self.registry.require(&entity)?;
                self.engine.end_drag(&mut self.registry, id)
            }
            InputEvent::Tap { entity } => {
                let id = self.registry.require(&entity)?;
                self.tap(id, out)
            }
            InputEvent::CollisionBegin { a, b } => {
                let (a, b) = (self.registry.require(&a)?, self.registry.require(&b)?);
                if let Some(t) = self.engine.collision_begin(&mut self.registry, a, b) {
                    self.emit_snap(t, out);
                }
                Ok(())
            }
            InputEvent::CollisionEnd { a, b } => {
                let (a, b) = (self.registry.require(&a)?, self.registry.require(&b)?);
                if let Some(t) = self.engine.collision_end(&mut self.registry, a, b) {
                    self.emit_snap(t, out);
                }
                Ok(())
            }
            InputEvent::RecordingFinalText { text } => {
                let transcript = Transcript::new(Uuid::nil(), text);
                self.finalize_transcript(transcript, out);
                Ok(())
            }
            InputEvent::AdvanceStep => self.advance(out),
            InputEvent::GoBackStep => {
                let from = self.machine.current_id();
                let entry = self.machine.go_back()?;
                self.apply_entry(from, entry, out);
                Ok(())
            }
            InputEvent::Restart => self.restart(out),
            InputEvent::PaletteSelection { control, value } => {
                tracing::info!("Palette selection {} = {}", control, value);
                self.offer(GateSignal::Selected { control, value }, out)
            }
            InputEvent::UnlockNext => {
                let gate = self.machine.unlock()?;
                self.gate_satisfied(gate, out);
                Ok(())
            }
            InputEvent::EntityEnabled { entity, enabled } => {
                let id = self.registry.require(&entity)?;
                if !self.registry.set_enabled(id, enabled) {
                    return Ok(());
                }
                // Managed models stay under step control from here on
                if self.machine.script().managed_names().contains(&entity) {
                    self.visibility.set_visible(&entity, enabled);
                }
                if !enabled {
                    self.release_disabled(out);
                }
                Ok(())
            }
        }
    }

    fn begin_drag(
        &mut self,
        id: EntityId,
        position: Option<Point3D>,
        orientation: Option<Quaternion>,
    ) -> Result<()> {
        let entity = self
            .registry
            .get(id)
            .ok_or_else(|| EngineError::UnknownEntity(format!("#{}", id.index())))?;
        let position = position.unwrap_or(entity.position);
        let orientation = orientation.unwrap_or(entity.orientation);
        self.engine
            .begin_drag(&self.registry, id, position, orientation)
    }

    fn update_drag(
        &mut self,
        id: EntityId,
        translation: Vector3D,
        out: &mut Vec<EngineEvent>,
    ) -> Result<()> {
        if let Some(t) = self.engine.update_drag(&mut self.registry, id, translation)? {
            self.emit_snap(t, out);
        }

        if self.collision_snapping {
            for contact in self.tracker.update(&self.registry, id) {
                let transition = match contact {
                    Contact::Began { draggable, target } => {
                        self.engine
                            .collision_begin(&mut self.registry, draggable, target)
                    }
                    Contact::Ended { draggable, target } => {
                        self.engine.collision_end(&mut self.registry, draggable, target)
                    }
                };
                if let Some(t) = transition {
                    self.emit_snap(t, out);
                }
            }
        }
        Ok(())
    }

    fn tap(&mut self, id: EntityId, out: &mut Vec<EngineEvent>) -> Result<()> {
        let Some(hotspot) = self
            .registry
            .resolve_hotspot(id)
            .filter(|&h| self.registry.is_active(h))
        else {
            tracing::debug!(
                "Tap on {} hit no active hotspot",
                self.registry.name(id).unwrap_or_default()
            );
            return Ok(());
        };

        if Some(hotspot) == self.microphone {
            self.toggle_capture(out);
            return Ok(());
        }

        let name = self.registry.name(hotspot).unwrap_or_default().to_string();
        tracing::info!("Tapped {}", name);
        self.offer(GateSignal::Tapped(name), out)
    }

    fn toggle_capture(&mut self, out: &mut Vec<EngineEvent>) {
        if self.voice.is_capturing() {
            if let Some(session) = self.voice.stop_capture() {
                out.push(EngineEvent::CaptureStopped { session });
            }
            return;
        }

        match self.voice.start_capture() {
            Ok(session) => out.push(EngineEvent::CaptureStarted { session }),
            Err(err) => {
                tracing::warn!("Could not start capture: {}", err);
                out.push(EngineEvent::CaptureFailed {
                    reason: err.to_string(),
                });
            }
        }
    }

    fn drain_voice(&mut self, out: &mut Vec<EngineEvent>) {
        while let Some(update) = self.voice.try_next() {
            match update {
                VoiceUpdate::Interim { session, text } => {
                    out.push(EngineEvent::TranscriptInterim { session, text })
                }
                VoiceUpdate::Final(transcript) => self.finalize_transcript(transcript, out),
                VoiceUpdate::Failed { reason, .. } => {
                    out.push(EngineEvent::CaptureFailed { reason })
                }
            }
        }
    }

    fn finalize_transcript(&mut self, transcript: Transcript, out: &mut Vec<EngineEvent>) {
        tracing::info!("Transcript: {}", transcript.text);
        self.transcripts.push(transcript.clone());
        out.push(EngineEvent::TranscriptFinal(transcript));
        if let Err(err) = self.offer(GateSignal::RecordingComplete, out) {
            tracing::debug!("Recording not gated here: {}", err);
        }
    }

    /// Offer a signal to the pending gate
    fn offer(&mut self, signal: GateSignal, out: &mut Vec<EngineEvent>) -> Result<()> {
        let gate = self.machine.satisfy(&signal)?;
        self.gate_satisfied(gate, out);
        Ok(())
    }

    fn gate_satisfied(&mut self, gate: Gate, out: &mut Vec<EngineEvent>) {
        self.push_satisfied(gate, out);
        if self.tutorial.auto_advance {
            if let Err(err) = self.advance(out) {
                tracing::debug!("Auto-advance stopped: {}", err);
            }
        }
    }

    fn push_satisfied(&self, gate: Gate, out: &mut Vec<EngineEvent>) {
        out.push(EngineEvent::GateSatisfied {
            step: self.machine.current_id(),
            gate,
        });
    }

    fn advance(&mut self, out: &mut Vec<EngineEvent>) -> Result<()> {
        let from = self.machine.current_id();
        let entry = self.machine.advance()?;
        self.apply_entry(from, entry, out);
        Ok(())
    }

    fn restart(&mut self, out: &mut Vec<EngineEvent>) -> Result<()> {
        let from = self.machine.current_id();
        let entry = self.machine.restart()?;

        for t in self.engine.reset(&mut self.registry) {
            self.emit_transition(t, out);
        }
        self.registry.reset_positions();
        self.tracker.clear();
        self.voice.cancel();
        self.transcripts.clear();
        self.animations.stop_all();
        tracing::info!("Tutorial restarted from step {}", from);

        out.push(EngineEvent::Restarted);
        self.apply_entry(from, entry, out);
        Ok(())
    }

    fn apply_entry(&mut self, from: u32, entry: StepEntry, out: &mut Vec<EngineEvent>) {
        let announced = out.len();
        out.push(EngineEvent::StepChanged {
            from,
            to: entry.step_id,
            next_enabled: self.machine.next_enabled(),
        });

        let delta = self.visibility.apply(&entry.visible);
        for name in &delta.hide {
            if let Some(id) = self.registry.id(name) {
                self.registry.set_enabled(id, false);
            }
        }
        for name in &delta.show {
            if let Some(id) = self.registry.id(name) {
                self.registry.set_enabled(id, true);
            }
        }
        if !delta.hide.is_empty() {
            out.push(EngineEvent::HideModels { names: delta.hide });
        }
        if !delta.show.is_empty() {
            out.push(EngineEvent::ShowModels { names: delta.show });
        }
        self.release_disabled(out);

        for (entity, sequence) in &entry.animations {
            match self.animations.play(entity, sequence) {
                Ok(cue) => out.push(EngineEvent::PlayAnimation {
                    entity: cue.entity,
                    sequence: cue.sequence,
                    clips: cue.clips,
                }),
                Err(err) => tracing::warn!("Step {}: {}", entry.step_id, err),
            }
        }

        if entry.open_palette {
            out.push(EngineEvent::OpenPalette {
                step: entry.step_id,
            });
        }

        if let Gate::RequireSnapTo(target) = &entry.gate {
            self.settle_hero(target, out);
        }

        // Report Next as it stands once the entry has fully settled
        let settled = self.machine.next_enabled();
        if let Some(EngineEvent::StepChanged { next_enabled, .. }) = out.get_mut(announced) {
            *next_enabled = settled;
        }
    }

    /// Satisfy a placement gate at once if the hero already rests on its
    /// target. Never auto-advances: the user just arrived at this step.
    fn settle_hero(&mut self, target: &str, out: &mut Vec<EngineEvent>) {
        let (Some(hero), Some(target_id)) = (self.hero, self.registry.id(target)) else {
            return;
        };
        if self.engine.targeted_entity() == Some(hero) {
            return;
        }

        if self.engine.snapped_target(hero) != Some(target_id) {
            let resting = match (self.registry.position(hero), self.registry.position(target_id)) {
                (Some(h), Some(t)) => {
                    h.distance(&t) < self.engine.snap_radius(&self.registry, target_id)
                }
                _ => false,
            };
            if !resting {
                return;
            }
            match self.engine.collision_begin(&mut self.registry, hero, target_id) {
                Some(t) => self.emit_transition(t, out),
                None => return,
            }
        }

        match self.machine.satisfy(&GateSignal::Snapped(target.to_string())) {
            Ok(gate) => self.push_satisfied(gate, out),
            Err(err) => tracing::debug!("Resting hero not accepted: {}", err),
        }
    }

    fn release_disabled(&mut self, out: &mut Vec<EngineEvent>) {
        for t in self.engine.on_entities_disabled(&mut self.registry) {
            self.emit_transition(t, out);
        }
    }

    fn emit_transition(&self, t: SnapTransition, out: &mut Vec<EngineEvent>) {
        let name = |id: Option<EntityId>| {
            id.and_then(|id| self.registry.name(id))
                .map(str::to_string)
        };
        if let Some(to) = t.to {
            tracing::info!(
                "{} snapped to {}",
                self.registry.name(t.entity).unwrap_or_default(),
                self.registry.name(to).unwrap_or_default()
            );
        }
        out.push(EngineEvent::SnapChanged {
            entity: name(Some(t.entity)).unwrap_or_default(),
            from: name(t.from),
            to: name(t.to),
        });
    }

    /// Emit a transition and offer hero placements to the step machine
    fn emit_snap(&mut self, t: SnapTransition, out: &mut Vec<EngineEvent>) {
        self.emit_transition(t, out);
        if Some(t.entity) != self.hero {
            return;
        }
        let Some(target) = t.to.and_then(|id| self.registry.name(id)).map(str::to_string) else {
            return;
        };
        if let Err(err) = self.offer(GateSignal::Snapped(target), out) {
            tracing::debug!("Snap not gated here: {}", err);
        }
    }

    fn finish(&mut self, out: Vec<EngineEvent>) -> Vec<EngineEvent> {
        for event in &out {
            self.bus.publish(event);
        }
        out
    }
}

impl std::fmt::Debug for TutorialSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutorialSession")
            .field("step", &self.machine.current_id())
            .field("pending", self.machine.pending_gate())
            .field("capturing", &self.voice.is_capturing())
            .finish()
    }
}
