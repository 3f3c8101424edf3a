//! Interactive terminal front-end
//!
//! Keys are drained on every tick, the session advances animation and voice,
//! and the whole dashboard is redrawn as plain text lines.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event as CrosstermEvent},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use realm_guide_core::interaction::DragPhase;
use realm_guide_core::{EngineEvent, InputEvent, TutorialSession};

use crate::content::{plain, step_text};
use crate::simulator::{KeyAction, KeySimulator};

const RECENT_EVENTS: usize = 8;

const HELP: &str = "space grab/release  arrows/pgup/pgdn move  enter next  b back  m mic  \
                    l lightbulb  g genre  p story shape  u unlock  r restart  esc quit";

/// What the dashboard shows besides the session itself
#[derive(Debug, Default)]
pub struct Dashboard {
    recent: VecDeque<String>,
    interim: Option<String>,
}

impl Dashboard {
    pub fn record(&mut self, events: &[EngineEvent]) {
        for event in events {
            match event {
                EngineEvent::TranscriptInterim { text, .. } => {
                    self.interim = Some(text.clone());
                    continue;
                }
                EngineEvent::TranscriptFinal(_)
                | EngineEvent::CaptureFailed { .. }
                | EngineEvent::Restarted => self.interim = None,
                _ => {}
            }
            if self.recent.len() == RECENT_EVENTS {
                self.recent.pop_front();
            }
            self.recent.push_back(describe(event));
        }
    }

    pub fn lines(&self, session: &TutorialSession) -> Vec<String> {
        let step = session.current_step_id();
        let last = session.machine().script().last_id();
        let mut lines = Vec::new();

        match step_text(step) {
            Some(text) => {
                lines.push(format!("[{}] {}", text.header, plain(text.message)));
            }
            None => lines.push(String::from("[?]")),
        }
        let gate = session.machine().pending_gate();
        lines.push(format!(
            "Step {}/{}  Next: {}{}",
            step,
            last,
            if session.next_enabled() { "enabled" } else { "locked" },
            if gate.is_pending() {
                format!("  (waiting: {})", gate)
            } else {
                String::new()
            }
        ));
        lines.push(String::new());

        let registry = session.registry();
        if let Some(hero) = session.hero() {
            let position = registry.position(hero).unwrap_or_default();
            let snapped = session
                .engine()
                .snapped_target(hero)
                .and_then(|id| registry.name(id))
                .unwrap_or("-");
            let name = registry.name(hero).unwrap_or_default();
            let grabbed = matches!(session.engine().phase(hero), DragPhase::Dragging { .. });
            lines.push(format!(
                "Hero {} at ({:.2}, {:.2}, {:.2})  snapped: {}{}{}",
                name,
                position.x,
                position.y,
                position.z,
                snapped,
                if grabbed { "  [grabbed]" } else { "" },
                session
                    .animations()
                    .current_clip(name)
                    .map(|clip| format!("  playing {}", clip))
                    .unwrap_or_default()
            ));
        }

        let visible: Vec<String> = session
            .machine()
            .script()
            .managed_names()
            .into_iter()
            .filter(|name| registry.id(name).is_some_and(|id| registry.is_active(id)))
            .collect();
        lines.push(format!(
            "Visible: {}",
            if visible.is_empty() {
                String::from("-")
            } else {
                visible.join(", ")
            }
        ));

        let capture = if session.is_capturing() { "listening" } else { "idle" };
        match &self.interim {
            Some(text) => lines.push(format!("Mic: {}  \"{}\"", capture, text)),
            None => lines.push(format!("Mic: {}", capture)),
        }
        for transcript in session.transcripts().entries() {
            lines.push(format!(
                "  {} {}",
                transcript.at.format("%H:%M:%S"),
                transcript.text
            ));
        }
        if session.transcripts().len() > 1 {
            lines.push(format!("Story: {}", session.transcripts().story()));
        }
        lines.push(String::new());

        lines.push(String::from("Recent:"));
        lines.extend(self.recent.iter().map(|line| format!("  {}", line)));
        lines.push(String::new());
        lines.push(HELP.to_string());
        lines
    }
}

/// One-line summary of an emitted event
pub fn describe(event: &EngineEvent) -> String {
    match event {
        EngineEvent::ShowModels { names } => format!("show {}", names.join(", ")),
        EngineEvent::HideModels { names } => format!("hide {}", names.join(", ")),
        EngineEvent::SnapChanged { entity, from, to } => format!(
            "{} snap {} -> {}",
            entity,
            from.as_deref().unwrap_or("-"),
            to.as_deref().unwrap_or("-")
        ),
        EngineEvent::GateSatisfied { step, gate } => format!("step {}: {} done", step, gate),
        EngineEvent::StepChanged { from, to, .. } => format!("step {} -> {}", from, to),
        EngineEvent::PlayAnimation {
            entity, sequence, ..
        } => format!("play {} on {}", sequence, entity),
        EngineEvent::OpenPalette { step } => format!("palette opened at step {}", step),
        EngineEvent::Restarted => String::from("restarted"),
        EngineEvent::CaptureStarted { .. } => String::from("mic on"),
        EngineEvent::CaptureStopped { .. } => String::from("mic off"),
        EngineEvent::TranscriptInterim { text, .. } => format!("hearing \"{}\"", text),
        EngineEvent::TranscriptFinal(transcript) => format!("heard \"{}\"", transcript.text),
        EngineEvent::CaptureFailed { reason } => format!("mic failed: {}", reason),
    }
}

/// Restores the terminal even when the loop bails out
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

pub struct TerminalRunner {
    session: TutorialSession,
    simulator: KeySimulator,
    dashboard: Dashboard,
    tick_rate: Duration,
}

impl TerminalRunner {
    pub fn new(session: TutorialSession, simulator: KeySimulator) -> Self {
        Self {
            session,
            simulator,
            dashboard: Dashboard::default(),
            tick_rate: Duration::from_millis(50),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let _guard = TerminalGuard::enter()?;
        let mut stdout = io::stdout();

        let opening = self.session.start();
        self.dashboard.record(&opening);

        let mut interval = tokio::time::interval(self.tick_rate);
        let mut last_tick = Instant::now();
        loop {
            interval.tick().await;

            if !self.drain_keys()? {
                break;
            }

            let events = self.session.tick(last_tick.elapsed());
            last_tick = Instant::now();
            self.dashboard.record(&events);

            self.render(&mut stdout)?;
        }

        tracing::info!(
            "Leaving tutorial at step {}",
            self.session.current_step_id()
        );
        Ok(())
    }

    /// Handle queued key presses; false once the user quits
    fn drain_keys(&mut self) -> Result<bool> {
        while event::poll(Duration::ZERO)? {
            let CrosstermEvent::Key(key) = event::read()? else {
                continue;
            };
            match self.simulator.process_key(key) {
                KeyAction::Quit => return Ok(false),
                KeyAction::Ignored => {}
                KeyAction::Input(inputs) => {
                    for input in inputs {
                        self.dispatch(input);
                    }
                }
            }
        }
        Ok(true)
    }

    fn dispatch(&mut self, input: InputEvent) {
        let grab = matches!(input, InputEvent::BeginDrag { .. });
        let events = self.session.handle(input);
        if grab && !self.session.engine().is_dragging() {
            self.simulator.release();
        }
        self.dashboard.record(&events);
    }

    fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        queue!(out, Clear(ClearType::All))?;
        for (row, line) in self.dashboard.lines(&self.session).iter().enumerate() {
            queue!(out, cursor::MoveTo(0, row as u16), Print(line))?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::load_scene;
    use realm_guide_config::AppConfig;
    use realm_guide_core::voice::NullCaptureBackend;
    use realm_guide_core::StepScript;

    fn session() -> TutorialSession {
        let config = AppConfig::default();
        TutorialSession::new(
            &config,
            load_scene(None).unwrap(),
            StepScript::builtin(&config.tutorial.hero),
            Box::new(NullCaptureBackend),
        )
    }

    #[test]
    fn test_dashboard_shows_step_and_gate() {
        let mut session = session();
        let mut dashboard = Dashboard::default();
        dashboard.record(&session.start());
        for _ in 0..2 {
            let events = session.handle(InputEvent::AdvanceStep);
            dashboard.record(&events);
        }

        let lines = dashboard.lines(&session);
        assert!(lines[0].starts_with("[Tag] The Genre button"));
        assert!(lines[1].contains("Step 3/29"));
        assert!(lines[1].contains("locked"));
        assert!(lines[1].contains("select genre = Fantasy"));
        assert!(lines.iter().any(|l| l == "Visible: -"));
        assert!(lines.iter().any(|l| l.contains("palette opened at step 3")));
    }

    #[test]
    fn test_dashboard_shows_grab_and_story() {
        let mut session = session();
        session.start();
        session.handle(InputEvent::begin_drag("TestAnimation"));
        session.handle(InputEvent::RecordingFinalText {
            text: "Once upon a time".to_string(),
        });
        session.handle(InputEvent::RecordingFinalText {
            text: "the end".to_string(),
        });

        let lines = Dashboard::default().lines(&session);
        assert!(lines
            .iter()
            .any(|l| l.starts_with("Hero TestAnimation") && l.contains("[grabbed]")));
        assert!(lines.iter().any(|l| l == "Story: Once upon a time the end"));
    }

    #[test]
    fn test_recent_events_are_bounded() {
        let mut dashboard = Dashboard::default();
        let events: Vec<EngineEvent> = (0..20)
            .map(|step| EngineEvent::OpenPalette { step })
            .collect();
        dashboard.record(&events);
        assert_eq!(dashboard.recent.len(), RECENT_EVENTS);
        assert_eq!(dashboard.recent.back().unwrap(), "palette opened at step 19");
    }

    #[test]
    fn test_interim_text_is_not_logged() {
        let mut dashboard = Dashboard::default();
        dashboard.record(&[EngineEvent::TranscriptInterim {
            session: uuid::Uuid::nil(),
            text: "once".to_string(),
        }]);
        assert_eq!(dashboard.interim.as_deref(), Some("once"));
        assert!(dashboard.recent.is_empty());

        dashboard.record(&[EngineEvent::Restarted]);
        assert!(dashboard.interim.is_none());
    }
}
