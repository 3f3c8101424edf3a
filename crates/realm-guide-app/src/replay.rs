//! Headless mode: JSON-lines entry events in, JSON-lines emitted events out

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use realm_guide_core::{EngineEvent, InputEvent, TutorialSession};

/// Summary of a replay run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayStats {
    pub inputs: usize,
    pub emitted: usize,
    pub final_step: u32,
}

/// Feed every event in `input` to `session`, writing what it emits to `output`.
///
/// Blank lines and lines starting with `#` are skipped. The session is
/// started first, so its opening events lead the output.
pub fn replay<R, W>(session: &mut TutorialSession, input: R, mut output: W) -> Result<ReplayStats>
where
    R: BufRead,
    W: Write,
{
    let mut stats = ReplayStats::default();
    stats.emitted += write_events(&mut output, &session.start())?;

    for (index, line) in input.lines().enumerate() {
        let line = line.context("failed to read replay input")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: InputEvent = serde_json::from_str(line)
            .with_context(|| format!("line {}: not an input event", index + 1))?;
        tracing::debug!("Replaying {} from line {}", event.label(), index + 1);

        stats.inputs += 1;
        stats.emitted += write_events(&mut output, &session.handle(event))?;
    }

    stats.emitted += write_events(&mut output, &session.pump_voice())?;
    stats.final_step = session.current_step_id();
    output.flush()?;
    Ok(stats)
}

fn write_events<W: Write>(output: &mut W, events: &[EngineEvent]) -> Result<usize> {
    for event in events {
        serde_json::to_writer(&mut *output, event)?;
        output.write_all(b"\n")?;
    }
    Ok(events.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::load_scene;
    use realm_guide_config::AppConfig;
    use realm_guide_core::voice::ScriptedCaptureBackend;
    use realm_guide_core::StepScript;

    fn session() -> TutorialSession {
        let config = AppConfig::default();
        TutorialSession::new(
            &config,
            load_scene(None).unwrap(),
            StepScript::builtin(&config.tutorial.hero),
            Box::new(ScriptedCaptureBackend::new(["Once upon a time"])),
        )
    }

    fn emitted(output: &[u8]) -> Vec<EngineEvent> {
        String::from_utf8_lossy(output)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_replay_through_palette_gate() {
        let input = r#"
# get to the genre prompt
{"event":"advance_step"}
{"event":"advance_step"}
{"event":"advance_step"}
{"event":"palette_selection","control":"genre","value":"Fantasy"}
{"event":"advance_step"}
"#;
        let mut session = session();
        let mut output = Vec::new();
        let stats = replay(&mut session, input.as_bytes(), &mut output).unwrap();

        assert_eq!(stats.inputs, 5);
        assert_eq!(stats.final_step, 4);

        let events = emitted(&output);
        assert_eq!(events.len(), stats.emitted);
        assert!(events.contains(&EngineEvent::OpenPalette { step: 3 }));
        assert!(events.contains(&EngineEvent::ShowModels {
            names: vec!["_010_table_tex_v01".to_string()]
        }));
        // The third advance hit the locked gate and emitted nothing
        let steps: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::StepChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect();
        assert_eq!(steps, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_replay_reports_bad_line() {
        let input = "{\"event\":\"advance_step\"}\n{\"event\":\"fly\"}\n";
        let err = replay(&mut session(), input.as_bytes(), Vec::new()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
