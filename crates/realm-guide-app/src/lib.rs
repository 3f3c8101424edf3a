//! Terminal front-end for the realm-guide tutorial engine
//!
//! Controls (standing in for hand gestures):
//! - Space: grab or release the hero
//! - Arrows, PageUp/PageDown: move the grabbed hero
//! - Enter or n: Next, b: Back, r: Restart
//! - m: tap the microphone, l: tap the lightbulb
//! - g / p: cycle the genre and story shape palettes
//! - Esc or Ctrl-Q: quit

pub mod content;
pub mod logging;
pub mod replay;
pub mod runner;
pub mod scene;
pub mod simulator;
pub mod transcriber;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use realm_guide_config::AppConfig;
use realm_guide_core::voice::{CaptureBackend, ScriptedCaptureBackend};
use realm_guide_core::{StepScript, TutorialSession};
use tokio::runtime::Handle;

pub use replay::ReplayStats;

/// Inputs shared by every command
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub scene: Option<PathBuf>,
    pub script: Option<PathBuf>,
}

impl SessionOptions {
    pub fn load_script(&self, config: &AppConfig) -> Result<StepScript> {
        match &self.script {
            Some(path) => StepScript::from_file(path)
                .with_context(|| format!("cannot load script {}", path.display())),
            None => Ok(StepScript::builtin(&config.tutorial.hero)),
        }
    }

    pub fn build_session(
        &self,
        config: &AppConfig,
        backend: Box<dyn CaptureBackend>,
    ) -> Result<TutorialSession> {
        let registry = scene::load_scene(self.scene.as_deref()).context("cannot load scene")?;
        let script = self.load_script(config)?;
        Ok(TutorialSession::new(config, registry, script, backend))
    }
}

/// Run the interactive tutorial until the user quits
pub async fn run_play(config: &AppConfig, options: &SessionOptions) -> Result<()> {
    let backend = transcriber::SimulatedTranscriber::tutorial_phrases(Handle::current());
    let session = options.build_session(config, Box::new(backend))?;
    let simulator =
        simulator::KeySimulator::new(&config.tutorial.hero, &config.tutorial.microphone_hotspot);
    runner::TerminalRunner::new(session, simulator).run().await
}

/// Replay JSON-lines input events from `input` (stdin for `-`) to stdout
pub fn run_replay(config: &AppConfig, options: &SessionOptions, input: &Path) -> Result<ReplayStats> {
    let backend = ScriptedCaptureBackend::new([
        "Once upon a time there was a curious villager named Tag",
        "And they all lived happily ever after",
    ]);
    let mut session = options.build_session(config, Box::new(backend))?;
    let stdout = io::stdout();

    let stats = if input == Path::new("-") {
        replay::replay(&mut session, io::stdin().lock(), stdout.lock())?
    } else {
        let file =
            File::open(input).with_context(|| format!("cannot open {}", input.display()))?;
        replay::replay(&mut session, BufReader::new(file), stdout.lock())?
    };
    tracing::info!(
        "Replayed {} inputs, {} events, ended at step {}",
        stats.inputs,
        stats.emitted,
        stats.final_step
    );
    Ok(stats)
}

/// Print the step table: id, gate, text
pub fn print_script<W: Write>(config: &AppConfig, options: &SessionOptions, mut out: W) -> Result<()> {
    let script = options.load_script(config)?;
    for step in script.steps() {
        let gate = step.gate();
        let gate = if gate.is_pending() {
            gate.to_string()
        } else {
            String::from("-")
        };
        let message = content::step_text(step.id)
            .map(|text| content::plain(text.message))
            .unwrap_or_default();
        writeln!(out, "{:>3}  {:<32}  {}", step.id, gate, message)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_builtin_script() {
        let mut out = Vec::new();
        print_script(&AppConfig::default(), &SessionOptions::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 29);
        assert!(lines[7].contains("snap to Indicator8"));
        assert!(lines[0].contains("Hi, I'm Tag!"));
    }

    #[test]
    fn test_custom_script_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[step]]\nid = 1\nactions = [{{ type = \"require_tap\", hotspot = \"LightbulbInteractive\" }}]"
        )
        .unwrap();
        let options = SessionOptions {
            scene: None,
            script: Some(file.path().to_path_buf()),
        };
        let mut out = Vec::new();
        print_script(&AppConfig::default(), &options, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("tap LightbulbInteractive"));
    }

    #[test]
    fn test_missing_scene_is_reported() {
        let options = SessionOptions {
            scene: Some(PathBuf::from("/nonexistent/scene.toml")),
            script: None,
        };
        let backend = Box::new(realm_guide_core::voice::NullCaptureBackend);
        let err = options
            .build_session(&AppConfig::default(), backend)
            .err()
            .unwrap();
        assert!(err.to_string().contains("cannot load scene"));
    }
}
