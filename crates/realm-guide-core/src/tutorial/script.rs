//! Tutorial step scripts
//!
//! A script is a flat, ordered TOML table of steps. Presentation text is kept
//! elsewhere; steps only carry behaviour.
//!
//! ```toml
//! [[step]]
//! id = 8
//! actions = [
//!     { type = "show_models", names = ["_010_table_tex_v01", "Indicator8"] },
//!     { type = "require_snap_to", target = "Indicator8" },
//! ]
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Gate, StepAction};
use crate::error::{EngineError, Result};
use realm_guide_config::ConfigError;

/// One immutable step of the script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorialStep {
    pub id: u32,
    #[serde(default)]
    pub actions: Vec<StepAction>,
}

impl TutorialStep {
    pub fn new(id: u32, actions: Vec<StepAction>) -> Self {
        Self { id, actions }
    }

    /// The single gate the step imposes; scripts are validated to carry at most one
    pub fn gate(&self) -> Gate {
        self.actions
            .iter()
            .find_map(StepAction::gate)
            .unwrap_or_default()
    }

    pub fn show_models(&self) -> Option<&[String]> {
        self.actions.iter().rev().find_map(|a| match a {
            StepAction::ShowModels { names } => Some(names.as_slice()),
            _ => None,
        })
    }

    pub fn animations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.actions.iter().filter_map(|a| match a {
            StepAction::PlayAnimation { entity, sequence } => {
                Some((entity.as_str(), sequence.as_str()))
            }
            _ => None,
        })
    }

    pub fn opens_palette(&self) -> bool {
        self.actions.contains(&StepAction::OpenPalette)
    }
}

#[derive(Debug, Deserialize)]
struct ScriptFile {
    #[serde(default, rename = "step")]
    steps: Vec<TutorialStep>,
}

/// A validated, 1-indexed list of steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepScript {
    steps: Vec<TutorialStep>,
}

impl StepScript {
    /// Validate and wrap `steps`: ids must run 1..=n in order, each step
    /// may carry at most one gate action.
    pub fn new(steps: Vec<TutorialStep>) -> Result<Self> {
        if steps.is_empty() {
            return Err(EngineError::InvalidScript("script has no steps".to_string()));
        }
        for (index, step) in steps.iter().enumerate() {
            let expected = index as u32 + 1;
            if step.id != expected {
                return Err(EngineError::InvalidScript(format!(
                    "expected step {} but found {}",
                    expected, step.id
                )));
            }
            let gates = step.actions.iter().filter(|a| a.gate().is_some()).count();
            if gates > 1 {
                return Err(EngineError::InvalidScript(format!(
                    "step {} has {} gate actions",
                    step.id, gates
                )));
            }
        }
        Ok(Self { steps })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ScriptFile = toml::from_str(contents).map_err(EngineError::ScriptParse)?;
        Self::new(file.steps)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| {
            EngineError::Config(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn step(&self, id: u32) -> Option<&TutorialStep> {
        let index = (id as usize).checked_sub(1)?;
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[TutorialStep] {
        &self.steps
    }

    /// Id of the terminal step
    pub fn last_id(&self) -> u32 {
        self.steps.len() as u32
    }

    /// Names visible at `id`: the `show_models` of the latest step at or
    /// before `id` that declares one.
    pub fn visible_set(&self, id: u32) -> BTreeSet<String> {
        let upto = (id as usize).min(self.steps.len());
        self.steps[..upto]
            .iter()
            .rev()
            .find_map(TutorialStep::show_models)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Every name any step shows
    pub fn managed_names(&self) -> BTreeSet<String> {
        self.steps
            .iter()
            .filter_map(TutorialStep::show_models)
            .flatten()
            .cloned()
            .collect()
    }

    /// The built-in 29-step narrative tutorial, with `hero` as the draggable token
    pub fn builtin(hero: &str) -> Self {
        const TABLE: &str = "_010_table_tex_v01";
        const PATH: &str = "storypath_tex_v01";
        const MIC: &str = "microphone_tex_v01";
        const FOREST: &str = "signpost_forest_tex_v01";
        const DRAGON: &str = "dragon_anim_v03";
        const COTTAGE: &str = "cottage_teapot_tex_v01";
        const LIGHTBULB: &str = "lightbulb_tex_v01";
        const TREASURE: &str = "treasure_tex_v01";
        const SNOW: &str = "signopost_snow_tex_v01";
        const DESERT: &str = "signpost_desert_tex_v01";
        const LIGHTBULB_HOTSPOT: &str = "LightbulbInteractive";

        let world_13 = [TABLE, PATH, MIC, FOREST];
        let world_18 = [TABLE, PATH, MIC, FOREST, DRAGON];
        let world_20 = [TABLE, PATH, MIC, FOREST, DRAGON, COTTAGE];
        let world_22 = [TABLE, PATH, MIC, FOREST, DRAGON, COTTAGE, LIGHTBULB];
        let world_23 = [TABLE, PATH, MIC, FOREST, DRAGON, COTTAGE, LIGHTBULB, TREASURE];
        let world_25 = [
            TABLE, PATH, MIC, FOREST, DRAGON, COTTAGE, LIGHTBULB, TREASURE, SNOW,
        ];

        let with = |base: &[&str], extra: &str| -> StepAction {
            StepAction::show_models(base.iter().copied().chain([extra]))
        };

        let actions: Vec<Vec<StepAction>> = vec![
            // 1: hide the whole world
            vec![StepAction::show_models(Vec::<String>::new())],
            vec![],
            vec![
                StepAction::OpenPalette,
                StepAction::require_selection("genre", "Fantasy"),
            ],
            vec![StepAction::show_models([TABLE])],
            vec![StepAction::require_selection("story_shape", "Story Shape 1")],
            vec![StepAction::show_models([TABLE, PATH])],
            vec![],
            vec![
                StepAction::show_models([TABLE, PATH, "Indicator8"]),
                StepAction::require_snap_to("Indicator8"),
            ],
            vec![StepAction::show_models([TABLE, PATH])],
            vec![StepAction::show_models([TABLE, PATH, MIC])],
            vec![],
            vec![StepAction::RequireRecording],
            vec![StepAction::show_models(world_13)],
            vec![
                with(&world_13, "Indicator14"),
                StepAction::require_snap_to("Indicator14"),
            ],
            vec![StepAction::show_models(world_13)],
            vec![],
            vec![
                with(&world_18, "Indicator17"),
                StepAction::play_animation(DRAGON, "DragonSequence"),
                StepAction::require_snap_to("Indicator17"),
            ],
            vec![StepAction::show_models(world_18)],
            vec![StepAction::RequireRecording],
            vec![StepAction::show_models(world_20)],
            vec![
                with(&world_20, "Indicator21"),
                StepAction::require_snap_to("Indicator21"),
            ],
            vec![
                StepAction::show_models(world_22),
                StepAction::require_tap(LIGHTBULB_HOTSPOT),
            ],
            vec![StepAction::show_models(world_23)],
            vec![
                with(&world_25, "Indicator24"),
                StepAction::require_snap_to("Indicator24"),
            ],
            vec![
                StepAction::show_models(world_25),
                StepAction::play_animation(hero, "ArmourSequence"),
                StepAction::require_tap(LIGHTBULB_HOTSPOT),
            ],
            vec![],
            vec![with(&world_25, DESERT)],
            vec![],
            // 29: restart prompt
            vec![],
        ];

        let steps = actions
            .into_iter()
            .enumerate()
            .map(|(i, actions)| TutorialStep::new(i as u32 + 1, actions))
            .collect();
        Self { steps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_shape() {
        let script = StepScript::builtin("TestAnimation");
        assert_eq!(script.last_id(), 29);
        assert!(StepScript::new(script.steps().to_vec()).is_ok());

        assert_eq!(script.step(8).unwrap().gate(), Gate::RequireSnapTo("Indicator8".into()));
        assert_eq!(script.step(12).unwrap().gate(), Gate::RequireRecordingComplete);
        assert_eq!(script.step(22).unwrap().gate(), Gate::RequireTap("LightbulbInteractive".into()));
        assert_eq!(script.step(2).unwrap().gate(), Gate::None);
        assert!(script.step(3).unwrap().opens_palette());
        assert!(script.step(0).is_none());
        assert!(script.step(30).is_none());
    }

    #[test]
    fn test_visible_set_carries_forward() {
        let script = StepScript::builtin("TestAnimation");
        assert!(script.visible_set(1).is_empty());
        assert!(script.visible_set(3).is_empty());

        let at_7 = script.visible_set(7);
        assert_eq!(at_7, script.visible_set(6));
        assert!(at_7.contains("storypath_tex_v01"));

        assert!(script.visible_set(8).contains("Indicator8"));
        assert!(!script.visible_set(9).contains("Indicator8"));
        assert!(script.visible_set(28).contains("signpost_desert_tex_v01"));
    }

    #[test]
    fn test_managed_names() {
        let managed = StepScript::builtin("TestAnimation").managed_names();
        assert_eq!(managed.len(), 15);
        assert!(managed.contains("Indicator24"));
        assert!(!managed.contains("TestAnimation"));
    }

    #[test]
    fn test_rejects_gaps_and_double_gates() {
        let gap = vec![TutorialStep::new(1, vec![]), TutorialStep::new(3, vec![])];
        assert!(matches!(StepScript::new(gap), Err(EngineError::InvalidScript(_))));

        let double = vec![TutorialStep::new(
            1,
            vec![StepAction::RequireRecording, StepAction::DisableNextButton],
        )];
        assert!(matches!(StepScript::new(double), Err(EngineError::InvalidScript(_))));

        assert!(StepScript::new(Vec::new()).is_err());
    }

    #[test]
    fn test_parse_failure_is_a_script_error() {
        let err = StepScript::from_toml_str("[[step]]\nid = \"one\"").unwrap_err();
        assert!(matches!(err, EngineError::ScriptParse(_)));
        assert!(err.to_string().starts_with("Failed to parse step script"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [[step]]
            id = 1
            actions = [{{ type = "show_models", names = [] }}]

            [[step]]
            id = 2
            actions = [
                {{ type = "show_models", names = ["table"] }},
                {{ type = "disable_next_button" }},
            ]
            "#
        )
        .unwrap();

        let script = StepScript::from_file(file.path()).unwrap();
        assert_eq!(script.last_id(), 2);
        assert_eq!(script.step(2).unwrap().gate(), Gate::External);
        assert!(script.visible_set(2).contains("table"));
    }
}
