//! Named animation sequences and per-entity playback

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::error::{EngineError, Result};

/// A single clip inside a sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub name: String,
    pub duration: Duration,
    /// Loops forever once reached
    pub looping: bool,
}

impl Clip {
    pub fn once(name: impl Into<String>, seconds: f32) -> Self {
        Self {
            name: name.into(),
            duration: Duration::from_secs_f32(seconds),
            looping: false,
        }
    }

    pub fn looping(name: impl Into<String>, seconds: f32) -> Self {
        Self {
            looping: true,
            ..Self::once(name, seconds)
        }
    }
}

/// Clips played back to back
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub name: String,
    pub clips: Vec<Clip>,
}

/// Lookup of sequences by name
#[derive(Debug, Clone)]
pub struct SequenceLibrary {
    sequences: HashMap<String, Sequence>,
}

impl Default for SequenceLibrary {
    fn default() -> Self {
        let mut library = Self {
            sequences: HashMap::new(),
        };
        library.insert(Sequence {
            name: "DragonSequence".to_string(),
            clips: vec![Clip::once("Appear", 2.0), Clip::looping("Breathe", 3.0)],
        });
        library.insert(Sequence {
            name: "ArmourSequence".to_string(),
            clips: vec![
                Clip::once("DefaultToArmour", 1.5),
                Clip::looping("ArmourIdle", 2.0),
            ],
        });
        library
    }
}

impl SequenceLibrary {
    pub fn empty() -> Self {
        Self {
            sequences: HashMap::new(),
        }
    }

    pub fn insert(&mut self, sequence: Sequence) {
        self.sequences.insert(sequence.name.clone(), sequence);
    }

    pub fn get(&self, name: &str) -> Option<&Sequence> {
        self.sequences.get(name)
    }
}

/// Instruction for the host to start a sequence on an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationCue {
    pub entity: String,
    pub sequence: String,
    pub clips: Vec<String>,
}

#[derive(Debug, Clone)]
struct Playback {
    sequence: Sequence,
    clip: usize,
    elapsed: Duration,
}

impl Playback {
    fn current(&self) -> Option<&Clip> {
        self.sequence.clips.get(self.clip)
    }

    /// Advance by `dt`; a non-looping last clip finishes the playback
    fn update(&mut self, dt: Duration) -> bool {
        self.elapsed += dt;
        while let Some((looping, duration)) = self.current().map(|c| (c.looping, c.duration)) {
            if looping || self.elapsed < duration {
                return true;
            }
            self.elapsed -= duration;
            self.clip += 1;
        }
        false
    }
}

/// One active sequence per entity; playing another replaces it
#[derive(Debug, Default)]
pub struct AnimationDirector {
    library: SequenceLibrary,
    active: BTreeMap<String, Playback>,
}

impl AnimationDirector {
    pub fn new(library: SequenceLibrary) -> Self {
        Self {
            library,
            active: BTreeMap::new(),
        }
    }

    pub fn play(&mut self, entity: &str, sequence: &str) -> Result<AnimationCue> {
        let found = self
            .library
            .get(sequence)
            .ok_or_else(|| EngineError::UnknownSequence(sequence.to_string()))?
            .clone();

        if let Some(previous) = self.active.get(entity) {
            tracing::debug!("Replacing {} on {}", previous.sequence.name, entity);
        }
        let cue = AnimationCue {
            entity: entity.to_string(),
            sequence: found.name.clone(),
            clips: found.clips.iter().map(|c| c.name.clone()).collect(),
        };
        self.active.insert(
            entity.to_string(),
            Playback {
                sequence: found,
                clip: 0,
                elapsed: Duration::ZERO,
            },
        );
        tracing::info!("Playing {} on {}", sequence, entity);
        Ok(cue)
    }

    /// Advance every playback, dropping the ones that ran out
    pub fn update(&mut self, dt: Duration) {
        self.active.retain(|_, playback| playback.update(dt));
    }

    pub fn current_clip(&self, entity: &str) -> Option<&str> {
        self.active
            .get(entity)
            .and_then(Playback::current)
            .map(|c| c.name.as_str())
    }

    pub fn is_playing(&self, entity: &str) -> bool {
        self.active.contains_key(entity)
    }

    pub fn stop(&mut self, entity: &str) -> bool {
        self.active.remove(entity).is_some()
    }

    pub fn stop_all(&mut self) {
        self.active.clear();
    }
}
