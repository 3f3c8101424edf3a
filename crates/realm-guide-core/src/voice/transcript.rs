//! Finalized transcripts kept for presentation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One finalized piece of the story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub session: Uuid,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl Transcript {
    pub fn new(session: Uuid, text: impl Into<String>) -> Self {
        Self {
            session,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Transcripts in the order they were finalized
#[derive(Debug, Default)]
pub struct TranscriptLog {
    entries: Vec<Transcript>,
}

impl TranscriptLog {
    pub fn push(&mut self, transcript: Transcript) {
        self.entries.push(transcript);
    }

    pub fn entries(&self) -> &[Transcript] {
        &self.entries
    }

    /// Every text joined into one passage
    pub fn story(&self) -> String {
        self.entries
            .iter()
            .map(|t| t.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
