//! Stand-in speech recognizer for the terminal demo
//!
//! Words of a canned phrase trickle in as interim text while capture runs;
//! stopping delivers the whole phrase as the final transcript.

use std::collections::HashMap;
use std::time::Duration;

use realm_guide_core::voice::{CaptureBackend, CaptureSink};
use realm_guide_core::{EngineError, Result};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use uuid::Uuid;

const WORD_INTERVAL: Duration = Duration::from_millis(250);

struct ActiveCapture {
    phrase: String,
    sink: CaptureSink,
    task: JoinHandle<()>,
}

pub struct SimulatedTranscriber {
    handle: Handle,
    phrases: Vec<String>,
    next: usize,
    active: HashMap<Uuid, ActiveCapture>,
}

impl SimulatedTranscriber {
    pub fn new<I, S>(handle: Handle, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            handle,
            phrases: phrases.into_iter().map(Into::into).collect(),
            next: 0,
            active: HashMap::new(),
        }
    }

    /// Lines the tutorial asks the user to say
    pub fn tutorial_phrases(handle: Handle) -> Self {
        Self::new(
            handle,
            [
                "Once upon a time there was a curious villager named Tag",
                "And they all lived happily ever after",
                "Tag found the treasure and escaped on the back of the dragon",
            ],
        )
    }
}

impl CaptureBackend for SimulatedTranscriber {
    fn start(&mut self, session: Uuid, sink: CaptureSink) -> Result<()> {
        if self.phrases.is_empty() {
            return Err(EngineError::CaptureUnavailable(
                "no phrases configured".to_string(),
            ));
        }
        let phrase = self.phrases[self.next % self.phrases.len()].clone();
        self.next += 1;

        let words: Vec<String> = phrase.split_whitespace().map(str::to_string).collect();
        let interim_sink = sink.clone();
        let task = self.handle.spawn(async move {
            let mut heard = Vec::with_capacity(words.len());
            for word in words {
                tokio::time::sleep(WORD_INTERVAL).await;
                heard.push(word);
                if !interim_sink.interim(heard.join(" ")) {
                    break;
                }
            }
        });

        tracing::debug!("Simulated capture {} started", session);
        self.active.insert(
            session,
            ActiveCapture {
                phrase,
                sink,
                task,
            },
        );
        Ok(())
    }

    fn stop(&mut self, session: Uuid) {
        let Some(capture) = self.active.remove(&session) else {
            return;
        };
        capture.task.abort();
        if !capture.sink.finish(capture.phrase) {
            tracing::debug!("Capture {} stopped after the bridge closed", session);
        }
    }

    fn is_available(&self) -> bool {
        !self.phrases.is_empty()
    }
}

impl Drop for SimulatedTranscriber {
    fn drop(&mut self) {
        for (_, capture) in self.active.drain() {
            capture.task.abort();
        }
    }
}
