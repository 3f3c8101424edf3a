//! Speech capture backends

use std::collections::VecDeque;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::{EngineError, Result};

/// What a backend reports for a capture session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEventKind {
    Interim(String),
    Final(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureEvent {
    pub session: Uuid,
    pub kind: CaptureEventKind,
}

/// Sending half handed to a backend for one session.
///
/// Cheap to clone and safe to move to any thread; events are drained later
/// on the engine's thread.
#[derive(Debug, Clone)]
pub struct CaptureSink {
    session: Uuid,
    tx: mpsc::UnboundedSender<CaptureEvent>,
}

impl CaptureSink {
    pub(crate) fn new(session: Uuid, tx: mpsc::UnboundedSender<CaptureEvent>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    /// Returns false once the bridge is gone
    pub fn interim(&self, text: impl Into<String>) -> bool {
        self.send(CaptureEventKind::Interim(text.into()))
    }

    pub fn finish(&self, text: impl Into<String>) -> bool {
        self.send(CaptureEventKind::Final(text.into()))
    }

    pub fn fail(&self, reason: impl Into<String>) -> bool {
        self.send(CaptureEventKind::Failed(reason.into()))
    }

    fn send(&self, kind: CaptureEventKind) -> bool {
        self.tx
            .send(CaptureEvent {
                session: self.session,
                kind,
            })
            .is_ok()
    }
}

/// A speech-to-text collaborator
pub trait CaptureBackend: Send {
    /// Begin transcribing into `sink`
    fn start(&mut self, session: Uuid, sink: CaptureSink) -> Result<()>;

    /// Stop listening; the final text may still arrive afterwards
    fn stop(&mut self, session: Uuid);

    fn is_available(&self) -> bool {
        true
    }
}

/// Backend for hosts without speech support
pub struct NullCaptureBackend;

impl CaptureBackend for NullCaptureBackend {
    fn start(&mut self, _session: Uuid, _sink: CaptureSink) -> Result<()> {
        Err(EngineError::CaptureUnavailable(
            "no speech backend configured".to_string(),
        ))
    }

    fn stop(&mut self, _session: Uuid) {}

    fn is_available(&self) -> bool {
        false
    }
}

/// Replays canned phrases: each session yields the next phrase as its final
/// text when stopped.
#[derive(Debug, Default)]
pub struct ScriptedCaptureBackend {
    phrases: VecDeque<String>,
    active: Option<CaptureSink>,
}

impl ScriptedCaptureBackend {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
            active: None,
        }
    }
}

impl CaptureBackend for ScriptedCaptureBackend {
    fn start(&mut self, _session: Uuid, sink: CaptureSink) -> Result<()> {
        if self.phrases.is_empty() {
            return Err(EngineError::CaptureUnavailable(
                "no phrases left to replay".to_string(),
            ));
        }
        self.active = Some(sink);
        Ok(())
    }

    fn stop(&mut self, session: Uuid) {
        let Some(sink) = self.active.take() else {
            return;
        };
        if sink.session() != session {
            self.active = Some(sink);
            return;
        }
        if let Some(phrase) = self.phrases.pop_front() {
            if let Some(first) = phrase.split_whitespace().next() {
                sink.interim(first);
            }
            sink.finish(phrase);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_reports_closed_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = CaptureSink::new(Uuid::new_v4(), tx);
        assert!(sink.interim("once"));
        drop(rx);
        assert!(!sink.finish("once upon a time"));
    }

    #[test]
    fn test_sink_is_send_across_threads() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let session = Uuid::new_v4();
        let sink = CaptureSink::new(session, tx);
        std::thread::spawn(move || {
            sink.finish("and they all lived happily ever after");
        })
        .join()
        .unwrap();

        let event = rx.try_recv().unwrap();
        assert_eq!(event.session, session);
        assert!(matches!(event.kind, CaptureEventKind::Final(_)));
    }

    #[test]
    fn test_null_backend_unavailable() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut backend = NullCaptureBackend;
        let id = Uuid::new_v4();
        assert!(matches!(
            backend.start(id, CaptureSink::new(id, tx)),
            Err(EngineError::CaptureUnavailable(_))
        ));
        assert!(!backend.is_available());
    }
}
