//! Single-session voice capture bridge

use tokio::sync::mpsc;
use uuid::Uuid;

use super::{CaptureBackend, CaptureEventKind, CaptureSink, Transcript};
use crate::error::Result;

/// A capture update accepted by the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceUpdate {
    Interim { session: Uuid, text: String },
    Final(Transcript),
    Failed { session: Uuid, reason: String },
}

/// Owns the capture backend and the receiving end of its channel.
///
/// At most one session is open at a time. A session closes on its first
/// final or failure; anything else it sends afterwards, and anything from
/// an older session, is dropped.
pub struct VoiceBridge {
    backend: Box<dyn CaptureBackend>,
    tx: mpsc::UnboundedSender<super::CaptureEvent>,
    rx: mpsc::UnboundedReceiver<super::CaptureEvent>,
    /// Session whose final is still expected
    open: Option<Uuid>,
    capturing: bool,
}

impl VoiceBridge {
    pub fn new(backend: Box<dyn CaptureBackend>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            backend,
            tx,
            rx,
            open: None,
            capturing: false,
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Open a new session. Already capturing is a no-op returning the
    /// running session.
    pub fn start_capture(&mut self) -> Result<Uuid> {
        if let (true, Some(session)) = (self.capturing, self.open) {
            return Ok(session);
        }

        let session = Uuid::new_v4();
        let sink = CaptureSink::new(session, self.tx.clone());
        self.backend.start(session, sink)?;

        tracing::info!("Capture session {} started", session);
        self.open = Some(session);
        self.capturing = true;
        Ok(session)
    }

    /// Stop listening. The session stays open until its final arrives.
    pub fn stop_capture(&mut self) -> Option<Uuid> {
        if !self.capturing {
            return None;
        }
        self.capturing = false;
        let session = self.open?;
        self.backend.stop(session);
        tracing::info!("Capture session {} stopped", session);
        Some(session)
    }

    /// Abandon the open session; late events from it are dropped
    pub fn cancel(&mut self) {
        if let Some(session) = self.open.take() {
            if self.capturing {
                self.backend.stop(session);
            }
            tracing::debug!("Capture session {} cancelled", session);
        }
        self.capturing = false;
    }

    /// Next accepted update, without blocking
    pub fn try_next(&mut self) -> Option<VoiceUpdate> {
        while let Ok(event) = self.rx.try_recv() {
            if self.open != Some(event.session) {
                tracing::debug!("Dropping capture event from closed session {}", event.session);
                continue;
            }
            let update = match event.kind {
                CaptureEventKind::Interim(text) => VoiceUpdate::Interim {
                    session: event.session,
                    text,
                },
                CaptureEventKind::Final(text) => {
                    self.close();
                    VoiceUpdate::Final(Transcript::new(event.session, text))
                }
                CaptureEventKind::Failed(reason) => {
                    tracing::warn!("Capture session {} failed: {}", event.session, reason);
                    self.close();
                    VoiceUpdate::Failed {
                        session: event.session,
                        reason,
                    }
                }
            };
            return Some(update);
        }
        None
    }

    /// Everything currently queued
    pub fn drain(&mut self) -> Vec<VoiceUpdate> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    fn close(&mut self) {
        self.open = None;
        self.capturing = false;
    }
}
