//! realm-guide-core: placement and tutorial-gating engine
//!
//! A user drags a story token (the hero) between waypoints in a 3D scene
//! while a linear tutorial script waits for the right placement, recording,
//! tap or palette choice before letting them continue.
//!
//! Everything runs on one logical thread. The only cross-thread seam is
//! voice capture: backends post through a [`voice::CaptureSink`] and the
//! session drains them.
//!
//! ```no_run
//! use realm_guide_core::{InputEvent, SceneManifest, StepScript, TutorialSession};
//! use realm_guide_core::voice::NullCaptureBackend;
//! use realm_guide_config::AppConfig;
//!
//! # fn main() -> realm_guide_core::Result<()> {
//! let config = AppConfig::default();
//! let registry = SceneManifest::from_toml_str(r#"
//!     [[entity]]
//!     name = "TestAnimation"
//!     draggable = true
//! "#)?.build()?;
//! let mut session = TutorialSession::new(
//!     &config,
//!     registry,
//!     StepScript::builtin(&config.tutorial.hero),
//!     Box::new(NullCaptureBackend),
//! );
//! session.start();
//! for event in session.handle(InputEvent::AdvanceStep) {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod error;
pub mod event;
pub mod interaction;
pub mod scene;
pub mod session;
pub mod spatial;
pub mod tutorial;
pub mod visibility;
pub mod voice;

pub use error::{EngineError, Result};
pub use event::{EngineEvent, EventBus, EventKind, InputEvent};
pub use interaction::{DragSnapEngine, SnapTransition};
pub use scene::{EntityId, EntityRegistry, SceneManifest, SpatialEntity};
pub use session::TutorialSession;
pub use spatial::{Point3D, Quaternion, Vector3D};
pub use tutorial::{Gate, StepScript, TutorialMachine};
pub use visibility::{VisibilityDelta, VisibilityTracker};
