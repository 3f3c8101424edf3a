//! Error taxonomy for the tutorial engine
//!
//! None of these are fatal. The session logs and drops most of them; only
//! [`EngineError::CaptureUnavailable`] is surfaced to the presentation layer.

use realm_guide_config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Entity '{0}' cannot be dragged")]
    InvalidDragTarget(String),

    #[error("No active drag session for '{0}'")]
    NoActiveSession(String),

    #[error("Drag already in progress for '{active}'")]
    DragInProgress { active: String },

    #[error("Gate event {received} does not match pending gate {pending}")]
    StaleGateEvent { pending: String, received: String },

    #[error("Speech capture unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("Step index {0} out of range")]
    StepIndexOutOfRange(u32),

    #[error("Next is locked until {0} is satisfied")]
    GateLocked(String),

    #[error("Unknown entity '{0}'")]
    UnknownEntity(String),

    #[error("Duplicate entity '{0}'")]
    DuplicateEntity(String),

    #[error("Invalid tutorial script: {0}")]
    InvalidScript(String),

    #[error("Unknown animation sequence '{0}'")]
    UnknownSequence(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to parse scene manifest: {0}")]
    Manifest(#[from] toml::de::Error),

    #[error("Failed to parse step script: {0}")]
    ScriptParse(toml::de::Error),
}

impl EngineError {
    /// Whether the presentation layer should show this error to the user
    pub fn is_user_visible(&self) -> bool {
        matches!(self, EngineError::CaptureUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
