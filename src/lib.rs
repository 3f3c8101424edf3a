//! realm-guide: placement and tutorial-gating engine for AR story tutorials
//!
//! This crate re-exports the engine and its configuration so hosts can
//! depend on one package. The terminal demo lives in `realm-guide-app`.

pub use realm_guide_config as config;
pub use realm_guide_core::*;
