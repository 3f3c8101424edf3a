//! Bundled demo scene

use std::path::Path;

use realm_guide_core::{EntityRegistry, Result, SceneManifest};

const DEMO_SCENE: &str = include_str!("../assets/demo_scene.toml");

pub fn demo_manifest() -> Result<SceneManifest> {
    SceneManifest::from_toml_str(DEMO_SCENE)
}

/// Load `path` when given, the bundled tabletop otherwise
pub fn load_scene(path: Option<&Path>) -> Result<EntityRegistry> {
    let manifest = match path {
        Some(path) => {
            tracing::info!("Loading scene from {}", path.display());
            SceneManifest::from_file(path)?
        }
        None => demo_manifest()?,
    };
    manifest.build()
}
