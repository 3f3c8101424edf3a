//! Scene manifests: a flat TOML description of the entities a scene loads
//!
//! ```toml
//! [[entity]]
//! name = "TestAnimation"
//! position = { x = 0.0, y = 0.9, z = -0.8 }
//! draggable = true
//!
//! [[entity]]
//! name = "Indicator8"
//! position = { x = -0.4, y = 1.0, z = -1.0 }
//! snap_target = true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{EntityRegistry, SpatialEntity};
use crate::error::{EngineError, Result};
use crate::spatial::{Point3D, Vector3D};
use realm_guide_config::ConfigError;

/// One entity entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityManifest {
    pub name: String,
    #[serde(default)]
    pub position: Point3D,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub draggable: bool,
    #[serde(default = "default_enabled")]
    pub snappable: bool,
    #[serde(default)]
    pub snap_target: bool,
    #[serde(default)]
    pub snap_radius: Option<f32>,
    #[serde(default)]
    pub hotspot: bool,
    #[serde(default)]
    pub trigger: Option<Vector3D>,
}

fn default_enabled() -> bool {
    true
}

impl EntityManifest {
    pub fn new(name: impl Into<String>, position: Point3D) -> Self {
        Self {
            name: name.into(),
            position,
            parent: None,
            enabled: true,
            draggable: false,
            snappable: true,
            snap_target: false,
            snap_radius: None,
            hotspot: false,
            trigger: None,
        }
    }
}

/// Ordered list of entities; parents must precede their children
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneManifest {
    #[serde(default, rename = "entity")]
    pub entities: Vec<EntityManifest>,
}

impl SceneManifest {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
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

    /// Register every entry into a fresh registry
    pub fn build(&self) -> Result<EntityRegistry> {
        let mut registry = EntityRegistry::new();
        for entry in &self.entities {
            let mut entity = SpatialEntity::new(&entry.name, entry.position);
            if let Some(parent) = &entry.parent {
                entity = entity.with_parent(registry.require(parent)?);
            }
            if entry.draggable {
                entity = if entry.snappable {
                    entity.draggable()
                } else {
                    entity.free_draggable()
                };
            }
            if entry.snap_target {
                entity = entity.snap_target(entry.snap_radius);
            }
            if entry.hotspot {
                entity = entity.hotspot();
            }
            if let Some(half_extents) = entry.trigger {
                entity = entity.with_trigger(half_extents);
            }
            if !entry.enabled {
                entity = entity.disabled();
            }
            registry.register(entity)?;
        }
        tracing::debug!("Built scene with {} entities", registry.len());
        Ok(registry)
    }
}
