//! Typed entity registry keyed by name

use std::collections::HashMap;

use super::{EntityId, SpatialEntity};
use crate::error::{EngineError, Result};
use crate::spatial::Point3D;

/// Owns every scene entity; hands out [`EntityId`]s.
///
/// Entities live for the whole scene session, so ids never dangle.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<SpatialEntity>,
    by_name: HashMap<String, EntityId>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity. Names must be unique and parents already registered.
    pub fn register(&mut self, mut entity: SpatialEntity) -> Result<EntityId> {
        if self.by_name.contains_key(&entity.name) {
            return Err(EngineError::DuplicateEntity(entity.name));
        }
        if let Some(parent) = entity.parent {
            if parent.index() >= self.entities.len() {
                return Err(EngineError::UnknownEntity(format!("#{}", parent.index())));
            }
        }

        let id = EntityId(self.entities.len() as u32);
        entity.home = entity.position;
        self.by_name.insert(entity.name.clone(), id);
        self.entities.push(entity);
        Ok(id)
    }

    pub fn id(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    /// Like [`id`](Self::id) but as an error for unknown names
    pub fn require(&self, name: &str) -> Result<EntityId> {
        self.id(name)
            .ok_or_else(|| EngineError::UnknownEntity(name.to_string()))
    }

    pub fn get(&self, id: EntityId) -> Option<&SpatialEntity> {
        self.entities.get(id.index())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut SpatialEntity> {
        self.entities.get_mut(id.index())
    }

    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.get(id).map(|e| e.name.as_str())
    }

    pub fn position(&self, id: EntityId) -> Option<Point3D> {
        self.get(id).map(|e| e.position)
    }

    pub fn set_position(&mut self, id: EntityId, position: Point3D) {
        if let Some(entity) = self.get_mut(id) {
            entity.position = position;
        }
    }

    pub fn set_snapped(&mut self, id: EntityId, snapped: bool) {
        if let Some(entity) = self.get_mut(id) {
            entity.snapped = snapped;
        }
    }

    /// Set the entity's own enabled flag; returns true if it changed
    pub fn set_enabled(&mut self, id: EntityId, enabled: bool) -> bool {
        match self.get_mut(id) {
            Some(entity) if entity.enabled != enabled => {
                entity.enabled = enabled;
                true
            }
            _ => false,
        }
    }

    /// Enabled itself and through every ancestor
    pub fn is_active(&self, id: EntityId) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            match self.get(id) {
                Some(entity) if entity.enabled => current = entity.parent,
                _ => return false,
            }
        }
        true
    }

    /// Nearest hotspot at or above `id` (taps often land on a child mesh)
    pub fn resolve_hotspot(&self, id: EntityId) -> Option<EntityId> {
        let mut current = Some(id);
        while let Some(id) = current {
            let entity = self.get(id)?;
            if entity.capabilities.hotspot {
                return Some(id);
            }
            current = entity.parent;
        }
        None
    }

    /// Snap targets in registration order
    pub fn snap_targets(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.iter()
            .filter(|(_, e)| e.is_snap_target())
            .map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &SpatialEntity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId(i as u32), e))
    }

    /// Put every entity back where it was registered
    pub fn reset_positions(&mut self) {
        for entity in &mut self.entities {
            entity.position = entity.home;
            entity.snapped = false;
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (EntityRegistry, EntityId, EntityId) {
        let mut registry = EntityRegistry::new();
        let mic = registry
            .register(SpatialEntity::new("microphone", Point3D::ORIGIN))
            .unwrap();
        let button = registry
            .register(
                SpatialEntity::new("MicrophoneInteractive", Point3D::ORIGIN)
                    .hotspot()
                    .with_parent(mic),
            )
            .unwrap();
        (registry, mic, button)
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut registry = EntityRegistry::new();
        registry
            .register(SpatialEntity::new("table", Point3D::ORIGIN))
            .unwrap();
        let err = registry
            .register(SpatialEntity::new("table", Point3D::ORIGIN))
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateEntity(name) if name == "table"));
    }

    #[test]
    fn test_lookup() {
        let (registry, mic, _) = sample();
        assert_eq!(registry.id("microphone"), Some(mic));
        assert_eq!(registry.name(mic), Some("microphone"));
        assert!(registry.require("dragon").is_err());
    }

    #[test]
    fn test_active_follows_parent() {
        let (mut registry, mic, button) = sample();
        assert!(registry.is_active(button));

        assert!(registry.set_enabled(mic, false));
        assert!(!registry.set_enabled(mic, false));
        assert!(!registry.is_active(button));
        assert!(registry.get(button).unwrap().enabled);
    }

    #[test]
    fn test_resolve_hotspot_from_child() {
        let (mut registry, _, button) = sample();
        let mesh = registry
            .register(SpatialEntity::new("mic_mesh", Point3D::ORIGIN).with_parent(button))
            .unwrap();
        assert_eq!(registry.resolve_hotspot(mesh), Some(button));
    }

    #[test]
    fn test_reset_positions() {
        let mut registry = EntityRegistry::new();
        let hero = registry
            .register(SpatialEntity::new("hero", Point3D::new(0.0, 1.0, 0.0)).draggable())
            .unwrap();
        registry.set_position(hero, Point3D::new(2.0, 2.0, 2.0));
        registry.set_snapped(hero, true);

        registry.reset_positions();
        assert_eq!(registry.position(hero), Some(Point3D::new(0.0, 1.0, 0.0)));
        assert!(!registry.get(hero).unwrap().snapped);
    }
}
