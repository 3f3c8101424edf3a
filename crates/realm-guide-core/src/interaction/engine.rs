//! The drag/snap state machine

use std::collections::BTreeMap;

use realm_guide_config::DragConfig;

use super::DragSession;
use crate::error::{EngineError, Result};
use crate::scene::{EntityId, EntityRegistry};
use crate::spatial::{Point3D, Quaternion, Vector3D};

/// A change of the snap target an entity is locked to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapTransition {
    pub entity: EntityId,
    pub from: Option<EntityId>,
    pub to: Option<EntityId>,
}

/// Where a draggable entity is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle { snapped: bool },
    Dragging { snapped: bool },
}

/// Tracks the active drag and every draggable's snap lock.
///
/// Locks outlive drags: an entity dropped on a waypoint stays locked to it
/// ("resting at waypoint") until it is dragged away, the target is disabled,
/// or the engine is reset.
#[derive(Debug)]
pub struct DragSnapEngine {
    config: DragConfig,
    session: Option<DragSession>,
    locks: BTreeMap<EntityId, EntityId>,
    last_dragged: Option<EntityId>,
}

impl DragSnapEngine {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            session: None,
            locks: BTreeMap::new(),
            last_dragged: None,
        }
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// The entity currently being dragged
    pub fn targeted_entity(&self) -> Option<EntityId> {
        self.session.as_ref().map(|s| s.entity)
    }

    /// Target `entity` is locked to, if any
    pub fn snapped_target(&self, entity: EntityId) -> Option<EntityId> {
        self.locks.get(&entity).copied()
    }

    /// Lock of the entity being dragged, or of the last one dragged
    pub fn current_snapped_indicator(&self) -> Option<EntityId> {
        self.targeted_entity()
            .or(self.last_dragged)
            .and_then(|e| self.snapped_target(e))
    }

    pub fn phase(&self, entity: EntityId) -> DragPhase {
        let snapped = self.locks.contains_key(&entity);
        if self.targeted_entity() == Some(entity) {
            DragPhase::Dragging { snapped }
        } else {
            DragPhase::Idle { snapped }
        }
    }

    /// Acquire radius for a target
    pub fn snap_radius(&self, registry: &EntityRegistry, target: EntityId) -> f32 {
        registry
            .get(target)
            .and_then(|e| e.capabilities.snap_target)
            .and_then(|t| t.snap_radius)
            .unwrap_or(self.config.snap_radius)
    }

    /// Release radius for a target
    pub fn break_radius(&self, registry: &EntityRegistry, target: EntityId) -> f32 {
        self.config.break_radius(self.snap_radius(registry, target))
    }

    /// Start dragging `entity`.
    ///
    /// Rejected (state untouched) when the entity can't be dragged or a
    /// different entity is already being dragged. Beginning again on the
    /// entity already being dragged is a no-op.
    pub fn begin_drag(
        &mut self,
        registry: &EntityRegistry,
        entity: EntityId,
        world_position: Point3D,
        orientation: Quaternion,
    ) -> Result<()> {
        let Some(data) = registry.get(entity) else {
            return Err(EngineError::UnknownEntity(format!("#{}", entity.index())));
        };
        if !data.is_draggable() || !registry.is_active(entity) {
            return Err(EngineError::InvalidDragTarget(data.name.clone()));
        }

        if let Some(session) = &self.session {
            if session.entity == entity {
                return Ok(());
            }
            let active = registry.name(session.entity).unwrap_or_default().to_string();
            return Err(EngineError::DragInProgress { active });
        }

        tracing::debug!("Drag started on {}", data.name);
        self.session = Some(DragSession::new(entity, world_position, orientation));
        self.last_dragged = Some(entity);
        Ok(())
    }

    /// Move the dragged entity by a cumulative pointer translation and
    /// re-evaluate its snap lock.
    pub fn update_drag(
        &mut self,
        registry: &mut EntityRegistry,
        entity: EntityId,
        pointer_delta: Vector3D,
    ) -> Result<Option<SnapTransition>> {
        let session = self.require_session(registry, entity)?;
        let candidate = session.candidate(pointer_delta, self.config.dampening);

        let previous = self.snapped_target(entity);
        let held = previous.filter(|&target| {
            registry.is_active(target)
                && registry
                    .position(target)
                    .map(|p| candidate.distance(&p) <= self.break_radius(registry, target))
                    .unwrap_or(false)
        });
        let snappable = registry.get(entity).map(|e| e.is_snappable()).unwrap_or(false);
        let next = match held {
            Some(target) => Some(target),
            None if snappable => self.acquire(registry, entity, candidate),
            None => None,
        };

        match next.and_then(|t| registry.position(t).map(|p| (t, p))) {
            Some((target, position)) => {
                registry.set_position(entity, position);
                registry.set_snapped(entity, true);
                self.locks.insert(entity, target);
            }
            None => {
                registry.set_position(entity, candidate);
                registry.set_snapped(entity, false);
                self.locks.remove(&entity);
            }
        }

        Ok(self.transition(entity, previous))
    }

    /// Finish the drag. A locked entity lands exactly on its target.
    pub fn end_drag(&mut self, registry: &mut EntityRegistry, entity: EntityId) -> Result<()> {
        self.require_session(registry, entity)?;

        if let Some(target) = self.snapped_target(entity) {
            if let Some(position) = registry.position(target) {
                registry.set_position(entity, position);
            }
        }

        tracing::debug!(
            "Drag ended on {} (snapped: {})",
            registry.name(entity).unwrap_or_default(),
            self.locks.contains_key(&entity)
        );
        self.session = None;
        Ok(())
    }

    /// Trigger volumes of `a` and `b` started overlapping
    pub fn collision_begin(
        &mut self,
        registry: &mut EntityRegistry,
        a: EntityId,
        b: EntityId,
    ) -> Option<SnapTransition> {
        let (draggable, target) = self.identify_pair(registry, a, b)?;
        if !registry.get(draggable)?.is_snappable() {
            return None;
        }

        let position = registry.position(target)?;
        let previous = self.locks.insert(draggable, target);
        registry.set_position(draggable, position);
        registry.set_snapped(draggable, true);
        self.transition(draggable, previous)
    }

    /// Trigger volumes of `a` and `b` stopped overlapping
    pub fn collision_end(
        &mut self,
        registry: &mut EntityRegistry,
        a: EntityId,
        b: EntityId,
    ) -> Option<SnapTransition> {
        let (draggable, target) = self.identify_pair(registry, a, b)?;
        if self.snapped_target(draggable) != Some(target) {
            return None;
        }

        self.locks.remove(&draggable);
        registry.set_snapped(draggable, false);
        self.transition(draggable, Some(target))
    }

    /// Drop state that refers to entities which are no longer active.
    ///
    /// Locks on inactive targets are released without moving the entity,
    /// and the drag session is reset if its entity lost its lock this way or
    /// was itself hidden.
    pub fn on_entities_disabled(&mut self, registry: &mut EntityRegistry) -> Vec<SnapTransition> {
        let stale: Vec<(EntityId, EntityId)> = self
            .locks
            .iter()
            .filter(|(entity, target)| !registry.is_active(**target) || !registry.is_active(**entity))
            .map(|(&entity, &target)| (entity, target))
            .collect();

        let mut transitions = Vec::with_capacity(stale.len());
        for (entity, target) in stale {
            self.locks.remove(&entity);
            registry.set_snapped(entity, false);
            tracing::info!(
                "Released {} from disabled target {}",
                registry.name(entity).unwrap_or_default(),
                registry.name(target).unwrap_or_default()
            );
            if self.targeted_entity() == Some(entity) {
                self.session = None;
            }
            transitions.push(SnapTransition {
                entity,
                from: Some(target),
                to: None,
            });
        }

        if let Some(entity) = self.targeted_entity() {
            if !registry.is_active(entity) {
                tracing::debug!("Dragged entity hidden, dropping session");
                self.session = None;
            }
        }

        transitions
    }

    /// Forget every session and lock
    pub fn reset(&mut self, registry: &mut EntityRegistry) -> Vec<SnapTransition> {
        let transitions = std::mem::take(&mut self.locks)
            .into_iter()
            .map(|(entity, target)| {
                registry.set_snapped(entity, false);
                SnapTransition {
                    entity,
                    from: Some(target),
                    to: None,
                }
            })
            .collect();
        self.session = None;
        self.last_dragged = None;
        transitions
    }

    fn require_session(&self, registry: &EntityRegistry, entity: EntityId) -> Result<DragSession> {
        match &self.session {
            Some(session) if session.entity == entity => Ok(session.clone()),
            _ => Err(EngineError::NoActiveSession(
                registry.name(entity).unwrap_or_default().to_string(),
            )),
        }
    }

    /// First active target (registration order) whose snap radius contains `candidate`
    fn acquire(&self, registry: &EntityRegistry, entity: EntityId, candidate: Point3D) -> Option<EntityId> {
        registry
            .snap_targets()
            .filter(|&target| target != entity && registry.is_active(target))
            .find(|&target| {
                registry
                    .position(target)
                    .map(|p| candidate.distance(&p) < self.snap_radius(registry, target))
                    .unwrap_or(false)
            })
    }

    /// Orders a collision pair as (draggable, target); both must be active
    fn identify_pair(
        &self,
        registry: &EntityRegistry,
        a: EntityId,
        b: EntityId,
    ) -> Option<(EntityId, EntityId)> {
        if !registry.is_active(a) || !registry.is_active(b) {
            tracing::debug!("Ignoring collision involving an inactive entity");
            return None;
        }
        let (ea, eb) = (registry.get(a)?, registry.get(b)?);
        if ea.is_snap_target() && eb.is_draggable() {
            Some((b, a))
        } else if eb.is_snap_target() && ea.is_draggable() {
            Some((a, b))
        } else {
            None
        }
    }

    fn transition(&self, entity: EntityId, previous: Option<EntityId>) -> Option<SnapTransition> {
        let current = self.snapped_target(entity);
        (current != previous).then_some(SnapTransition {
            entity,
            from: previous,
            to: current,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SpatialEntity;

    struct Fixture {
        registry: EntityRegistry,
        engine: DragSnapEngine,
        hero: EntityId,
        near: EntityId,
        far: EntityId,
    }

    /// Hero at the origin, one target at x=1 and one at x=-1
    fn fixture() -> Fixture {
        let mut registry = EntityRegistry::new();
        let hero = registry
            .register(SpatialEntity::new("hero", Point3D::ORIGIN).draggable())
            .unwrap();
        let near = registry
            .register(SpatialEntity::new("near", Point3D::new(1.0, 0.0, 0.0)).snap_target(None))
            .unwrap();
        let far = registry
            .register(SpatialEntity::new("far", Point3D::new(-1.0, 0.0, 0.0)).snap_target(None))
            .unwrap();
        let config = DragConfig {
            dampening: 0.001,
            snap_radius: 0.3,
            break_factor: 2.0,
            ..DragConfig::default()
        };
        Fixture {
            registry,
            engine: DragSnapEngine::new(config),
            hero,
            near,
            far,
        }
    }

    fn begin(f: &mut Fixture) {
        f.engine
            .begin_drag(&f.registry, f.hero, Point3D::ORIGIN, Quaternion::IDENTITY)
            .unwrap();
    }

    /// Pointer translation that puts the free candidate at world `x`
    fn to_x(f: &mut Fixture, x: f32) -> Option<SnapTransition> {
        f.engine
            .update_drag(&mut f.registry, f.hero, Vector3D::new(x * 1000.0, 0.0, 0.0))
            .unwrap()
    }

    #[test]
    fn test_dragging_iff_session() {
        let mut f = fixture();
        assert!(!f.engine.is_dragging());
        assert_eq!(f.engine.targeted_entity(), None);

        begin(&mut f);
        assert!(f.engine.is_dragging());
        assert_eq!(f.engine.targeted_entity(), Some(f.hero));

        f.engine.end_drag(&mut f.registry, f.hero).unwrap();
        assert!(!f.engine.is_dragging());
        assert_eq!(f.engine.session(), None);
    }

    #[test]
    fn test_begin_rejects_non_draggable_and_second_entity() {
        let mut f = fixture();
        let err = f
            .engine
            .begin_drag(&f.registry, f.near, Point3D::ORIGIN, Quaternion::IDENTITY)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDragTarget(_)));
        assert!(!f.engine.is_dragging());

        let other = f
            .registry
            .register(SpatialEntity::new("other", Point3D::ORIGIN).draggable())
            .unwrap();
        begin(&mut f);
        let err = f
            .engine
            .begin_drag(&f.registry, other, Point3D::ORIGIN, Quaternion::IDENTITY)
            .unwrap_err();
        assert!(matches!(err, EngineError::DragInProgress { active } if active == "hero"));
        assert_eq!(f.engine.targeted_entity(), Some(f.hero));
    }

    #[test]
    fn test_update_without_session() {
        let mut f = fixture();
        let err = f
            .engine
            .update_drag(&mut f.registry, f.hero, Vector3D::ZERO)
            .unwrap_err();
        assert!(matches!(err, EngineError::NoActiveSession(_)));
        assert!(f.engine.end_drag(&mut f.registry, f.hero).is_err());
    }

    #[test]
    fn test_free_movement_inverts_pointer_y() {
        let mut f = fixture();
        begin(&mut f);
        let t = f
            .engine
            .update_drag(&mut f.registry, f.hero, Vector3D::new(0.0, 100.0, 50.0))
            .unwrap();
        assert_eq!(t, None);
        let p = f.registry.position(f.hero).unwrap();
        assert!((p.y + 0.1).abs() < 1e-6);
        assert!((p.z - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_snap_hysteresis() {
        let mut f = fixture();
        begin(&mut f);

        // 0.29 from the target: inside the snap radius
        let t = to_x(&mut f, 0.71).unwrap();
        assert_eq!(t.to, Some(f.near));
        assert_eq!(t.from, None);
        assert_eq!(f.registry.position(f.hero), Some(Point3D::new(1.0, 0.0, 0.0)));
        assert!(f.registry.get(f.hero).unwrap().snapped);

        // 0.5 away: outside snap radius but inside break radius
        assert_eq!(to_x(&mut f, 0.5), None);
        assert_eq!(f.engine.snapped_target(f.hero), Some(f.near));
        assert_eq!(f.registry.position(f.hero), Some(Point3D::new(1.0, 0.0, 0.0)));

        // 0.65 away: past the break radius
        let t = to_x(&mut f, 0.35).unwrap();
        assert_eq!(t.from, Some(f.near));
        assert_eq!(t.to, None);
        let p = f.registry.position(f.hero).unwrap();
        assert!((p.x - 0.35).abs() < 1e-5);
        assert!(!f.registry.get(f.hero).unwrap().snapped);
    }

    #[test]
    fn test_unsnapped_does_not_acquire_inside_break_radius() {
        let mut f = fixture();
        begin(&mut f);
        assert_eq!(to_x(&mut f, 0.5), None);
        assert_eq!(f.engine.snapped_target(f.hero), None);
    }

    #[test]
    fn test_first_target_in_registration_order_wins() {
        let mut registry = EntityRegistry::new();
        let hero = registry
            .register(SpatialEntity::new("hero", Point3D::ORIGIN).draggable())
            .unwrap();
        let first = registry
            .register(SpatialEntity::new("first", Point3D::new(0.25, 0.0, 0.0)).snap_target(None))
            .unwrap();
        registry
            .register(SpatialEntity::new("closer", Point3D::new(0.05, 0.0, 0.0)).snap_target(None))
            .unwrap();
        let mut engine = DragSnapEngine::new(DragConfig::default());
        engine
            .begin_drag(&registry, hero, Point3D::ORIGIN, Quaternion::IDENTITY)
            .unwrap();
        let t = engine
            .update_drag(&mut registry, hero, Vector3D::ZERO)
            .unwrap()
            .unwrap();
        assert_eq!(t.to, Some(first));
    }

    #[test]
    fn test_moving_between_targets_switches_lock() {
        let mut f = fixture();
        begin(&mut f);
        to_x(&mut f, 0.9);
        let t = to_x(&mut f, -0.9).unwrap();
        assert_eq!(t.from, Some(f.near));
        assert_eq!(t.to, Some(f.far));
        assert_eq!(f.engine.snapped_target(f.hero), Some(f.far));
    }

    #[test]
    fn test_end_drag_lands_exactly_and_keeps_lock() {
        let mut f = fixture();
        begin(&mut f);
        to_x(&mut f, 0.8);
        to_x(&mut f, 0.55);
        f.engine.end_drag(&mut f.registry, f.hero).unwrap();

        assert_eq!(f.registry.position(f.hero), Some(Point3D::new(1.0, 0.0, 0.0)));
        assert_eq!(f.engine.phase(f.hero), DragPhase::Idle { snapped: true });
        assert_eq!(f.engine.current_snapped_indicator(), Some(f.near));
    }

    #[test]
    fn test_disabled_target_is_skipped() {
        let mut f = fixture();
        f.registry.set_enabled(f.near, false);
        begin(&mut f);
        assert_eq!(to_x(&mut f, 0.95), None);
        let p = f.registry.position(f.hero).unwrap();
        assert!((p.x - 0.95).abs() < 1e-5);
    }

    #[test]
    fn test_disabling_snapped_target_preserves_position() {
        let mut f = fixture();
        begin(&mut f);
        to_x(&mut f, 0.8);
        assert_eq!(f.engine.current_snapped_indicator(), Some(f.near));
        let before = f.registry.position(f.hero).unwrap();

        f.registry.set_enabled(f.near, false);
        let released = f.engine.on_entities_disabled(&mut f.registry);

        assert_eq!(released.len(), 1);
        assert_eq!(released[0].from, Some(f.near));
        assert_eq!(f.registry.position(f.hero), Some(before));
        assert_eq!(f.engine.current_snapped_indicator(), None);
        assert!(!f.engine.is_dragging());
        assert!(!f.registry.get(f.hero).unwrap().snapped);
    }

    #[test]
    fn test_hiding_dragged_entity_drops_session() {
        let mut f = fixture();
        begin(&mut f);
        f.registry.set_enabled(f.hero, false);
        assert!(f.engine.on_entities_disabled(&mut f.registry).is_empty());
        assert!(!f.engine.is_dragging());
    }

    #[test]
    fn test_collision_path() {
        let mut f = fixture();
        let t = f.engine.collision_begin(&mut f.registry, f.near, f.hero).unwrap();
        assert_eq!(t.to, Some(f.near));
        assert_eq!(f.registry.position(f.hero), Some(Point3D::new(1.0, 0.0, 0.0)));

        // Repeated begin is not a transition
        assert_eq!(f.engine.collision_begin(&mut f.registry, f.hero, f.near), None);

        // Ending an overlap with a different target keeps the lock
        assert_eq!(f.engine.collision_end(&mut f.registry, f.hero, f.far), None);
        assert_eq!(f.engine.snapped_target(f.hero), Some(f.near));

        let t = f.engine.collision_end(&mut f.registry, f.hero, f.near).unwrap();
        assert_eq!(t.to, None);
        assert!(!f.registry.get(f.hero).unwrap().snapped);
    }

    #[test]
    fn test_collision_with_hidden_entity_ignored() {
        let mut f = fixture();
        f.registry.set_enabled(f.far, false);
        assert_eq!(f.engine.collision_begin(&mut f.registry, f.hero, f.far), None);
        assert_eq!(f.engine.snapped_target(f.hero), None);
    }

    #[test]
    fn test_reset_releases_everything() {
        let mut f = fixture();
        begin(&mut f);
        to_x(&mut f, 0.9);
        let released = f.engine.reset(&mut f.registry);
        assert_eq!(released.len(), 1);
        assert!(!f.engine.is_dragging());
        assert_eq!(f.engine.snapped_target(f.hero), None);
    }
}
