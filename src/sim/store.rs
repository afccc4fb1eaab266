//! Entity store
//!
//! Dense, unordered entity storage on top of an `Arena`, with a parallel
//! id -> slot map. Removal swaps the last entity into the freed slot, so slot
//! indices are not stable; everything outside this module addresses entities
//! by id.

use std::collections::HashMap;

use glam::Vec2;

use super::arena::Arena;
use super::entity::{Entity, EntityId, EntityKind};
use super::presets::PresetTable;
use super::sprites::SpriteSizes;
use crate::consts::MAX_ENTITIES;
use crate::error::SimError;

#[derive(Debug, Clone)]
pub struct EntityStore {
    arena: Arena<Entity>,
    slots: HashMap<EntityId, usize>,
    presets: PresetTable,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new(Arena::with_capacity(MAX_ENTITIES), PresetTable::standard())
    }
}

impl EntityStore {
    pub fn new(arena: Arena<Entity>, presets: PresetTable) -> Self {
        let capacity = arena.capacity();
        Self {
            arena,
            slots: HashMap::with_capacity(capacity),
            presets,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(&id).and_then(|&slot| self.arena.get(slot))
    }

    pub fn find_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = *self.slots.get(&id)?;
        self.arena.get_mut(slot)
    }

    /// Lookup for ids that must resolve (recorded contacts, the id being updated)
    pub fn require(&self, id: EntityId) -> Result<&Entity, SimError> {
        self.find(id).ok_or(SimError::MissingEntity { id })
    }

    pub fn require_mut(&mut self, id: EntityId) -> Result<&mut Entity, SimError> {
        self.find_mut(id).ok_or(SimError::MissingEntity { id })
    }

    /// Live entities in slot order
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.arena.iter()
    }

    /// Snapshot of live ids, safe to hold across spawns and despawns
    pub fn ids(&self) -> Vec<EntityId> {
        self.arena.iter().map(|e| e.id).collect()
    }

    /// Ids of live entities matching a predicate
    pub fn ids_where<F>(&self, pred: F) -> Vec<EntityId>
    where
        F: Fn(&Entity) -> bool,
    {
        self.arena.iter().filter(|e| pred(e)).map(|e| e.id).collect()
    }

    pub fn count_where<F>(&self, pred: F) -> usize
    where
        F: Fn(&Entity) -> bool,
    {
        self.arena.iter().filter(|e| pred(e)).count()
    }

    /// One past the largest live id
    pub fn next_id(&self) -> EntityId {
        self.arena.iter().map(|e| e.id).max().map_or(1, |id| id + 1)
    }

    /// Create a runtime entity with a fresh id, sized from its base sprite.
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        pos: Vec2,
        sizes: &dyn SpriteSizes,
    ) -> Result<&mut Entity, SimError> {
        let id = self.next_id();
        self.insert(id, kind, pos, None, None, sizes)
    }

    /// Create an entity with a given id. A positive `w`/`h` overrides the
    /// base sprite size on that axis.
    pub fn insert(
        &mut self,
        id: EntityId,
        kind: EntityKind,
        pos: Vec2,
        w: Option<f32>,
        h: Option<f32>,
        sizes: &dyn SpriteSizes,
    ) -> Result<&mut Entity, SimError> {
        if self.slots.contains_key(&id) {
            return Err(SimError::DuplicateId { id });
        }

        let base = sizes.base_size(kind);
        let pick = |over: Option<f32>, base: Option<f32>| {
            over.filter(|v| *v > 0.0)
                .or(base)
                .ok_or(SimError::MissingDimensions { kind })
        };
        let size = Vec2::new(pick(w, base.map(|b| b.x))?, pick(h, base.map(|b| b.y))?);

        let mut entity = Entity::new(id, kind);
        self.presets.apply(&mut entity);
        entity.pos = pos;
        entity.size = size;

        let slot = self.arena.len();
        let stored = self.arena.push(entity)?;
        self.slots.insert(id, slot);
        Ok(stored)
    }

    /// Remove an entity; the last entity moves into its slot.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.slots.remove(&id)?;
        let removed = self.arena.swap_remove(slot)?;
        if let Some(moved) = self.arena.get(slot) {
            self.slots.insert(moved.id, slot);
        }
        Some(removed)
    }

    /// Remove every entity
    pub fn clear(&mut self) {
        self.arena.clear();
        self.slots.clear();
    }
}
