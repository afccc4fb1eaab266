//! Per-type default tunables applied when an entity is created

use glam::Vec2;

use super::entity::{Entity, EntityKind};

/// Default tunables for one entity type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub speed: Vec2,
    pub damp: Vec2,
    pub hitbox: Vec2,
    pub movable: bool,
    pub permeable: bool,
}

impl Preset {
    /// Immovable, impermeable terrain
    pub const STATIC: Preset = Preset {
        speed: Vec2::ZERO,
        damp: Vec2::ONE,
        hitbox: Vec2::ZERO,
        movable: false,
        permeable: false,
    };

    pub const PLAYER: Preset = Preset {
        speed: Vec2::new(800.0, 1000.0),
        damp: Vec2::new(0.001, 0.9),
        hitbox: Vec2::ZERO,
        movable: true,
        permeable: true,
    };

    pub const NPC: Preset = Preset {
        speed: Vec2::new(400.0, 500.0),
        damp: Vec2::new(0.001, 0.9),
        hitbox: Vec2::ZERO,
        movable: true,
        permeable: true,
    };

    /// Toppings only move vertically and sink slowly when pushed
    pub const TOPPING: Preset = Preset {
        speed: Vec2::new(0.0, 200.0),
        damp: Vec2::new(0.0001, 0.5),
        hitbox: Vec2::ZERO,
        movable: false,
        permeable: false,
    };

    /// Plates collide on a thin strip so toppings settle on the rim
    pub const PLATE: Preset = Preset {
        hitbox: Vec2::new(0.0, 2.0),
        ..Preset::STATIC
    };

    /// Ladders and doors are detected but never block
    pub const PASSABLE: Preset = Preset {
        permeable: true,
        ..Preset::STATIC
    };
}

/// Lookup table from entity type to its preset
#[derive(Debug, Clone)]
pub struct PresetTable {
    entries: [Preset; EntityKind::ALL.len()],
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl PresetTable {
    pub fn standard() -> Self {
        let entries = EntityKind::ALL.map(|kind| match kind {
            EntityKind::Player => Preset::PLAYER,
            EntityKind::Hotdog | EntityKind::Egg => Preset::NPC,
            EntityKind::TopBun | EntityKind::Tomato | EntityKind::Meat | EntityKind::BottomBun => {
                Preset::TOPPING
            }
            EntityKind::Plate => Preset::PLATE,
            EntityKind::Ladder | EntityKind::Door => Preset::PASSABLE,
            EntityKind::Platform | EntityKind::Tablecloth | EntityKind::Wall => Preset::STATIC,
        });
        Self { entries }
    }

    #[inline]
    pub fn get(&self, kind: EntityKind) -> &Preset {
        &self.entries[kind.index()]
    }

    /// Copy the type's tunables onto an entity
    pub fn apply(&self, entity: &mut Entity) {
        let preset = self.get(entity.kind);
        entity.speed = preset.speed;
        entity.damp = preset.damp;
        entity.hitbox = preset.hitbox;
        entity.movable = preset.movable;
        entity.permeable = preset.permeable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_presets() {
        let table = PresetTable::standard();
        assert_eq!(table.get(EntityKind::Player).speed, Vec2::new(800.0, 1000.0));
        assert_eq!(table.get(EntityKind::Egg), table.get(EntityKind::Hotdog));
        assert!(table.get(EntityKind::Ladder).permeable);
        assert!(table.get(EntityKind::Door).permeable);
        assert!(!table.get(EntityKind::Platform).permeable);
        assert_eq!(table.get(EntityKind::Plate).hitbox.y, 2.0);
        assert!(!table.get(EntityKind::Meat).movable);
    }

    #[test]
    fn test_apply_overwrites_tunables() {
        let table = PresetTable::standard();
        let mut e = Entity::new(3, EntityKind::Hotdog);
        table.apply(&mut e);
        assert!(e.movable && e.permeable);
        assert_eq!(e.damp, Vec2::new(0.001, 0.9));
    }
}
