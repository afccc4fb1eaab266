//! Level descriptions
//!
//! A level is a flat list of entity records. Records without a size take the
//! base sprite size of their type; walls always need an explicit size.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind};
use super::sprites::SpriteSizes;
use super::store::EntityStore;
use crate::error::SimError;

/// One entity placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Centre position
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f32>,
}

impl LevelRecord {
    pub fn new(id: EntityId, kind: EntityKind, x: f32, y: f32) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            w: None,
            h: None,
        }
    }

    pub fn sized(mut self, w: f32, h: f32) -> Self {
        self.w = Some(w);
        self.h = Some(h);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub name: String,
    pub entities: Vec<LevelRecord>,
}

impl Level {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let level = Self::from_json(&json)?;
        log::info!(
            "Loaded level '{}' ({} entities) from {}",
            level.name,
            level.entities.len(),
            path.as_ref().display()
        );
        Ok(level)
    }

    /// Id of the player record
    pub fn player_id(&self) -> Result<EntityId, SimError> {
        self.entities
            .iter()
            .find(|r| r.kind == EntityKind::Player)
            .map(|r| r.id)
            .ok_or(SimError::MissingPlayer)
    }

    /// Create every record's entity in `store`. Returns the player id.
    pub fn populate(
        &self,
        store: &mut EntityStore,
        sizes: &dyn SpriteSizes,
    ) -> Result<EntityId, SimError> {
        let player = self.player_id()?;
        for r in &self.entities {
            store.insert(r.id, r.kind, Vec2::new(r.x, r.y), r.w, r.h, sizes)?;
        }
        Ok(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::sprites::SpriteTable;

    const SMALL: &str = r#"{
        "name": "small",
        "entities": [
            { "id": 0, "kind": "player", "x": 40, "y": 92 },
            { "id": 1, "kind": "platform", "x": 160, "y": 102, "w": 320 },
            { "id": 2, "kind": "wall", "x": -2, "y": 135, "w": 4, "h": 270 },
            { "id": 3, "kind": "top_bun", "x": 100, "y": 96 }
        ]
    }"#;

    #[test]
    fn test_populate_sizes_entities() {
        let level = Level::from_json(SMALL).unwrap();
        let mut store = EntityStore::default();
        let player = level.populate(&mut store, &SpriteTable::default()).unwrap();

        assert_eq!(player, 0);
        assert_eq!(store.len(), 4);
        assert_eq!(store.find(1).unwrap().size, Vec2::new(320.0, 4.0));
        assert_eq!(store.find(2).unwrap().size, Vec2::new(4.0, 270.0));
        assert_eq!(store.find(3).unwrap().kind, EntityKind::TopBun);
    }

    #[test]
    fn test_level_without_player() {
        let level = Level {
            name: String::new(),
            entities: vec![LevelRecord::new(1, EntityKind::Platform, 0.0, 0.0)],
        };
        let mut store = EntityStore::default();
        let err = level.populate(&mut store, &SpriteTable::default()).unwrap_err();
        assert!(matches!(err, SimError::MissingPlayer));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unsized_wall_is_rejected() {
        let level = Level {
            name: String::new(),
            entities: vec![
                LevelRecord::new(0, EntityKind::Player, 0.0, 0.0),
                LevelRecord::new(1, EntityKind::Wall, 0.0, 0.0),
            ],
        };
        let err = level
            .populate(&mut EntityStore::default(), &SpriteTable::default())
            .unwrap_err();
        assert!(matches!(err, SimError::MissingDimensions { kind: EntityKind::Wall }));
    }

    #[test]
    fn test_bundled_level_loads() {
        let level = Level::from_json(include_str!("../../assets/levels/burger.json")).unwrap();
        let mut store = EntityStore::default();
        assert_eq!(level.populate(&mut store, &SpriteTable::default()).unwrap(), 0);
        assert_eq!(store.count_where(|e| e.kind.is_topping()), 8);
        assert_eq!(store.count_where(|e| e.kind == EntityKind::Door), 2);
    }

    #[test]
    fn test_bad_kind_is_json_error() {
        let err = Level::from_json(r#"{ "entities": [{ "id": 0, "kind": "pickle", "x": 0, "y": 0 }] }"#)
            .unwrap_err();
        assert!(matches!(err, SimError::Json(_)));
    }
}
