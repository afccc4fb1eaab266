//! Sprite frame lists and base sizes per entity type
//!
//! The renderer owns the bitmaps; the simulation only needs frame names (for
//! the render snapshot) and base dimensions (to size entities the level does
//! not size explicitly).

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::EntityKind;
use crate::error::SimError;

/// Supplies an entity type's default sprite dimensions
pub trait SpriteSizes {
    fn base_size(&self, kind: EntityKind) -> Option<Vec2>;
}

const PLAYER_FRAMES: &[&str] = &[
    "girl_walk_frame1",
    "girl_walk_frame2",
    "girl_back_frame1",
    "girl_back_frame2",
    "girl_jump_frame1",
    "girl_jump_frame2",
    "girl_dead_frame1",
    "girl_dead_frame2",
    "girl_pepper_frame1",
    "girl_pepper_frame2",
    "girl_win_frame1",
    "girl_win_frame2",
];

fn default_frames(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Player => PLAYER_FRAMES,
        EntityKind::Hotdog => &["hotdog_frame1", "hotdog_frame2"],
        EntityKind::Egg => &["egg_legs_frame1", "egg_legs_frame2"],
        EntityKind::Platform => &["platform_tile"],
        EntityKind::Ladder => &["ladder_tile"],
        EntityKind::Plate => &["plate"],
        EntityKind::Tablecloth => &["tablecloth_tile"],
        EntityKind::TopBun => &["top_bun"],
        EntityKind::Tomato => &["tomato"],
        EntityKind::Meat => &["meat"],
        EntityKind::BottomBun => &["bottom_bun"],
        EntityKind::Door => &["door_frame1", "door_frame2"],
        EntityKind::Wall => &[],
    }
}

fn default_size(kind: EntityKind) -> Option<Vec2> {
    let (w, h) = match kind {
        EntityKind::Player | EntityKind::Hotdog | EntityKind::Egg => (16.0, 16.0),
        EntityKind::Platform => (8.0, 4.0),
        EntityKind::Ladder | EntityKind::Tablecloth => (8.0, 8.0),
        EntityKind::Plate => (40.0, 6.0),
        EntityKind::TopBun | EntityKind::BottomBun => (32.0, 8.0),
        EntityKind::Tomato | EntityKind::Meat => (32.0, 6.0),
        EntityKind::Door => (16.0, 24.0),
        EntityKind::Wall => return None,
    };
    Some(Vec2::new(w, h))
}

/// Names of the sprite bitmaps shipped with the game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteManifest {
    pub frames: Vec<String>,
}

impl SpriteManifest {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let manifest = Self::from_json(&json)?;
        log::info!(
            "Loaded {} sprite names from {}",
            manifest.frames.len(),
            path.as_ref().display()
        );
        Ok(manifest)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.frames.iter().any(|f| f == name)
    }
}

/// Ordered frame names and base size for every entity type
#[derive(Debug, Clone)]
pub struct SpriteTable {
    frames: [&'static [&'static str]; EntityKind::ALL.len()],
    sizes: [Option<Vec2>; EntityKind::ALL.len()],
}

impl Default for SpriteTable {
    fn default() -> Self {
        Self {
            frames: EntityKind::ALL.map(default_frames),
            sizes: EntityKind::ALL.map(default_size),
        }
    }
}

impl SpriteTable {
    /// Override a type's base size, typically with the loaded bitmap's size
    pub fn with_base_size(mut self, kind: EntityKind, w: f32, h: f32) -> Self {
        self.sizes[kind.index()] = Some(Vec2::new(w, h));
        self
    }

    pub fn frames(&self, kind: EntityKind) -> &'static [&'static str] {
        self.frames[kind.index()]
    }

    /// Frame name at `index`, if the type has that many frames
    pub fn frame(&self, kind: EntityKind, index: usize) -> Option<&'static str> {
        self.frames(kind).get(index).copied()
    }

    /// Default table, checked against the shipped sprite set
    pub fn checked(manifest: &SpriteManifest) -> Result<Self, SimError> {
        let table = Self::default();
        table.validate(|name| manifest.contains(name))?;
        Ok(table)
    }

    /// Check every frame name against the loaded asset set
    pub fn validate<F>(&self, has_asset: F) -> Result<(), SimError>
    where
        F: Fn(&str) -> bool,
    {
        for kind in EntityKind::ALL {
            if let Some(missing) = self.frames(kind).iter().find(|name| !has_asset(name)) {
                return Err(SimError::UnknownSprite {
                    kind,
                    frame: (*missing).to_string(),
                });
            }
        }
        Ok(())
    }
}

impl SpriteSizes for SpriteTable {
    fn base_size(&self, kind: EntityKind) -> Option<Vec2> {
        self.sizes[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_frame_lookup() {
        let table = SpriteTable::default();
        assert_eq!(table.frame(EntityKind::Player, 2), Some("girl_back_frame1"));
        assert_eq!(table.frame(EntityKind::Hotdog, 2), None);
        assert!(table.frames(EntityKind::Wall).is_empty());
    }

    #[test]
    fn test_validate_reports_missing_frame() {
        let table = SpriteTable::default();
        let mut assets: HashSet<&str> = EntityKind::ALL
            .iter()
            .flat_map(|k| table.frames(*k).iter().copied())
            .collect();
        assert!(table.validate(|name| assets.contains(name)).is_ok());

        assets.remove("meat");
        let err = table.validate(|name| assets.contains(name)).unwrap_err();
        assert!(matches!(err, SimError::UnknownSprite { kind: EntityKind::Meat, .. }));
    }

    #[test]
    fn test_bundled_manifest_covers_table() {
        let manifest = SpriteManifest::from_json(include_str!("../../assets/sprites.json")).unwrap();
        assert!(SpriteTable::checked(&manifest).is_ok());

        let short = SpriteManifest {
            frames: vec!["plate".to_string()],
        };
        let err = SpriteTable::checked(&short).unwrap_err();
        assert!(matches!(err, SimError::UnknownSprite { kind: EntityKind::Player, .. }));
    }

    #[test]
    fn test_base_size_override() {
        let table = SpriteTable::default().with_base_size(EntityKind::Wall, 4.0, 100.0);
        assert_eq!(table.base_size(EntityKind::Wall), Some(Vec2::new(4.0, 100.0)));
        assert_eq!(
            SpriteTable::default().base_size(EntityKind::Wall),
            None
        );
    }
}
