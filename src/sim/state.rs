//! Simulation state
//!
//! Everything that survives from one frame to the next: the entity store, the
//! session flags and timers, the last two input samples and the RNG.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::MemoryPool;
use super::entity::{Direction, Entity, EntityId, EntityKind};
use super::level::Level;
use super::presets::PresetTable;
use super::sprites::SpriteTable;
use super::store::EntityStore;
use super::tick::TickInput;
use crate::consts::{MAX_ENTITIES, POOL_BYTES};
use crate::error::SimError;
use crate::settings::Settings;

/// Which screen the front end should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Waiting for the start input
    Title,
    /// "READY" pause after a death
    Countdown,
    Playing,
    /// All toppings stacked
    Won,
}

/// Session flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFlags {
    /// Title screen shown, waiting for start
    pub title: bool,
    /// Entities are updated each frame
    pub playing: bool,
    /// A death reset is past its countdown
    pub resetting: bool,
    /// Every topping is stacked
    pub win: bool,
    /// The quit input was seen
    pub quit: bool,
}

impl Default for SessionFlags {
    fn default() -> Self {
        Self {
            title: true,
            playing: false,
            resetting: false,
            win: false,
            quit: false,
        }
    }
}

/// Session timers (seconds)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionTimers {
    pub spawn: f32,
    pub reset: f32,
    pub win: f32,
}

/// One entity as the renderer needs it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Top-left corner
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Frame name; the renderer tiles it over the entity's box
    pub sprite: Option<&'static str>,
    /// Mirror horizontally
    pub flip: bool,
}

/// Read-only view of a frame, in draw order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub frame: u64,
    pub screen: Screen,
    pub entities: Vec<RenderEntity>,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub store: EntityStore,
    pub sprites: SpriteTable,
    pub settings: Settings,
    /// Level the session was started from, kept for reloads
    level: Level,
    pub player_id: EntityId,
    pub flags: SessionFlags,
    pub timers: SessionTimers,
    pub old_input: TickInput,
    pub input: TickInput,
    /// Frames simulated since init
    pub frame: u64,
    pub rng: Pcg32,
    pool: MemoryPool,
}

impl SimulationState {
    /// Build a session on the title screen from a level.
    pub fn new(level: Level, settings: Settings, sprites: SpriteTable) -> Result<Self, SimError> {
        let mut pool = MemoryPool::new(POOL_BYTES);
        let arena = pool.reserve::<Entity>(MAX_ENTITIES)?;
        let mut store = EntityStore::new(arena, PresetTable::standard());
        let player_id = level.populate(&mut store, &sprites)?;

        log::info!(
            "Session initialized: {} entities, seed {}",
            store.len(),
            settings.seed
        );

        Ok(Self {
            store,
            sprites,
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
            level,
            player_id,
            flags: SessionFlags::default(),
            timers: SessionTimers::default(),
            old_input: TickInput::default(),
            input: TickInput::default(),
            frame: 0,
            pool,
        })
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Bytes left in the startup pool
    pub fn pool_available(&self) -> usize {
        self.pool.available()
    }

    pub fn player(&self) -> Option<&Entity> {
        self.store.find(self.player_id)
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.store.find_mut(self.player_id)
    }

    pub fn screen(&self) -> Screen {
        if self.flags.title {
            Screen::Title
        } else if self.flags.win {
            Screen::Won
        } else if self.flags.resetting {
            Screen::Countdown
        } else {
            Screen::Playing
        }
    }

    /// Remove every hotdog and egg
    pub fn reset_npcs(&mut self) {
        let npcs = self.store.ids_where(|e| e.kind.is_npc());
        for id in &npcs {
            self.store.despawn(*id);
        }
        if !npcs.is_empty() {
            log::debug!("Removed {} NPCs", npcs.len());
        }
    }

    /// Reload the level and go back to the title screen.
    pub fn reset_game(&mut self) -> Result<(), SimError> {
        self.store.clear();
        self.player_id = self.level.populate(&mut self.store, &self.sprites)?;
        self.flags = SessionFlags::default();
        self.timers = SessionTimers::default();
        log::info!("Level reloaded");
        Ok(())
    }

    /// Drop all entities and stop the session
    pub fn teardown(&mut self) {
        self.store.clear();
        self.flags.playing = false;
        self.flags.quit = true;
        log::info!("Session ended after {} frames", self.frame);
    }

    /// Render view: terrain and props first, then NPCs, then the player.
    pub fn snapshot(&self) -> Snapshot {
        let layer = |e: &Entity| match e.kind {
            EntityKind::Player => 2,
            k if k.is_npc() => 1,
            _ => 0,
        };

        let mut entities: Vec<RenderEntity> = Vec::with_capacity(self.store.len());
        for pass in 0..3 {
            entities.extend(self.store.iter().filter(|e| layer(e) == pass).map(|e| {
                RenderEntity {
                    id: e.id,
                    kind: e.kind,
                    x: e.pos.x - e.size.x * 0.5,
                    y: e.pos.y - e.size.y * 0.5,
                    w: e.size.x,
                    h: e.size.y,
                    sprite: self.sprites.frame(e.kind, e.frame),
                    flip: e.direction == Direction::Left,
                }
            }));
        }

        Snapshot {
            frame: self.frame,
            screen: self.screen(),
            entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::LevelRecord;

    fn level() -> Level {
        Level {
            name: "test".into(),
            entities: vec![
                LevelRecord::new(0, EntityKind::Player, 40.0, 100.0),
                LevelRecord::new(1, EntityKind::Platform, 160.0, 110.0).sized(320.0, 4.0),
                LevelRecord::new(2, EntityKind::Egg, 200.0, 100.0),
                LevelRecord::new(3, EntityKind::Door, 300.0, 96.0),
            ],
        }
    }

    fn state() -> SimulationState {
        SimulationState::new(level(), Settings::default(), SpriteTable::default()).unwrap()
    }

    #[test]
    fn test_new_session_on_title() {
        let s = state();
        assert_eq!(s.screen(), Screen::Title);
        assert_eq!(s.player().map(|p| p.kind), Some(EntityKind::Player));
        assert_eq!(s.store.len(), 4);
        assert!(s.pool_available() < POOL_BYTES);
    }

    #[test]
    fn test_snapshot_draw_order() {
        let s = state();
        let snap = s.snapshot();
        let kinds: Vec<EntityKind> = snap.entities.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![EntityKind::Platform, EntityKind::Door, EntityKind::Egg, EntityKind::Player]
        );
        let player = snap.entities.last().unwrap();
        assert_eq!((player.x, player.y), (32.0, 92.0));
        assert_eq!(player.sprite, Some("girl_walk_frame1"));
    }

    #[test]
    fn test_reset_npcs_keeps_everything_else() {
        let mut s = state();
        s.reset_npcs();
        assert_eq!(s.store.count_where(|e| e.kind.is_npc()), 0);
        assert_eq!(s.store.len(), 3);
    }

    #[test]
    fn test_reset_game_reloads_level() {
        let mut s = state();
        s.flags.title = false;
        s.flags.playing = true;
        s.store.despawn(1);
        s.player_mut().unwrap().pos.x = 300.0;

        s.reset_game().unwrap();
        assert_eq!(s.screen(), Screen::Title);
        assert!(s.store.find(1).is_some());
        assert_eq!(s.player().unwrap().pos.x, 40.0);
    }

    #[test]
    fn test_teardown_empties_store() {
        let mut s = state();
        s.teardown();
        assert!(s.store.is_empty());
        assert!(s.flags.quit);
    }
}
