//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (store slot order)
//! - No rendering or platform dependencies

pub mod animation;
pub mod arena;
pub mod collision;
pub mod entity;
pub mod level;
pub mod movement;
pub mod physics;
pub mod presets;
pub mod sprites;
pub mod state;
pub mod store;
pub mod tick;

pub use arena::{Arena, MemoryPool};
pub use collision::{MinkowskiBox, detect_contacts, resolve_contacts};
pub use entity::{
    AnimState, Contact, ContactList, Direction, Entity, EntityId, EntityKind, MotionInput,
};
pub use level::{Level, LevelRecord};
pub use presets::{Preset, PresetTable};
pub use sprites::{SpriteManifest, SpriteSizes, SpriteTable};
pub use state::{RenderEntity, Screen, SessionFlags, SessionTimers, SimulationState, Snapshot};
pub use store::EntityStore;
pub use tick::{TickInput, npc_intent, player_intent, tick};
