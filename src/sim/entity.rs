//! Entity data model
//!
//! Every simulated object (player, enemies, burger toppings, terrain) is an
//! `Entity`. Positions are box centres in screen space: +x right, +y down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::MinkowskiBox;
use crate::consts::MAX_CONTACTS;
use crate::error::SimError;

/// Stable entity identity. Never reused while the entity is live.
pub type EntityId = u32;

/// Closed set of entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Hotdog,
    Egg,
    Platform,
    Ladder,
    Plate,
    Tablecloth,
    TopBun,
    Tomato,
    Meat,
    BottomBun,
    Door,
    Wall,
}

impl EntityKind {
    pub const ALL: [EntityKind; 13] = [
        EntityKind::Player,
        EntityKind::Hotdog,
        EntityKind::Egg,
        EntityKind::Platform,
        EntityKind::Ladder,
        EntityKind::Plate,
        EntityKind::Tablecloth,
        EntityKind::TopBun,
        EntityKind::Tomato,
        EntityKind::Meat,
        EntityKind::BottomBun,
        EntityKind::Door,
        EntityKind::Wall,
    ];

    pub const TOPPINGS: [EntityKind; 4] = [
        EntityKind::TopBun,
        EntityKind::Tomato,
        EntityKind::Meat,
        EntityKind::BottomBun,
    ];

    /// Dense index for per-type tables
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Enemies that chase the player
    #[inline]
    pub fn is_npc(self) -> bool {
        matches!(self, EntityKind::Hotdog | EntityKind::Egg)
    }

    /// Burger components that get stacked on plates
    #[inline]
    pub fn is_topping(self) -> bool {
        Self::TOPPINGS.contains(&self)
    }
}

/// Animation state, selects the base sprite frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimState {
    #[default]
    None,
    Standing,
    Walking,
    Jumping,
    Landing,
    Climbing,
    Dead,
    Winning,
}

/// Facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Right,
    Left,
}

/// Movement intent for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MotionInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl MotionInput {
    /// Raw acceleration direction. Down wins over up, left wins over right.
    pub fn accel(&self) -> Vec2 {
        let mut a = Vec2::ZERO;
        if self.up {
            a.y = -1.0;
        }
        if self.down {
            a.y = 1.0;
        }
        if self.right {
            a.x = 1.0;
        }
        if self.left {
            a.x = -1.0;
        }
        a
    }

    #[inline]
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    #[inline]
    pub fn vertical(&self) -> bool {
        self.up || self.down
    }
}

/// One recorded overlap with another entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// The other entity
    pub id: EntityId,
    pub kind: EntityKind,
    /// Axis-aligned contact normal, or zero when no side dominates
    pub normal: Vec2,
    /// Minkowski box of (self, other) at detection time
    pub mink: MinkowskiBox,
    /// The other entity was not in last frame's contact list
    pub is_new: bool,
}

/// Per-entity contact cache, at most `MAX_CONTACTS` entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactList {
    contacts: Vec<Contact>,
}

impl ContactList {
    pub fn new() -> Self {
        Self {
            contacts: Vec::with_capacity(MAX_CONTACTS),
        }
    }

    /// Record a contact for entity `owner`
    pub fn push(&mut self, owner: EntityId, contact: Contact) -> Result<(), SimError> {
        if self.contacts.len() >= MAX_CONTACTS {
            return Err(SimError::ContactOverflow {
                id: owner,
                capacity: MAX_CONTACTS,
            });
        }
        self.contacts.push(contact);
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Contact> {
        self.contacts.iter()
    }

    pub fn as_slice(&self) -> &[Contact] {
        &self.contacts
    }

    /// First contact with an entity of the given type
    pub fn find(&self, kind: EntityKind) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.kind == kind)
    }

    pub fn contains_id(&self, id: EntityId) -> bool {
        self.contacts.iter().any(|c| c.id == id)
    }
}

/// A simulated entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub anim: AnimState,
    /// Sprite frame index derived from `anim` and `clock`
    pub frame: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    pub accel: Vec2,
    /// Sprite dimensions
    pub size: Vec2,
    /// Collision box override per axis (0 = use `size`)
    pub hitbox: Vec2,
    /// Per-axis acceleration scale
    pub speed: Vec2,
    /// Per-axis damping, applied as `damp^dt`
    pub damp: Vec2,
    /// Target y a pushed topping is travelling to
    pub dest_y: Option<f32>,
    pub on_ground: bool,
    pub on_ladder: bool,
    /// Sliding onto a ladder's centreline
    pub ladder_transition: bool,
    /// Passing through a platform
    pub platform_transition: bool,
    /// Processed by the movement pipeline
    pub movable: bool,
    /// Never blocks another entity's motion
    pub permeable: bool,
    pub dead: bool,
    /// Free-running animation clock (seconds)
    pub clock: f32,
    pub contacts: ContactList,
    pub direction: Direction,
    pub motion: MotionInput,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            kind,
            anim: AnimState::None,
            frame: 0,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            size: Vec2::ZERO,
            hitbox: Vec2::ZERO,
            speed: Vec2::ZERO,
            damp: Vec2::ONE,
            dest_y: None,
            on_ground: false,
            on_ladder: false,
            ladder_transition: false,
            platform_transition: false,
            movable: false,
            permeable: false,
            dead: false,
            clock: 0.0,
            contacts: ContactList::new(),
            direction: Direction::Right,
            motion: MotionInput::default(),
        }
    }

    /// Collision box size: hitbox where set, sprite size otherwise
    pub fn extent(&self) -> Vec2 {
        Vec2::new(
            if self.hitbox.x > 0.0 { self.hitbox.x } else { self.size.x },
            if self.hitbox.y > 0.0 { self.hitbox.y } else { self.size.y },
        )
    }

    /// First current contact with an entity of the given type
    #[inline]
    pub fn contact(&self, kind: EntityKind) -> Option<&Contact> {
        self.contacts.find(kind)
    }
}
