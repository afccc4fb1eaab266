//! Collision detection and resolution for axis-aligned boxes
//!
//! Box-vs-box overlap is reduced to point containment: the Minkowski box of
//! (A, B) is B's box grown by A's extents and offset by A's position, and A
//! overlaps B exactly when that box contains the origin. The distances from
//! the origin to its four edges are the penetration depths on each side, which
//! pick the contact normal.
//!
//! Resolution runs in two passes over the contacts of the moved entity:
//! 1. snap: every blocking contact restores the prior position on its axis
//! 2. sweep: for each blocking contact whose normal no earlier contact in the
//!    list shares, move to the time of impact along that axis, cancel velocity
//!    into the normal and drop that component from the remaining displacement
//!
//! Side order (bottom, right, left, top) and the repeated-normal skip decide
//! how corners slide and must not change.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Contact, ContactList, Entity};
use super::store::EntityStore;
use crate::error::SimError;

/// Penetration deeper than this on every side yields a zero normal
pub const NORMAL_DEPTH: f32 = 5.0;

/// Minkowski box of a pair of boxes, stored as its min corner and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MinkowskiBox {
    pub min: Vec2,
    pub size: Vec2,
}

impl MinkowskiBox {
    /// Minkowski box for box A (centre `a_pos`, size `a_ext`) against box B
    pub fn between(a_pos: Vec2, a_ext: Vec2, b_pos: Vec2, b_ext: Vec2) -> Self {
        Self {
            min: (a_pos - a_ext * 0.5) - (b_pos + b_ext * 0.5),
            size: a_ext + b_ext,
        }
    }

    /// Minkowski box of two entities' collision boxes
    pub fn of(a: &Entity, b: &Entity) -> Self {
        Self::between(a.pos, a.extent(), b.pos, b.extent())
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// True when the two boxes overlap or touch
    #[inline]
    pub fn contains_origin(&self) -> bool {
        let max = self.max();
        self.min.x <= 0.0 && max.x >= 0.0 && self.min.y <= 0.0 && max.y >= 0.0
    }

    /// Contact normal, pointing from B towards A.
    ///
    /// The shallowest side wins, checked in the order bottom, right, left,
    /// top; ties keep the earlier side. Returns zero when no side is shallower
    /// than `NORMAL_DEPTH`.
    pub fn normal(&self) -> Vec2 {
        let max = self.max();
        let sides = [
            (max.y.abs(), Vec2::NEG_Y),
            (max.x.abs(), Vec2::NEG_X),
            (self.min.x.abs(), Vec2::X),
            (self.min.y.abs(), Vec2::Y),
        ];

        let mut best = NORMAL_DEPTH;
        let mut normal = Vec2::ZERO;
        for (depth, side) in sides {
            if depth < best {
                best = depth;
                normal = side;
            }
        }
        normal
    }
}

/// Rebuild `entity`'s contact list against every other live entity.
///
/// Contacts whose partner was not touching last frame are flagged new. A
/// contact with a -y normal (standing on something) sets `on_ground`.
pub fn detect_contacts(entity: &mut Entity, store: &EntityStore) -> Result<(), SimError> {
    let previous = std::mem::take(&mut entity.contacts);
    let mut contacts = ContactList::new();
    entity.on_ground = false;

    for other in store.iter() {
        if other.id == entity.id {
            continue;
        }
        let mink = MinkowskiBox::of(entity, other);
        if !mink.contains_origin() {
            continue;
        }

        let normal = mink.normal();
        contacts.push(
            entity.id,
            Contact {
                id: other.id,
                kind: other.kind,
                normal,
                mink,
                is_new: !previous.contains_id(other.id),
            },
        )?;
        if normal.y == -1.0 {
            entity.on_ground = true;
        }
    }

    entity.contacts = contacts;
    Ok(())
}

/// Fraction of `dt_p` after which the moved box's edge meets the other box
/// along `normal`. Falls back to the whole step when the normal is zero or
/// there was no motion on its axis.
pub fn time_of_impact(
    pos: Vec2,
    ext: Vec2,
    other_pos: Vec2,
    other_ext: Vec2,
    normal: Vec2,
    dt_p: Vec2,
) -> f32 {
    let half = ext * 0.5;
    let other_half = other_ext * 0.5;

    if normal.x == 1.0 && dt_p.x != 0.0 {
        ((pos.x - half.x) - (other_pos.x + other_half.x)) / dt_p.x.abs()
    } else if normal.x == -1.0 && dt_p.x != 0.0 {
        ((other_pos.x - other_half.x) - (pos.x + half.x)) / dt_p.x.abs()
    } else if normal.y == 1.0 && dt_p.y != 0.0 {
        ((pos.y - half.y) - (other_pos.y + other_half.y)) / dt_p.y.abs()
    } else if normal.y == -1.0 && dt_p.y != 0.0 {
        ((other_pos.y - other_half.y) - (pos.y + half.y)) / dt_p.y.abs()
    } else {
        1.0
    }
}

/// Resolve `entity`'s freshly detected contacts.
///
/// `prior` is the entity before this frame's integration and `dt_p` the
/// displacement that was applied; on return `dt_p` holds only the motion left
/// along unresolved axes. Permeable partners are reported but never block.
pub fn resolve_contacts(
    prior: &Entity,
    entity: &mut Entity,
    dt_p: &mut Vec2,
    store: &EntityStore,
) -> Result<(), SimError> {
    let contacts = entity.contacts.clone();

    for contact in contacts.iter() {
        if store.require(contact.id)?.permeable {
            continue;
        }
        if contact.normal.y != 0.0 {
            entity.pos.y = prior.pos.y;
        } else if contact.normal.x != 0.0 {
            entity.pos.x = prior.pos.x;
        } else {
            entity.pos = prior.pos;
        }
    }

    let contacts = contacts.as_slice();
    for (i, contact) in contacts.iter().enumerate() {
        let other = store.require(contact.id)?;
        if other.permeable {
            continue;
        }

        // Any earlier contact with this normal, blocking or not, claims the axis
        let normal = contact.normal;
        if contacts[..i].iter().any(|c| c.normal == normal) {
            continue;
        }

        let t = time_of_impact(
            entity.pos,
            entity.extent(),
            other.pos,
            other.extent(),
            normal,
            *dt_p,
        );
        entity.pos += *dt_p * t;
        entity.vel -= normal * entity.vel.dot(normal);
        *dt_p -= normal * dt_p.dot(normal);
    }

    Ok(())
}
