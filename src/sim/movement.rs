//! Movement modes: gravity, jumping, ladders, platform pass-through and
//! topping motion
//!
//! Mode decisions read the contact list recorded at the end of the previous
//! frame. Ladder and platform geometry is measured on the stored Minkowski
//! boxes: for a contact box `m`, `m.max().x - m.size.x / 2` is the horizontal
//! offset of the entity's centre from the partner's centre, and
//! `m.max().y` is how far the entity's bottom edge sits below the partner's
//! top edge.

use glam::Vec2;

use super::collision::detect_contacts;
use super::entity::{Entity, EntityId, EntityKind};
use super::physics;
use super::store::EntityStore;
use crate::error::SimError;

/// Half-width of the window around a ladder's centreline that allows entry
pub const LADDER_ENTRY_WINDOW: f32 = 4.0;
/// Centring stops once within this distance of the centreline
pub const LADDER_CENTER_TOLERANCE: f32 = 0.1;
/// Damping on both axes while on a ladder
pub const LADDER_DAMP: f32 = 0.0001;
/// Downward offset of the probe looking for a platform underfoot
pub const PLATFORM_PROBE_DEPTH: f32 = 5.0;
/// Climbers this close below a platform top can step onto it
pub const PLATFORM_LIP: f32 = 5.0;
/// Upward speed given when stepping off a ladder onto a platform
pub const PASS_THROUGH_NUDGE: f32 = 50.0;

/// Distance a topping sinks when the player steps onto it
pub const TOPPING_PRESS: f32 = 3.0;
/// Distance a topping sinks when another topping lands on it
pub const TOPPING_KNOCK: f32 = 10.0;
/// A pushed topping stops this close to its destination
pub const TOPPING_SETTLE: f32 = 1.0;
/// A topping whose top edge is within this of the platform top falls through
pub const TOPPING_SINK: f32 = 0.5;

/// Gravity is a unit downward intent, scaled by the entity's y speed
pub fn apply_gravity(e: &mut Entity) {
    if !e.on_ladder {
        e.accel.y = 1.0;
    }
}

/// Jump from the ground. Returns whether the impulse was applied.
pub fn apply_jump(e: &mut Entity, impulse: f32) -> bool {
    if !e.on_ground {
        return false;
    }
    e.vel.y -= impulse;
    e.on_ground = false;
    true
}

/// Leave ladder mode and restore the type's damping.
pub fn off_ladder(e: &mut Entity, store: &EntityStore) {
    if e.on_ladder {
        log::debug!("Entity {} left ladder", e.id);
    }
    e.on_ladder = false;
    e.platform_transition = false;
    e.damp = store.presets().get(e.kind).damp;
}

/// Horizontal offset of the entity's centre from its partner's centre
#[inline]
fn centre_offset(m_max_x: f32, m_w: f32) -> f32 {
    m_max_x - m_w * 0.5
}

/// Enter ladder mode, or keep sliding onto the centreline while entering.
///
/// Entry needs a ladder contact, an up/down intent with room to climb that
/// way, a platform underfoot without a pass-through in progress, and a
/// position inside the entry window.
pub fn transition_to_ladder(e: &mut Entity) {
    let Some(ladder) = e.contact(EntityKind::Ladder).copied() else {
        return;
    };
    let m = ladder.mink;
    let offset = centre_offset(m.max().x, m.size.x);

    if !e.on_ladder {
        let below_top = m.max().y.trunc();
        let room_down = e.motion.down && below_top < m.size.y - e.size.y;
        let room_up = e.motion.up && below_top > e.size.y;
        let on_platform = e.contact(EntityKind::Platform).is_some();

        if (room_down || room_up)
            && on_platform
            && !e.platform_transition
            && offset.abs() < LADDER_ENTRY_WINDOW
        {
            e.accel.y = 0.0;
            e.vel.x = 0.0;
            e.on_ladder = true;
            e.ladder_transition = true;
            log::debug!("Entity {} mounting ladder {}", e.id, ladder.id);
        }
    } else if e.ladder_transition {
        if offset < -LADDER_CENTER_TOLERANCE {
            e.accel.x = 1.0;
        } else if offset > LADDER_CENTER_TOLERANCE {
            e.accel.x = -1.0;
        } else {
            e.ladder_transition = false;
            e.vel.x = 0.0;
        }
    }
}

/// Step from a ladder onto a platform.
///
/// Below a platform top, a sideways intent within `PLATFORM_LIP` of the top
/// starts a pass-through that lifts the climber up and over. Above all
/// platforms, a sideways intent that a probe `PLATFORM_PROBE_DEPTH` lower
/// finds a platform for nudges the climber up and drops it off the ladder.
pub fn transition_to_platform(e: &mut Entity, store: &EntityStore) -> Result<(), SimError> {
    let platform = e.contact(EntityKind::Platform).copied();

    let mut probe = e.clone();
    probe.pos.y += PLATFORM_PROBE_DEPTH;
    detect_contacts(&mut probe, store)?;
    let platform_below = probe.contact(EntityKind::Platform).is_some();

    match platform {
        None => {
            if platform_below && e.motion.horizontal() && !e.motion.up {
                e.platform_transition = true;
                e.vel.y = -PASS_THROUGH_NUDGE;
                log::debug!("Entity {} stepping off ladder onto platform", e.id);
            }
            if e.platform_transition {
                off_ladder(e, store);
            }
        }
        Some(contact) => {
            let m = contact.mink;
            if e.motion.horizontal() && !e.ladder_transition && !e.platform_transition {
                let to_top = m.min.y.trunc() + m.size.y;
                if to_top < PLATFORM_LIP {
                    e.platform_transition = true;
                    e.accel = e.motion.accel();
                    log::debug!("Entity {} passing through platform {}", e.id, contact.id);
                }
            }
            if e.platform_transition {
                e.accel = e.motion.accel();
                e.accel.y = -1.0;
            }
        }
    }
    Ok(())
}

/// Ladder mode update, run while climbing or when a vertical intent is held.
///
/// Losing the ladder contact, or climbing below the ladder's bottom, always
/// drops back to normal movement.
pub fn climb_ladder(e: &mut Entity, store: &EntityStore) -> Result<(), SimError> {
    let Some(ladder) = e.contact(EntityKind::Ladder).copied() else {
        off_ladder(e, store);
        return Ok(());
    };
    let m = ladder.mink;
    transition_to_ladder(e);

    if e.on_ladder {
        if !e.ladder_transition {
            e.accel.x = 0.0;
        }
        e.damp = Vec2::splat(LADDER_DAMP);

        let to_ladder_bottom = m.min.y.trunc() + m.size.y;
        let ladder_bottom = m.size.y - e.size.y;

        transition_to_platform(e, store)?;

        if to_ladder_bottom > ladder_bottom {
            off_ladder(e, store);
        }
    }
    Ok(())
}

/// Topping update, run before the movement pipeline.
///
/// A topping on a platform sinks when stepped on or landed on, and falls once
/// sunk far enough; off every platform it becomes movable and falls through
/// the normal pipeline.
pub fn move_topping(store: &mut EntityStore, id: EntityId, dt: f32) -> Result<(), SimError> {
    let mut e = store.require(id)?.clone();

    match e.contact(EntityKind::Platform).copied() {
        None => e.movable = true,
        Some(platform) => {
            match e.dest_y {
                None => {
                    detect_contacts(&mut e, store)?;
                    let stepped_on = e
                        .contact(EntityKind::Player)
                        .is_some_and(|c| c.is_new && c.normal.y == 1.0);
                    let landed_on = EntityKind::TOPPINGS
                        .iter()
                        .any(|k| e.contact(*k).is_some_and(|c| c.normal.y == 1.0));

                    if stepped_on {
                        e.dest_y = Some(e.pos.y + TOPPING_PRESS);
                    } else if landed_on {
                        e.dest_y = Some(e.pos.y + TOPPING_KNOCK);
                    }
                }
                Some(dest) => {
                    let diff = dest - e.pos.y;
                    if diff.abs() > TOPPING_SETTLE {
                        e.accel.y = if diff >= 0.0 { 1.0 } else { -1.0 };
                        let dp = physics::step(&mut e, dt);
                        e.pos += dp;
                        e.movable = false;
                    } else {
                        e.dest_y = None;
                        e.vel.y = 0.0;
                    }
                }
            }

            let platform_h = store.require(platform.id)?.size.y;
            if platform.mink.min.y + platform_h > -TOPPING_SINK {
                e.accel.y = 1.0;
                let dp = physics::step(&mut e, dt);
                e.pos += dp;
            }
        }
    }

    *store.require_mut(id)? = e;
    Ok(())
}
