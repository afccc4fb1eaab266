//! Fixed timestep simulation tick
//!
//! One call is one frame: input intake, the session screens, and while
//! playing a pass over every entity followed by spawning, death and reaping.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::animation;
use super::collision::{detect_contacts, resolve_contacts};
use super::entity::{AnimState, Direction, Entity, EntityId, EntityKind, MotionInput};
use super::movement;
use super::physics;
use super::state::SimulationState;
use crate::consts::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::error::SimError;

/// NPCs climb down when the target is less than this far above them
pub const NPC_VERTICAL_BIAS: f32 = 50.0;
/// Horizontal movement per frame above which a grounded entity is walking
pub const WALK_THRESHOLD: f32 = 0.1;

/// Input sample for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Jump button held; a jump fires on the press edge
    pub jump: bool,
    /// Start the game from the title screen
    pub start: bool,
    pub quit: bool,
}

/// Player intent: directions follow held buttons, jump fires on press.
pub fn player_intent(old: &TickInput, new: &TickInput) -> MotionInput {
    MotionInput {
        up: new.up,
        down: new.down,
        left: new.left,
        right: new.right,
        jump: new.jump && !old.jump,
    }
}

/// NPC pursuit intent towards `target`.
///
/// A topping pressing against the NPC's side makes it jump. Directions are
/// only re-chosen at a junction (standing on a platform next to a ladder or
/// wall) or when the NPC has stopped; otherwise it keeps its previous course.
pub fn npc_intent(e: &Entity, target: Vec2) -> MotionInput {
    let mut mi = MotionInput {
        jump: EntityKind::TOPPINGS
            .iter()
            .any(|k| e.contact(*k).is_some_and(|c| c.normal.x != 0.0)),
        ..Default::default()
    };

    let at_junction = e.contact(EntityKind::Platform).is_some()
        && (e.contact(EntityKind::Ladder).is_some() || e.contact(EntityKind::Wall).is_some());

    if at_junction || e.accel == Vec2::ZERO {
        let diff = e.pos - target;
        if diff.y < NPC_VERTICAL_BIAS {
            mi.down = true;
        } else if diff.y > NPC_VERTICAL_BIAS {
            mi.up = true;
        }
        if diff.x < 0.0 {
            mi.right = true;
        } else if diff.x > 0.0 {
            mi.left = true;
        }
    } else {
        mi.left = e.motion.left;
        mi.right = e.motion.right;
        mi.up = e.motion.up;
        mi.down = e.motion.down;
    }
    mi
}

/// Advance the simulation by one fixed timestep
pub fn tick(state: &mut SimulationState, input: &TickInput, dt: f32) -> Result<(), SimError> {
    state.old_input = state.input;
    state.input = *input;

    if input.quit {
        state.teardown();
        return Ok(());
    }

    let player_dead = state.player().is_some_and(|p| p.dead);
    if player_dead || state.flags.resetting {
        reset_countdown(state, dt);
    }

    if state.flags.title && input.start {
        state.flags.title = false;
        state.flags.playing = true;
        log::info!("Play started");
    }

    if state.flags.playing {
        update_entities(state, dt)?;
        for id in state.store.ids() {
            animation::animate(state.store.require_mut(id)?, dt);
        }
    }

    if state.flags.win {
        win_screen(state, dt)?;
    }

    state.frame += 1;
    Ok(())
}

/// After a death: clear NPCs and pause on the ready screen, then resume.
fn reset_countdown(state: &mut SimulationState, dt: f32) {
    state.timers.reset += dt;
    if state.timers.reset > state.settings.death_countdown {
        if !state.flags.resetting {
            log::info!("Player died, resetting");
        }
        state.reset_npcs();
        state.flags.resetting = true;
        state.flags.playing = false;
        if let Some(player) = state.player_mut() {
            player.dead = false;
        }

        if state.timers.reset > state.settings.ready_end {
            state.timers.reset = 0.0;
            state.flags.playing = true;
            state.flags.resetting = false;
            log::info!("Play resumed");
        }
    }
}

fn win_screen(state: &mut SimulationState, dt: f32) -> Result<(), SimError> {
    if state.timers.win == 0.0 {
        log::info!("Burger complete after {} frames", state.frame);
    }
    if let Some(player) = state.player_mut() {
        player.anim = AnimState::Winning;
    }
    state.reset_npcs();

    state.timers.win += dt;
    if state.timers.win > state.settings.win_duration {
        state.reset_game()?;
    }
    Ok(())
}

/// One pass over every entity, then spawning, deaths and reaping
fn update_entities(state: &mut SimulationState, dt: f32) -> Result<(), SimError> {
    let mut win = true;
    let mut toppings = 0;

    for id in state.store.ids() {
        let kind = {
            let e = state.store.require_mut(id)?;
            animation::advance_clock(e, dt);
            e.kind
        };

        if kind.is_topping() {
            toppings += 1;
            movement::move_topping(&mut state.store, id, dt)?;
            let e = state.store.require(id)?;
            if e.contact(EntityKind::Platform).is_some() || e.contacts.is_empty() {
                win = false;
            }
        }

        if state.store.require(id)?.movable {
            move_entity(state, id, dt)?;
        }
    }

    // A level without toppings is never won
    state.flags.win = win && toppings > 0;

    spawn_npc(state, dt)?;
    kill_entities(state)?;
    reap(state);
    Ok(())
}

/// Intent, movement modes, integration and collision for one entity
fn move_entity(state: &mut SimulationState, id: EntityId, dt: f32) -> Result<(), SimError> {
    let prior = state.store.require(id)?.clone();
    let mut e = prior.clone();

    if !e.dead && e.anim != AnimState::Winning {
        if e.kind == EntityKind::Player {
            e.anim = AnimState::Standing;
            e.motion = player_intent(&state.old_input, &state.input);
        } else if e.kind.is_npc() {
            let player_pos = state.player().map(|p| p.pos);
            let target = match player_pos {
                Some(pos) => pos,
                None => Vec2::new(
                    state.rng.random_range(0.0..DISPLAY_WIDTH),
                    state.rng.random_range(0.0..DISPLAY_HEIGHT),
                ),
            };
            e.motion = npc_intent(&e, target);
        }
    } else {
        e.motion = MotionInput::default();
    }

    let store = &state.store;

    if e.dead && e.on_ladder {
        movement::off_ladder(&mut e, store);
    }

    if !(e.kind == EntityKind::Player && e.dead) {
        e.accel = e.motion.accel();
        movement::apply_gravity(&mut e);
    }

    if e.accel.x < 0.0 {
        e.direction = Direction::Left;
    } else if e.accel.x > 0.0 {
        e.direction = Direction::Right;
    }

    if e.motion.vertical() || e.on_ladder {
        movement::climb_ladder(&mut e, store)?;
    }

    if e.motion.jump {
        movement::apply_jump(&mut e, state.settings.jump_impulse);
        e.on_ground = false;
        e.anim = AnimState::Jumping;
    }

    if e.on_ladder {
        e.on_ground = false;
        e.anim = AnimState::Climbing;
    }

    let mut dt_p = physics::step(&mut e, dt);

    if dt_p.x.abs() > WALK_THRESHOLD && e.on_ground {
        e.anim = AnimState::Walking;
    }

    if e.dead {
        e.anim = AnimState::Dead;
        if e.kind == EntityKind::Player {
            e.vel = Vec2::ZERO;
            e.accel = Vec2::ZERO;
        }
    }

    e.pos += dt_p;
    detect_contacts(&mut e, store)?;

    if !e.on_ladder && !e.dead {
        resolve_contacts(&prior, &mut e, &mut dt_p, store)?;
    }

    *state.store.require_mut(id)? = e;
    Ok(())
}

/// Spawn an NPC at a random door every `spawn_interval` seconds while
/// fewer than `max_npcs` are alive. Hotdogs and eggs alternate.
fn spawn_npc(state: &mut SimulationState, dt: f32) -> Result<(), SimError> {
    let npcs = state.store.count_where(|e| e.kind.is_npc());
    if npcs >= state.settings.max_npcs {
        return Ok(());
    }

    state.timers.spawn += dt;
    if state.timers.spawn <= state.settings.spawn_interval {
        return Ok(());
    }
    state.timers.spawn = 0.0;

    let doors: Vec<Vec2> = state
        .store
        .iter()
        .filter(|e| e.kind == EntityKind::Door)
        .take(state.settings.max_doors)
        .map(|e| e.pos)
        .collect();
    if doors.is_empty() {
        log::warn!("No doors to spawn NPCs from");
        return Ok(());
    }

    let door = doors[state.rng.random_range(0..doors.len())];
    let kind = if npcs % 2 == 1 {
        EntityKind::Hotdog
    } else {
        EntityKind::Egg
    };
    let e = state.store.spawn(kind, door, &state.sprites)?;
    log::info!("Spawned {:?} {} at ({:.0}, {:.0})", kind, e.id, door.x, door.y);
    Ok(())
}

/// Toppings landing on NPCs kill them; touching any NPC kills the player.
fn kill_entities(state: &mut SimulationState) -> Result<(), SimError> {
    for id in state.store.ids() {
        let e = state.store.require_mut(id)?;
        let dies = if e.kind.is_npc() {
            e.contacts
                .iter()
                .any(|c| c.kind.is_topping() && c.normal.y == 1.0)
        } else if e.kind == EntityKind::Player {
            e.contacts.iter().any(|c| c.kind.is_npc())
        } else {
            false
        };

        if dies && !e.dead {
            e.dead = true;
            log::debug!("{:?} {} died", e.kind, e.id);
        }
    }
    Ok(())
}

/// Remove dead entities that have fallen past the reap depth
fn reap(state: &mut SimulationState) {
    let depth = state.settings.reap_depth;
    for id in state.store.ids_where(|e| e.dead && e.pos.y > depth) {
        state.store.despawn(id);
        log::debug!("Reaped entity {}", id);
    }
}
