//! Animation clock and sprite frame selection
//!
//! Each animation state picks a base frame in the type's frame list. Looping
//! states alternate with the next frame: the secondary frame shows for the
//! first half of a cycle whose length shrinks as the entity moves faster.

use super::entity::{AnimState, Entity};

/// Cycle length at unit speed per frame
pub const ANIMATION_CYCLE: f32 = 0.5;
/// The clock wraps to zero past this many seconds
pub const CLOCK_WRAP: f32 = 5.0;
/// Speed used for the dead and winning loops, which play in place
pub const FIXED_LOOP_SPEED: f32 = 60.0;

/// Result of frame selection for one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSelection {
    /// Index into the type's frame list
    pub index: usize,
    /// The clock should restart
    pub reset_clock: bool,
}

pub fn advance_clock(e: &mut Entity, dt: f32) {
    e.clock += dt;
    if e.clock > CLOCK_WRAP {
        e.clock = 0.0;
    }
}

/// Whether the secondary frame shows, and whether the cycle is over
fn loop_offset(e: &Entity, dt: f32) -> (usize, bool) {
    let speed = match e.anim {
        AnimState::Climbing => e.vel.y.abs(),
        AnimState::Dead | AnimState::Winning => FIXED_LOOP_SPEED,
        _ => e.vel.x.abs(),
    };
    // A stopped entity holds the secondary frame (the thresholds go infinite)
    let per_frame = speed * dt;
    if e.clock < (ANIMATION_CYCLE * 0.5) / per_frame {
        (1, false)
    } else if e.clock > ANIMATION_CYCLE / per_frame {
        (0, true)
    } else {
        (0, false)
    }
}

/// Pick the frame for an entity's current animation state.
pub fn select_frame(e: &Entity, dt: f32) -> FrameSelection {
    let (base, (offset, reset_clock)) = match e.anim {
        AnimState::None => (0, (0, false)),
        AnimState::Standing => (0, (0, true)),
        AnimState::Walking => (0, loop_offset(e, dt)),
        AnimState::Jumping | AnimState::Landing => (0, (0, false)),
        AnimState::Climbing => (2, loop_offset(e, dt)),
        AnimState::Dead => (6, loop_offset(e, dt)),
        AnimState::Winning => (10, loop_offset(e, dt)),
    };

    // Enemies have no climbing or dead frames
    if e.kind.is_npc() && matches!(e.anim, AnimState::Climbing | AnimState::Dead) {
        return FrameSelection {
            index: 0,
            reset_clock,
        };
    }

    FrameSelection {
        index: base + offset,
        reset_clock,
    }
}

/// Select and store the entity's frame, restarting its clock if the cycle ended.
pub fn animate(e: &mut Entity, dt: f32) -> usize {
    let sel = select_frame(e, dt);
    if sel.reset_clock {
        e.clock = 0.0;
    }
    e.frame = sel.index;
    sel.index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::entity::EntityKind;
    use glam::Vec2;

    fn with_anim(kind: EntityKind, anim: AnimState) -> Entity {
        let mut e = Entity::new(0, kind);
        e.anim = anim;
        e
    }

    #[test]
    fn test_clock_wraps() {
        let mut e = Entity::new(0, EntityKind::Player);
        e.clock = 4.99;
        advance_clock(&mut e, SIM_DT);
        assert_eq!(e.clock, 0.0);

        advance_clock(&mut e, SIM_DT);
        assert!((e.clock - SIM_DT).abs() < 1e-6);
    }

    #[test]
    fn test_standing_resets_clock() {
        let mut e = with_anim(EntityKind::Player, AnimState::Standing);
        e.clock = 1.3;
        assert_eq!(animate(&mut e, SIM_DT), 0);
        assert_eq!(e.clock, 0.0);
    }

    #[test]
    fn test_walking_alternates_frames() {
        // 120 units/s moves 2 units per frame: half cycle 0.125 s, full 0.25 s
        let mut e = with_anim(EntityKind::Player, AnimState::Walking);
        e.vel = Vec2::new(120.0, 0.0);

        e.clock = 0.05;
        assert_eq!(select_frame(&e, SIM_DT).index, 1);

        e.clock = 0.2;
        let sel = select_frame(&e, SIM_DT);
        assert_eq!(sel.index, 0);
        assert!(!sel.reset_clock);

        e.clock = 0.3;
        assert!(select_frame(&e, SIM_DT).reset_clock);
    }

    #[test]
    fn test_base_frames() {
        let mut e = with_anim(EntityKind::Player, AnimState::Climbing);
        e.clock = 1.0;
        e.vel.y = 60.0;
        assert_eq!(select_frame(&e, SIM_DT).index, 2);

        e.anim = AnimState::Dead;
        assert_eq!(select_frame(&e, SIM_DT).index, 6);

        e.anim = AnimState::Winning;
        e.clock = 0.0;
        assert_eq!(select_frame(&e, SIM_DT).index, 11);

        e.anim = AnimState::Jumping;
        assert_eq!(select_frame(&e, SIM_DT).index, 0);
    }

    #[test]
    fn test_enemy_falls_back_to_first_frame() {
        let e = with_anim(EntityKind::Hotdog, AnimState::Dead);
        assert_eq!(select_frame(&e, SIM_DT).index, 0);

        let mut walker = with_anim(EntityKind::Egg, AnimState::Walking);
        walker.vel.x = 30.0;
        assert_eq!(select_frame(&walker, SIM_DT).index, 1);
    }
}
