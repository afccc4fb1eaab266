//! Velocity and displacement integration
//!
//! Acceleration is a unit intent scaled per axis by the entity's `speed`.
//! Velocity decays multiplicatively per axis by `damp^dt`: a damp of 1 keeps
//! velocity, a damp near 0 stops it almost at once.

use glam::Vec2;

use super::entity::Entity;

/// Scale an intent down to unit length; shorter vectors pass through, so
/// diagonal input is no faster than straight input.
#[inline]
pub fn clamp_unit(a: Vec2) -> Vec2 {
    let lsq = a.length_squared();
    if lsq > 1.0 { a / lsq.sqrt() } else { a }
}

/// Next velocity from acceleration intent, per-axis speed and damping
pub fn integrate_velocity(accel: Vec2, vel: Vec2, speed: Vec2, damp: Vec2, dt: f32) -> Vec2 {
    let v = vel + clamp_unit(accel) * speed * dt;
    Vec2::new(v.x * damp.x.powf(dt), v.y * damp.y.powf(dt))
}

/// Frame displacement `0.5·a·dt² + v·dt`
#[inline]
pub fn displacement(accel: Vec2, vel: Vec2, dt: f32) -> Vec2 {
    accel * (0.5 * dt * dt) + vel * dt
}

/// Integrate an entity's velocity in place and return its displacement.
pub fn step(entity: &mut Entity, dt: f32) -> Vec2 {
    entity.vel = integrate_velocity(entity.accel, entity.vel, entity.speed, entity.damp, dt);
    displacement(entity.accel, entity.vel, dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    #[test]
    fn test_diagonal_is_not_faster() {
        let speed = Vec2::splat(800.0);
        let straight = integrate_velocity(Vec2::X, Vec2::ZERO, speed, Vec2::ONE, SIM_DT);
        let diagonal = integrate_velocity(Vec2::ONE, Vec2::ZERO, speed, Vec2::ONE, SIM_DT);
        assert!((straight.length() - diagonal.length()).abs() < 1e-4);
    }

    #[test]
    fn test_unit_damp_keeps_velocity() {
        let v = integrate_velocity(Vec2::ZERO, Vec2::new(30.0, -12.0), Vec2::ZERO, Vec2::ONE, SIM_DT);
        assert_eq!(v, Vec2::new(30.0, -12.0));
    }

    #[test]
    fn test_gravity_frame() {
        // Player preset under gravity for one frame from rest
        let v = integrate_velocity(Vec2::Y, Vec2::ZERO, Vec2::new(800.0, 1000.0), Vec2::new(0.001, 0.9), SIM_DT);
        let expected = 1000.0 * SIM_DT * 0.9f32.powf(SIM_DT);
        assert!((v.y - expected).abs() < 1e-4);
        assert_eq!(v.x, 0.0);

        let d = displacement(Vec2::Y, v, SIM_DT);
        assert!((d.y - (0.5 * SIM_DT * SIM_DT + v.y * SIM_DT)).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_damping_converges(
            vx in -500.0f32..500.0,
            vy in -500.0f32..500.0,
            dx in 0.0001f32..0.999,
            dy in 0.0001f32..0.999,
        ) {
            let damp = Vec2::new(dx, dy);
            let mut v = Vec2::new(vx, vy);
            let start = v.length();
            for _ in 0..600 {
                let next = integrate_velocity(Vec2::ZERO, v, Vec2::splat(100.0), damp, SIM_DT);
                prop_assert!(next.length() <= v.length());
                v = next;
            }
            prop_assert!(v.length() < start.max(1e-3));
        }
    }
}
