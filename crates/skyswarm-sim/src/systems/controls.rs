//! Ship control system.
//!
//! Applies each ship's latest controls: mouse-look sets the rotation, and the
//! movement buttons translate the ship in its own frame.

use glam::Vec3;
use hecs::World;

use skyswarm_core::components::{Controls, Ship, Transform};
use skyswarm_core::constants::PITCH_LIMIT_DEG;
use skyswarm_core::types::orientation_from_yaw_pitch;

/// Rotate and move every ship for one frame of `dt` seconds.
pub fn run(world: &mut World, move_speed: f32, dt: f32) {
    for (_entity, (ship, transform)) in world.query_mut::<(&Ship, &mut Transform)>() {
        let controls = &ship.controls;
        let pitch = controls.pitch.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
        transform.rotation = orientation_from_yaw_pitch(controls.yaw, pitch);

        // Each held button contributes a full step, so diagonals are faster.
        let local = local_motion(controls);
        transform.position += transform.rotation * local * (move_speed * dt);
    }
}

/// Unscaled motion in the ship's frame (+Z forward, +X right).
pub fn local_motion(controls: &Controls) -> Vec3 {
    let mut motion = Vec3::ZERO;
    if controls.forward {
        motion += Vec3::Z;
    }
    if controls.back {
        motion -= Vec3::Z;
    }
    if controls.left {
        motion -= Vec3::X;
    }
    if controls.right {
        motion += Vec3::X;
    }
    motion
}
