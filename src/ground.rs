/*!
Ground/fall sensing.

Grounded state is derived from world geometry every frame, never trusted
from the previous tick: a sphere probe at the foot anchor against the
ground layers, plus a speed threshold for the falling flag.
*/

use serde::{Deserialize, Serialize};

use crate::collision::{CollisionWorld, Vec3};
use crate::settings::PlayerSettings;

/// Grounded/falling flags for the current frame.
///
/// Invariant: `is_falling` implies `!is_grounded`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundState {
    pub is_grounded: bool,
    pub is_falling: bool,
}

impl GroundState {
    /// Recompute both flags from world geometry.
    ///
    /// `foot` is the character's foot anchor; `speed` is the magnitude of
    /// the velocity applied on the previous frame.
    pub fn probe(
        world: &impl CollisionWorld,
        settings: &PlayerSettings,
        foot: Vec3,
        speed: f32,
    ) -> GroundState {
        let is_grounded =
            world.sphere_overlap(foot, settings.is_grounded_radius, settings.ground_mask);
        let is_falling = !is_grounded && speed > settings.is_falling_speed;
        GroundState {
            is_grounded,
            is_falling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{LayerMask, StaticWorld, WorldStatic};
    use crate::settings::GROUND_LAYER;

    fn floor_world() -> StaticWorld {
        StaticWorld::new(vec![WorldStatic::plane(Vec3::y(), 0.0, GROUND_LAYER)])
    }

    #[test]
    fn grounded_when_foot_probe_touches_floor() {
        let world = floor_world();
        let settings = PlayerSettings::default();

        let state = GroundState::probe(&world, &settings, Vec3::new(0.0, 0.1, 0.0), 0.0);
        assert!(state.is_grounded);
        assert!(!state.is_falling);
    }

    #[test]
    fn airborne_below_threshold_is_not_falling() {
        let world = floor_world();
        let settings = PlayerSettings::default();
        let high = Vec3::new(0.0, 5.0, 0.0);

        let slow = GroundState::probe(&world, &settings, high, settings.is_falling_speed);
        assert!(!slow.is_grounded);
        assert!(!slow.is_falling, "threshold comparison is strict");

        let fast = GroundState::probe(&world, &settings, high, settings.is_falling_speed + 0.1);
        assert!(fast.is_falling);
    }

    #[test]
    fn falling_implies_not_grounded() {
        let world = floor_world();
        let settings = PlayerSettings::default();

        for y in [0.0, 0.1, 0.5, 2.0, 10.0] {
            for speed in [0.0, 2.0, 4.0, 40.0] {
                let state = GroundState::probe(&world, &settings, Vec3::new(0.0, y, 0.0), speed);
                assert!(!(state.is_falling && state.is_grounded));
            }
        }
    }

    #[test]
    fn probe_ignores_non_ground_layers() {
        let world = StaticWorld::new(vec![WorldStatic::plane(
            Vec3::y(),
            0.0,
            LayerMask::layer(5),
        )]);
        let settings = PlayerSettings::default();

        let state = GroundState::probe(&world, &settings, Vec3::new(0.0, 0.1, 0.0), 0.0);
        assert!(!state.is_grounded);
    }
}
