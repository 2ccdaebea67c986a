/*!
Stance machine: Stand / Crouch / Prone.

Discrete transitions are gated by a capsule feasibility probe against the
obstruction layers (a transition that would push the collider into
geometry is rejected and the stance stays put). The visible quantities —
camera height, collider height, collider center — are re-approached toward
the active profile every frame through independent damped channels, so a
transition plays out over the stance smoothing time instead of snapping.
*/

use serde::{Deserialize, Serialize};

use crate::collision::{CapsuleSpec, CollisionWorld, Vec3};
use crate::settings::{PlayerSettings, StanceProfiles};
use crate::smoothing::{DampedF32, DampedVec3};

/// Discrete body posture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stance {
    #[default]
    Stand,
    Crouch,
    Prone,
}

/// Discrete stance plus the continuously-interpolated shape channels.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StanceMachine {
    stance: Stance,
    camera_height: DampedF32,
    collider_height: DampedF32,
    collider_center: DampedVec3,
}

impl StanceMachine {
    /// Start standing, with the shape channels already at the standing
    /// profile (no transition plays on the first frame).
    pub fn new(profiles: &StanceProfiles) -> Self {
        let standing = &profiles.standing;
        Self {
            stance: Stance::Stand,
            camera_height: DampedF32::new(standing.camera_height),
            collider_height: DampedF32::new(standing.collider_height),
            collider_center: DampedVec3::new(standing.collider_center),
        }
    }

    #[inline]
    pub fn stance(&self) -> Stance {
        self.stance
    }

    /// Current (smoothed) camera height above the foot anchor.
    #[inline]
    pub fn camera_height(&self) -> f32 {
        self.camera_height.current
    }

    /// Current (smoothed) collider height.
    #[inline]
    pub fn collider_height(&self) -> f32 {
        self.collider_height.current
    }

    /// Current (smoothed) collider center offset from the foot anchor.
    #[inline]
    pub fn collider_center(&self) -> Vec3 {
        self.collider_center.current
    }

    /// The collider capsule at its current smoothed height.
    #[inline]
    pub fn capsule(&self, radius: f32) -> CapsuleSpec {
        CapsuleSpec::from_height(self.collider_height.current, radius)
    }

    /// Handle a crouch press.
    ///
    /// Crouching stands up; any other stance (standing or prone) tries to
    /// crouch. Either way the target profile must pass the feasibility
    /// probe or the stance stays unchanged.
    pub fn handle_crouch(
        &mut self,
        world: &impl CollisionWorld,
        settings: &PlayerSettings,
        profiles: &StanceProfiles,
        foot: Vec3,
    ) {
        let (target, height) = match self.stance {
            Stance::Crouch => (Stance::Stand, profiles.standing.collider_height),
            _ => (Stance::Crouch, profiles.crouching.collider_height),
        };

        if self.is_blocked(world, settings, foot, height) {
            log::debug!("stance change {:?} -> {:?} blocked", self.stance, target);
            return;
        }
        self.stance = target;
    }

    /// Handle a prone press: unconditional, no feasibility probe.
    pub fn handle_prone(&mut self) {
        self.stance = Stance::Prone;
    }

    /// Stand-up attempt for a jump press made while crouched or prone.
    ///
    /// Returns true when the stance changed to standing. The caller
    /// suppresses the jump impulse for this press in either case.
    pub fn stand_up(
        &mut self,
        world: &impl CollisionWorld,
        settings: &PlayerSettings,
        profiles: &StanceProfiles,
        foot: Vec3,
    ) -> bool {
        if self.is_blocked(world, settings, foot, profiles.standing.collider_height) {
            log::debug!("stand up from {:?} blocked", self.stance);
            return false;
        }
        self.stance = Stance::Stand;
        true
    }

    /// Feasibility probe: would a collider of `target_height` fit at the
    /// foot anchor? Capsule endpoints get the configured error margin of
    /// vertical slack; the probe runs against the obstruction layers, which
    /// exclude the character itself.
    fn is_blocked(
        &self,
        world: &impl CollisionWorld,
        settings: &PlayerSettings,
        foot: Vec3,
        target_height: f32,
    ) -> bool {
        let radius = settings.collider_radius;
        let margin = settings.stance_error_margin;
        let p0 = Vec3::new(foot.x, foot.y + margin + radius, foot.z);
        let p1 = Vec3::new(foot.x, foot.y - margin - radius + target_height, foot.z);
        world.capsule_overlap(p0, p1, radius, settings.obstruction_mask)
    }

    /// Continuous per-frame update: re-approach the active profile on all
    /// three shape channels, whether or not a transition just occurred.
    pub fn update(&mut self, profiles: &StanceProfiles, smooth_time: f32, dt: f32) {
        let profile = profiles.profile(self.stance);
        self.camera_height
            .approach(profile.camera_height, smooth_time, dt);
        self.collider_height
            .approach(profile.collider_height, smooth_time, dt);
        self.collider_center
            .approach(profile.collider_center, smooth_time, dt);
    }
}
