/*!
Simulation step orchestrator.

Runs the stages in their fixed per-frame order — sensors and locomotion
first, then the weapon presentation over the freshly-published snapshot —
so the weapon stage never observes a stale ground or stance value. One
writer per piece of state: locomotion owns motion/stance/ground, the
weapon controller owns its sway state.
*/

use serde::{Deserialize, Serialize};

use crate::collision::{CollisionWorld, Vec3};
use crate::input::{FrameTime, InputSample};
use crate::locomotion::{LocomotionController, LocomotionFrame};
use crate::settings::{PlayerSettings, StanceProfiles};
use crate::weapon::{WeaponController, WeaponFrame};

/// Combined presentation output for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameOutput {
    pub locomotion: LocomotionFrame,
    /// Present once a weapon controller is attached and bound.
    pub weapon: Option<WeaponFrame>,
}

/// A character: locomotion plus an optionally-attached weapon.
///
/// The whole simulation state serializes; restoring a snapshot mid-run and
/// resuming with the same input stream reproduces an uninterrupted run
/// frame for frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CharacterSimulation {
    locomotion: LocomotionController,
    weapon: Option<WeaponController>,
}

impl CharacterSimulation {
    pub fn new(settings: PlayerSettings, profiles: StanceProfiles, position: Vec3) -> Self {
        Self {
            locomotion: LocomotionController::new(settings, profiles, position),
            weapon: None,
        }
    }

    /// Attach and bind a weapon controller; it participates from the next
    /// step on.
    pub fn attach_weapon(&mut self, mut weapon: WeaponController) {
        weapon.bind();
        self.weapon = Some(weapon);
    }

    #[inline]
    pub fn locomotion(&self) -> &LocomotionController {
        &self.locomotion
    }

    #[inline]
    pub fn weapon(&self) -> Option<&WeaponController> {
        self.weapon.as_ref()
    }

    /// Mutable weapon access for level inputs (aiming).
    #[inline]
    pub fn weapon_mut(&mut self) -> Option<&mut WeaponController> {
        self.weapon.as_mut()
    }

    /// Advance the whole character one frame.
    pub fn step(
        &mut self,
        world: &impl CollisionWorld,
        input: &InputSample,
        time: FrameTime,
    ) -> FrameOutput {
        let locomotion = self.locomotion.step(world, input, time);

        let weapon = self.weapon.as_mut().and_then(|weapon| {
            if locomotion.jumped {
                weapon.notify_jump();
            }
            weapon.update(&locomotion.snapshot, &locomotion.camera, time)
        });

        FrameOutput { locomotion, weapon }
    }
}
