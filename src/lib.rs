/*!
Per-frame first-person locomotion and weapon-presentation simulation.

Converts raw input deltas into smoothed camera orientation, body movement,
stance transitions, jump/fall state, and weapon sway motion. The stages run
in a fixed order every frame — ground sensing, locomotion (view, movement,
stance), then weapon presentation over the published snapshot — and all
state advances through explicit `dt`, so a recorded input stream replays
deterministically.

The world is reached only through the [`collision::CollisionWorld`] oracle
(two overlap probes and one collision-aware move); [`collision::StaticWorld`]
implements it over a static shape set.
*/

pub mod collision;
pub mod ground;
pub mod input;
pub mod locomotion;
pub mod settings;
pub mod simulation;
pub mod smoothing;
pub mod stance;
pub mod weapon;

pub use collision::{
    CapsuleSpec, CollisionWorld, LayerMask, Quat, StaticShape, StaticWorld, Transform, Vec2, Vec3,
    WorldStatic,
};
pub use ground::GroundState;
pub use input::{FrameTime, InputSample};
pub use locomotion::{CameraRig, FrameSnapshot, LocomotionController, LocomotionFrame, MotionState};
pub use settings::{PlayerSettings, StanceProfile, StanceProfiles, WeaponSettings};
pub use simulation::{CharacterSimulation, FrameOutput};
pub use smoothing::{DampedF32, DampedVec3, smooth_damp, smooth_damp_vec3};
pub use stance::{Stance, StanceMachine};
pub use weapon::{AnimationFrame, WeaponController, WeaponFrame, WeaponSwayState};
