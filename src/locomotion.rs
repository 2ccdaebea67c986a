/*!
Locomotion controller.

Runs the per-frame movement pipeline in a fixed order: ground sensing,
view rotation, discrete actions (stance, sprint, jump), speed selection,
smoothed horizontal movement, gravity and jump-impulse integration, the
collision-aware move, and the continuous stance update. At the end of the
step it publishes a read-only [`FrameSnapshot`] for the weapon-presentation
stage; nothing in this controller reads weapon state.
*/

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionWorld, LayerMask, Quat, Vec2, Vec3};
use crate::ground::GroundState;
use crate::input::{FrameTime, InputSample};
use crate::settings::{PlayerSettings, StanceProfiles};
use crate::smoothing::DampedVec3;
use crate::stance::{Stance, StanceMachine};

/// Sprint cannot engage (and force-disengages) at or below this much
/// forward input.
const SPRINT_MIN_FORWARD: f32 = 0.2;

/// Resting value the gravity scalar is clamped to while grounded; keeps a
/// small downward bias so the grounded probe stays in contact.
const GROUNDED_GRAVITY_REST: f32 = -0.1;

/// Continuously-evolving motion quantities owned by the controller.
///
/// The damped channels carry their own auxiliary memory across frames;
/// the auxiliaries are filter state, never recomputed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MotionState {
    /// Foot-anchor position in world space.
    pub position: Vec3,
    /// Body facing, degrees. Applied to the whole body.
    pub yaw: f32,
    /// Camera pitch, degrees. Camera-only, clamped every frame.
    pub pitch: f32,
    /// Accumulated downward displacement bias.
    pub gravity: f32,
    /// Decaying jump impulse, world space.
    pub jump_impulse: DampedVec3,
    /// Smoothed local-space per-frame movement.
    smoothed_move: DampedVec3,
    /// World-space velocity actually applied on the previous frame (m/s).
    pub velocity: Vec3,
    pub is_sprinting: bool,
}

impl MotionState {
    fn at(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            gravity: 0.0,
            jump_impulse: DampedVec3::default(),
            smoothed_move: DampedVec3::default(),
            velocity: Vec3::zeros(),
            is_sprinting: false,
        }
    }
}

/// Read-only projection handed to the weapon-presentation stage.
/// Created fresh each frame, discarded after consumption.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub move_input: Vec2,
    pub view_input: Vec2,
    pub is_grounded: bool,
    pub is_sprinting: bool,
    /// Current speed over the expected walk speed, clamped to 1.
    pub speed_ratio: f32,
    pub stance: Stance,
}

/// Camera pose derived from the motion state, world space.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: Vec3,
    /// Body yaw, degrees.
    pub yaw: f32,
    /// Camera pitch, degrees.
    pub pitch: f32,
}

impl CameraRig {
    /// Full camera orientation (yaw then pitch).
    pub fn rotation(&self) -> Quat {
        Quat::from_axis_angle(&na::Vector3::y_axis(), self.yaw.to_radians())
            * Quat::from_axis_angle(&na::Vector3::x_axis(), self.pitch.to_radians())
    }

    /// World-space view direction.
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::z()
    }
}

/// Everything the presentation layer needs from one locomotion step.
#[derive(Clone, Copy, Debug)]
pub struct LocomotionFrame {
    pub snapshot: FrameSnapshot,
    /// Foot-anchor position after the move.
    pub position: Vec3,
    pub camera: CameraRig,
    /// Smoothed collider shape for this frame.
    pub collider_height: f32,
    pub collider_center: Vec3,
    /// A jump impulse fired this frame (one-shot notification).
    pub jumped: bool,
}

/// Owns and advances the character's motion, stance, and ground state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocomotionController {
    settings: PlayerSettings,
    profiles: StanceProfiles,
    state: MotionState,
    stance: StanceMachine,
    ground: GroundState,
}

impl LocomotionController {
    pub fn new(settings: PlayerSettings, profiles: StanceProfiles, position: Vec3) -> Self {
        Self {
            settings,
            stance: StanceMachine::new(&profiles),
            profiles,
            state: MotionState::at(position),
            ground: GroundState::default(),
        }
    }

    #[inline]
    pub fn state(&self) -> &MotionState {
        &self.state
    }

    #[inline]
    pub fn ground(&self) -> GroundState {
        self.ground
    }

    #[inline]
    pub fn stance(&self) -> Stance {
        self.stance.stance()
    }

    #[inline]
    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    /// Camera pose at the current smoothed camera height.
    pub fn camera(&self) -> CameraRig {
        CameraRig {
            position: self.state.position + Vec3::new(0.0, self.stance.camera_height(), 0.0),
            yaw: self.state.yaw,
            pitch: self.state.pitch,
        }
    }

    /// Advance one frame.
    pub fn step(
        &mut self,
        world: &impl CollisionWorld,
        input: &InputSample,
        time: FrameTime,
    ) -> LocomotionFrame {
        let dt = time.delta.max(0.0);

        // 1. Sensors first: everything downstream reads this frame's
        // ground state, never last frame's.
        self.ground = GroundState::probe(
            world,
            &self.settings,
            self.state.position,
            self.state.velocity.norm(),
        );

        // 2. View. Yaw turns the whole body, unsmoothed; pitch is
        // camera-only and clamped.
        self.update_view(input.view, dt);

        // 3. Discrete actions.
        if input.crouch_pressed {
            self.stance
                .handle_crouch(world, &self.settings, &self.profiles, self.state.position);
        }
        if input.prone_pressed {
            self.stance.handle_prone();
        }
        if input.sprint_toggled {
            self.state.is_sprinting =
                input.move_axis.y > SPRINT_MIN_FORWARD && !self.state.is_sprinting;
        }
        if input.sprint_released && self.settings.sprinting_hold {
            self.state.is_sprinting = false;
        }
        let jumped = input.jump_pressed && self.try_jump(world);

        // 4. Sprint gate: too little forward input always drops sprint.
        if input.move_axis.y <= SPRINT_MIN_FORWARD {
            self.state.is_sprinting = false;
        }

        // 5-9. Movement integration and the collision-aware move.
        let speed_ratio = self.update_movement(world, input.move_axis, dt);

        // Jump impulse decays toward zero every frame; it is a force
        // applied each frame, not a one-shot displacement.
        self.state
            .jump_impulse
            .approach(Vec3::zeros(), self.settings.jumping_falloff, dt);

        // 10. Continuous stance shape update.
        self.stance
            .update(&self.profiles, self.settings.stance_smoothing, dt);

        LocomotionFrame {
            snapshot: FrameSnapshot {
                move_input: input.move_axis,
                view_input: input.view,
                is_grounded: self.ground.is_grounded,
                is_sprinting: self.state.is_sprinting,
                speed_ratio,
                stance: self.stance.stance(),
            },
            position: self.state.position,
            camera: self.camera(),
            collider_height: self.stance.collider_height(),
            collider_center: self.stance.collider_center(),
            jumped,
        }
    }

    fn update_view(&mut self, view: Vec2, dt: f32) {
        let s = &self.settings;

        let yaw_input = if s.view_x_inverted { -view.x } else { view.x };
        self.state.yaw += s.view_y_sensitivity * yaw_input * dt;

        let pitch_input = if s.view_y_inverted { view.y } else { -view.y };
        self.state.pitch = (self.state.pitch + s.view_x_sensitivity * pitch_input * dt)
            .clamp(s.view_clamp_x_min, s.view_clamp_x_max);
    }

    /// Jump press. Only grounded presses do anything; from crouch or prone
    /// the press becomes a stand-up attempt and the impulse is suppressed.
    /// Returns true when an impulse actually fired.
    fn try_jump(&mut self, world: &impl CollisionWorld) -> bool {
        if !self.ground.is_grounded {
            return false;
        }
        if self.stance.stance() != Stance::Stand {
            self.stance
                .stand_up(world, &self.settings, &self.profiles, self.state.position);
            return false;
        }

        self.state
            .jump_impulse
            .set(Vec3::new(0.0, self.settings.jumping_height, 0.0));
        self.state.gravity = 0.0;
        log::debug!("jump impulse {}", self.settings.jumping_height);
        true
    }

    /// Steps 4-9 of the frame: speed selection, smoothing, gravity, move.
    /// Returns the weapon playback speed ratio.
    fn update_movement(
        &mut self,
        world: &impl CollisionWorld,
        move_axis: Vec2,
        dt: f32,
    ) -> f32 {
        let s = &self.settings;

        let (mut forward_speed, mut strafe_speed) = if self.state.is_sprinting {
            (s.running_forward_speed, s.running_strafe_speed)
        } else {
            (s.walking_forward_speed, s.walking_strafe_speed)
        };

        // Speed effector by situation; airborne wins over stance.
        let effector = if !self.ground.is_grounded {
            s.falling_speed_effector
        } else {
            match self.stance.stance() {
                Stance::Crouch => s.crouch_speed_effector,
                Stance::Prone => s.prone_speed_effector,
                Stance::Stand => 1.0,
            }
        };

        // Presentation-only ratio of current speed to expected walk speed.
        let speed_ratio =
            (self.state.velocity.norm() / (s.walking_forward_speed * effector)).min(1.0);

        forward_speed *= effector;
        strafe_speed *= effector;

        // Desired local-space displacement for this frame, smoothed with
        // separate ground and air time constants.
        let target = Vec3::new(
            strafe_speed * move_axis.x * dt,
            0.0,
            forward_speed * move_axis.y * dt,
        );
        let smoothing = if self.ground.is_grounded {
            s.movement_smoothing
        } else {
            s.falling_smoothing
        };
        let local_step = self.state.smoothed_move.approach(target, smoothing, dt);

        // Into world space through the body orientation.
        let body_rotation =
            Quat::from_axis_angle(&na::Vector3::y_axis(), self.state.yaw.to_radians());
        let mut displacement = body_rotation * local_step;

        // Gravity scalar: integrate down to the terminal value, clamp to a
        // small resting bias while grounded.
        if self.state.gravity > s.gravity_min {
            self.state.gravity -= s.gravity_amount * dt;
        }
        if self.state.gravity < GROUNDED_GRAVITY_REST && self.ground.is_grounded {
            self.state.gravity = GROUNDED_GRAVITY_REST;
        }
        displacement.y += self.state.gravity;
        displacement += self.state.jump_impulse.current * dt;

        // Collision-aware move of the collider capsule at its current
        // smoothed shape; position advances by what was actually applied.
        let capsule = self.stance.capsule(s.collider_radius);
        let center = self.state.position + self.stance.collider_center();
        let applied = world.move_capsule(capsule, center, displacement, LayerMask::ALL);
        self.state.position += applied;
        self.state.velocity = if dt > 0.0 {
            applied / dt
        } else {
            Vec3::zeros()
        };

        speed_ratio
    }
}
