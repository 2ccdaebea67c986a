/*!
Weapon presentation controller.

Consumes the locomotion stage's [`FrameSnapshot`] and produces the held
weapon's local rotation, its world anchor position, and the animation
signals for the frame. Two independent sway channels (look-driven and
movement-driven) combine additively into the local rotation; an idle
Lissajous offset and the aim-in blend drive the anchor position.

The controller is constructed first and bound to its owning locomotion
stage afterwards; updates before the bind are no-ops.
*/

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::collision::{Quat, Vec3};
use crate::input::FrameTime;
use crate::locomotion::{CameraRig, FrameSnapshot};
use crate::settings::WeaponSettings;
use crate::smoothing::DampedVec3;

/// Sway and blend state owned by the controller.
///
/// Rotation channels hold Euler degrees as (pitch, yaw, roll) vectors; each
/// target relaxes toward zero while the applied value chases it, and every
/// channel keeps its own auxiliary memory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeaponSwayState {
    look_target: DampedVec3,
    look_applied: DampedVec3,
    movement_target: DampedVec3,
    movement_applied: DampedVec3,
    /// Monotonic phase of the idle Lissajous motion.
    idle_phase: f32,
    /// Blended idle position offset.
    idle_offset: Vec3,
    /// Aim-in blended sway-anchor position, world space.
    anchor: DampedVec3,
    /// Grounded latch for landing/falling edge detection.
    grounded_latch: bool,
    /// Accumulated airborne time for the landing debounce.
    airborne_time: f32,
    /// Jump notification waiting to be emitted this frame.
    pending_jump: bool,
}

impl WeaponSwayState {
    fn new(anchor_position: Vec3) -> Self {
        Self {
            look_target: DampedVec3::default(),
            look_applied: DampedVec3::default(),
            movement_target: DampedVec3::default(),
            movement_applied: DampedVec3::default(),
            idle_phase: 0.0,
            idle_offset: Vec3::zeros(),
            anchor: DampedVec3::new(anchor_position),
            grounded_latch: false,
            airborne_time: 0.0,
            pending_jump: false,
        }
    }
}

/// Animation signals for one frame. `jump`, `landing` and `falling` are
/// one-shot triggers; the rest are levels set every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub jump: bool,
    pub landing: bool,
    pub falling: bool,
    pub is_sprinting: bool,
    /// Animator playback speed, the locomotion stage's speed ratio.
    pub playback_speed: f32,
}

/// Weapon transform and animation output for one frame.
#[derive(Clone, Copy, Debug)]
pub struct WeaponFrame {
    /// Local rotation offset as Euler degrees (pitch, yaw, roll).
    pub local_rotation: Vec3,
    /// World-space sway-anchor position, idle offset included.
    pub anchor_position: Vec3,
    pub anim: AnimationFrame,
}

impl WeaponFrame {
    /// The local rotation as a quaternion.
    pub fn rotation(&self) -> Quat {
        Quat::from_euler_angles(
            self.local_rotation.x.to_radians(),
            self.local_rotation.y.to_radians(),
            self.local_rotation.z.to_radians(),
        )
    }
}

/// Owns the weapon sway state; updated once per frame after locomotion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeaponController {
    settings: WeaponSettings,
    state: WeaponSwayState,
    bound: bool,
    aiming: bool,
}

impl WeaponController {
    /// Construct unbound. `anchor_position` is the sway anchor's rest pose
    /// in world space.
    pub fn new(settings: WeaponSettings, anchor_position: Vec3) -> Self {
        Self {
            settings,
            state: WeaponSwayState::new(anchor_position),
            bound: false,
            aiming: false,
        }
    }

    /// Second phase of construction: attach to the owning locomotion stage.
    /// Until this is called, `update` and `notify_jump` do nothing.
    pub fn bind(&mut self) {
        self.bound = true;
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Level input from the input collaborator: aiming down sights.
    pub fn set_aiming(&mut self, aiming: bool) {
        self.aiming = aiming;
    }

    #[inline]
    pub fn is_aiming(&self) -> bool {
        self.aiming
    }

    /// One-shot jump notification from the locomotion stage. Emitted as the
    /// `jump` trigger on this frame's update; also drops the grounded latch
    /// so the takeoff does not double as a `falling` trigger.
    pub fn notify_jump(&mut self) {
        if !self.bound {
            return;
        }
        self.state.pending_jump = true;
        self.state.grounded_latch = false;
        self.state.airborne_time = 0.0;
    }

    /// Advance one frame. Returns `None` until the controller is bound.
    pub fn update(
        &mut self,
        snapshot: &FrameSnapshot,
        camera: &CameraRig,
        time: FrameTime,
    ) -> Option<WeaponFrame> {
        if !self.bound {
            return None;
        }

        let local_rotation = self.update_rotation(snapshot, time.delta);
        let anim = self.update_animation(snapshot, time.delta);
        self.update_idle_sway(time);
        let anchor_position = self.update_aiming_in(camera, time.delta);

        Some(WeaponFrame {
            local_rotation,
            anchor_position,
            anim,
        })
    }

    /// Look-sway and movement-sway channels, combined additively.
    fn update_rotation(&mut self, snapshot: &FrameSnapshot, dt: f32) -> Vec3 {
        let s = &self.settings;

        // Look channel: accumulate from view input (half strength while
        // aiming), clamp, roll mirrors the yaw target when not aiming.
        let amount = if self.aiming {
            s.sway_amount / 2.0
        } else {
            s.sway_amount
        };
        let view_x = if s.sway_x_inverted {
            -snapshot.view_input.x
        } else {
            snapshot.view_input.x
        };
        let view_y = if s.sway_y_inverted {
            snapshot.view_input.y
        } else {
            -snapshot.view_input.y
        };

        let target = &mut self.state.look_target;
        target.current.y += amount * view_x * dt;
        target.current.x += amount * view_y * dt;
        target.current.x = target.current.x.clamp(-s.sway_clamp_x, s.sway_clamp_x);
        target.current.y = target.current.y.clamp(-s.sway_clamp_y, s.sway_clamp_y);
        target.current.z = if self.aiming { 0.0 } else { target.current.y };

        target.approach(Vec3::zeros(), s.sway_reset_smoothing, dt);
        let look = self
            .state
            .look_applied
            .approach(self.state.look_target.current, s.sway_smoothing, dt);

        // Movement channel: driven by move input, quartered while aiming.
        let scale_x = if self.aiming {
            s.movement_sway_x / 4.0
        } else {
            s.movement_sway_x
        };
        let scale_y = if self.aiming {
            s.movement_sway_y / 4.0
        } else {
            s.movement_sway_y
        };
        let move_x = if s.movement_sway_x_inverted {
            -snapshot.move_input.x
        } else {
            snapshot.move_input.x
        };
        let move_y = if s.movement_sway_y_inverted {
            -snapshot.move_input.y
        } else {
            snapshot.move_input.y
        };

        let target = &mut self.state.movement_target;
        target.current.z = scale_x * move_x;
        target.current.x = scale_y * move_y;

        target.approach(Vec3::zeros(), s.sway_reset_smoothing, dt);
        let movement = self
            .state
            .movement_applied
            .approach(self.state.movement_target.current, s.movement_sway_smoothing, dt);

        look + movement
    }

    /// Edge-detected landing/falling triggers plus the level signals.
    ///
    /// `landing` fires only on the frame grounded becomes true, and only
    /// when the airborne stretch lasted past the debounce; shorter hops
    /// land silently. `falling` fires on the frame grounded becomes false.
    fn update_animation(&mut self, snapshot: &FrameSnapshot, dt: f32) -> AnimationFrame {
        let state = &mut self.state;

        if !state.grounded_latch {
            state.airborne_time += dt;
        }

        let mut landing = false;
        let mut falling = false;
        if snapshot.is_grounded && !state.grounded_latch {
            landing = state.airborne_time > self.settings.landing_debounce;
            state.grounded_latch = true;
            state.airborne_time = 0.0;
            if landing {
                log::trace!("landing trigger");
            }
        } else if !snapshot.is_grounded && state.grounded_latch {
            falling = true;
            state.grounded_latch = false;
            state.airborne_time = 0.0;
            log::trace!("falling trigger");
        }

        let jump = std::mem::take(&mut state.pending_jump);

        AnimationFrame {
            jump,
            landing,
            falling,
            is_sprinting: snapshot.is_sprinting,
            playback_speed: snapshot.speed_ratio,
        }
    }

    /// Idle motion: a closed Lissajous curve blended in at a fixed rate,
    /// damped down while aiming.
    fn update_idle_sway(&mut self, time: FrameTime) {
        let s = &self.settings;
        let scale = if self.aiming {
            s.idle_sway_scale * 4.0
        } else {
            s.idle_sway_scale
        };
        let target =
            lissajous(self.state.idle_phase, s.idle_sway_amount_a, s.idle_sway_amount_b) / scale;

        let blend = (time.smoothed_delta * s.idle_sway_lerp_speed).clamp(0.0, 1.0);
        self.state.idle_offset += (target - self.state.idle_offset) * blend;
        self.state.idle_phase += time.delta;
    }

    /// Aim-in repositioning: while aiming the anchor chases a point that
    /// puts the sight in front of the camera; otherwise it holds in place.
    fn update_aiming_in(&mut self, camera: &CameraRig, dt: f32) -> Vec3 {
        let s = &self.settings;
        let target = if self.aiming {
            camera.position - s.sight_anchor_offset + camera.forward() * s.sight_offset
        } else {
            self.state.anchor.current
        };

        self.state.anchor.approach(target, s.aiming_in_time, dt);
        self.state.anchor.current + self.state.idle_offset
    }
}

/// Closed idle-motion curve: `(sin t, A·sin(B·t + π), 0)`.
fn lissajous(t: f32, a: f32, b: f32) -> Vec3 {
    Vec3::new(t.sin(), a * (b * t + PI).sin(), 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Vec2;
    use crate::stance::Stance;
    use approx::assert_relative_eq;

    const DT: FrameTime = FrameTime {
        delta: 1.0 / 60.0,
        smoothed_delta: 1.0 / 60.0,
    };

    fn snapshot() -> FrameSnapshot {
        FrameSnapshot {
            move_input: Vec2::zeros(),
            view_input: Vec2::zeros(),
            is_grounded: true,
            is_sprinting: false,
            speed_ratio: 0.0,
            stance: Stance::Stand,
        }
    }

    fn camera() -> CameraRig {
        CameraRig {
            position: Vec3::new(0.0, 1.7, 0.0),
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    fn bound_controller() -> WeaponController {
        let mut controller = WeaponController::new(WeaponSettings::default(), Vec3::zeros());
        controller.bind();
        controller
    }

    #[test]
    fn update_is_noop_until_bound() {
        let mut controller = WeaponController::new(WeaponSettings::default(), Vec3::zeros());

        assert!(controller.update(&snapshot(), &camera(), DT).is_none());
        controller.notify_jump();
        assert!(!controller.state.pending_jump);

        controller.bind();
        assert!(controller.update(&snapshot(), &camera(), DT).is_some());
    }

    #[test]
    fn jump_trigger_fires_exactly_once() {
        let mut controller = bound_controller();

        controller.notify_jump();
        let frame = controller.update(&snapshot(), &camera(), DT).unwrap();
        assert!(frame.anim.jump);

        let frame = controller.update(&snapshot(), &camera(), DT).unwrap();
        assert!(!frame.anim.jump);
    }

    #[test]
    fn landing_fires_once_after_debounced_airtime() {
        let mut controller = bound_controller();
        let mut airborne = snapshot();
        airborne.is_grounded = false;
        let grounded = snapshot();

        // Latch grounded first (no landing on a quiet first frame), then go
        // airborne: the falling edge fires exactly on the transition.
        let frame = controller.update(&grounded, &camera(), DT).unwrap();
        assert!(!frame.anim.landing);
        let frame = controller.update(&airborne, &camera(), DT).unwrap();
        assert!(frame.anim.falling);

        // Airborne for 0.15s with a 0.1s debounce.
        for _ in 0..9 {
            let frame = controller.update(&airborne, &camera(), DT).unwrap();
            assert!(!frame.anim.landing);
            assert!(!frame.anim.falling, "falling is an edge, not a level");
        }

        let frame = controller.update(&grounded, &camera(), DT).unwrap();
        assert!(frame.anim.landing, "landing fires on the transition frame");

        // No repeats on subsequent grounded frames.
        for _ in 0..10 {
            let frame = controller.update(&grounded, &camera(), DT).unwrap();
            assert!(!frame.anim.landing);
        }
    }

    #[test]
    fn short_hops_under_debounce_never_land() {
        let mut controller = bound_controller();
        let mut airborne = snapshot();
        airborne.is_grounded = false;
        let grounded = snapshot();

        controller.update(&grounded, &camera(), DT).unwrap();
        // Two airborne frames (~0.033s) is under the 0.1s debounce.
        controller.update(&airborne, &camera(), DT).unwrap();
        controller.update(&airborne, &camera(), DT).unwrap();

        // Neither the transition frame nor any later grounded frame lands.
        for _ in 0..30 {
            let frame = controller.update(&grounded, &camera(), DT).unwrap();
            assert!(!frame.anim.landing);
        }
    }

    #[test]
    fn level_signals_pass_through() {
        let mut controller = bound_controller();
        let mut snap = snapshot();
        snap.is_sprinting = true;
        snap.speed_ratio = 0.75;

        let frame = controller.update(&snap, &camera(), DT).unwrap();
        assert!(frame.anim.is_sprinting);
        assert_relative_eq!(frame.anim.playback_speed, 0.75);
    }

    #[test]
    fn look_sway_target_respects_clamp() {
        let mut controller = bound_controller();
        let mut snap = snapshot();
        snap.view_input = Vec2::new(1000.0, 1000.0);

        for _ in 0..120 {
            controller.update(&snap, &camera(), DT).unwrap();
        }

        let s = &controller.settings;
        let target = controller.state.look_target.current;
        assert!(target.x.abs() <= s.sway_clamp_x);
        assert!(target.y.abs() <= s.sway_clamp_y);
    }

    #[test]
    fn aiming_halves_look_sway_accumulation() {
        let mut snap = snapshot();
        snap.view_input = Vec2::new(1.0, 0.0);

        let mut hip = bound_controller();
        hip.update(&snap, &camera(), DT).unwrap();
        let hip_yaw = hip.state.look_target.current.y;

        let mut aimed = bound_controller();
        aimed.set_aiming(true);
        aimed.update(&snap, &camera(), DT).unwrap();
        let aimed_yaw = aimed.state.look_target.current.y;

        // Both accumulate then relax once; the aimed target accumulated at
        // half strength, so it stays at half of the hip target.
        assert_relative_eq!(aimed_yaw, hip_yaw / 2.0, max_relative = 1.0e-4);
    }

    #[test]
    fn roll_mirrors_yaw_target_only_from_hip() {
        let mut snap = snapshot();
        snap.view_input = Vec2::new(1.0, 0.0);

        let mut hip = bound_controller();
        hip.update(&snap, &camera(), DT).unwrap();
        let target = hip.state.look_target.current;
        assert_relative_eq!(target.z, target.y);

        let mut aimed = bound_controller();
        aimed.set_aiming(true);
        aimed.update(&snap, &camera(), DT).unwrap();
        assert_eq!(aimed.state.look_target.current.z, 0.0);
    }

    #[test]
    fn idle_sway_phase_advances_with_dt() {
        let mut controller = bound_controller();

        for _ in 0..60 {
            controller.update(&snapshot(), &camera(), DT).unwrap();
        }
        assert_relative_eq!(controller.state.idle_phase, 1.0, epsilon = 1.0e-4);
        // The blended offset tracks the curve: nonzero after a second.
        assert!(controller.state.idle_offset.norm() > 0.0);
    }

    #[test]
    fn aiming_in_moves_anchor_toward_sight_point() {
        let mut controller = bound_controller();
        controller.set_aiming(true);
        let cam = camera();

        for _ in 0..600 {
            controller.update(&snapshot(), &cam, DT).unwrap();
        }

        let s = &controller.settings;
        let expected = cam.position - s.sight_anchor_offset + cam.forward() * s.sight_offset;
        assert_relative_eq!(controller.state.anchor.current.x, expected.x, epsilon = 1.0e-3);
        assert_relative_eq!(controller.state.anchor.current.y, expected.y, epsilon = 1.0e-3);
        assert_relative_eq!(controller.state.anchor.current.z, expected.z, epsilon = 1.0e-3);
    }

    #[test]
    fn anchor_holds_position_from_hip() {
        let mut controller = bound_controller();
        let rest = controller.state.anchor.current;

        for _ in 0..120 {
            controller.update(&snapshot(), &camera(), DT).unwrap();
        }
        assert_relative_eq!(controller.state.anchor.current.x, rest.x, epsilon = 1.0e-6);
        assert_relative_eq!(controller.state.anchor.current.y, rest.y, epsilon = 1.0e-6);
        assert_relative_eq!(controller.state.anchor.current.z, rest.z, epsilon = 1.0e-6);
    }
}
