/*!
Immutable configuration records.

All tunables are supplied at construction and never mutated by the
simulation. The defaults below describe a medium-build character at a
60 Hz-ish step; games override them from their own data.

Notes
- Distances are in meters, time constants in seconds, angles in degrees.
- Sensitivities are degrees per second per unit of view input.
*/

use serde::{Deserialize, Serialize};

use crate::collision::{LayerMask, Vec3};
use crate::stance::Stance;

/// Layer occupied by walkable world geometry.
pub const GROUND_LAYER: LayerMask = LayerMask::layer(0);

/// Layer occupied by geometry that can block a stance change (everything
/// solid except the character itself).
pub const OBSTRUCTION_LAYER: LayerMask = LayerMask::layer(1);

/// Locomotion tunables: view, speeds, gravity, stance probing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerSettings {
    /// Pitch sensitivity (degrees/second per unit of view input).
    pub view_x_sensitivity: f32,
    /// Yaw sensitivity (degrees/second per unit of view input).
    pub view_y_sensitivity: f32,
    pub view_x_inverted: bool,
    pub view_y_inverted: bool,
    /// Camera pitch clamp, degrees. Min is the upward limit.
    pub view_clamp_x_min: f32,
    pub view_clamp_x_max: f32,

    /// When true, releasing the sprint binding always drops out of sprint.
    pub sprinting_hold: bool,
    /// Movement smoothing time constant while grounded.
    pub movement_smoothing: f32,
    /// Movement smoothing time constant while airborne (looser control).
    pub falling_smoothing: f32,

    pub walking_forward_speed: f32,
    pub walking_strafe_speed: f32,
    pub running_forward_speed: f32,
    pub running_strafe_speed: f32,

    /// Initial upward jump impulse magnitude.
    pub jumping_height: f32,
    /// Time constant of the jump impulse decay.
    pub jumping_falloff: f32,

    /// Downward accumulation rate of the gravity scalar.
    pub gravity_amount: f32,
    /// Lower bound of the gravity scalar (terminal fall).
    pub gravity_min: f32,

    /// Speed multipliers by situation; full speed is 1.0.
    pub crouch_speed_effector: f32,
    pub prone_speed_effector: f32,
    pub falling_speed_effector: f32,

    /// Radius of the grounded sphere probe at the foot anchor.
    pub is_grounded_radius: f32,
    /// Speed above which an airborne character counts as falling.
    pub is_falling_speed: f32,

    /// Time constant for camera-height/collider stance transitions.
    pub stance_smoothing: f32,
    /// Vertical slack applied to both ends of the stance feasibility probe.
    pub stance_error_margin: f32,

    /// Radius of the character's capsule collider.
    pub collider_radius: f32,

    /// Layers the grounded probe tests against.
    pub ground_mask: LayerMask,
    /// Layers the stance feasibility probe tests against. Must exclude the
    /// character itself.
    pub obstruction_mask: LayerMask,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            view_x_sensitivity: 20.0,
            view_y_sensitivity: 25.0,
            view_x_inverted: false,
            view_y_inverted: false,
            view_clamp_x_min: -70.0,
            view_clamp_x_max: 80.0,

            sprinting_hold: false,
            movement_smoothing: 0.2,
            falling_smoothing: 0.6,

            walking_forward_speed: 5.0,
            walking_strafe_speed: 4.0,
            running_forward_speed: 9.0,
            running_strafe_speed: 6.0,

            jumping_height: 18.0,
            jumping_falloff: 0.15,

            gravity_amount: 9.81,
            gravity_min: -6.0,

            crouch_speed_effector: 0.6,
            prone_speed_effector: 0.25,
            falling_speed_effector: 0.85,

            is_grounded_radius: 0.25,
            is_falling_speed: 3.0,

            stance_smoothing: 0.15,
            stance_error_margin: 0.05,

            collider_radius: 0.3,

            ground_mask: GROUND_LAYER,
            obstruction_mask: OBSTRUCTION_LAYER,
        }
    }
}

/// Camera and collider shape for one stance.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StanceProfile {
    /// Camera height above the foot anchor.
    pub camera_height: f32,
    /// Total collider capsule height.
    pub collider_height: f32,
    /// Collider center offset from the foot anchor.
    pub collider_center: Vec3,
}

/// The three stance profiles, indexed by [`Stance`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StanceProfiles {
    pub standing: StanceProfile,
    pub crouching: StanceProfile,
    pub prone: StanceProfile,
}

impl StanceProfiles {
    /// The profile the given stance transitions toward.
    #[inline]
    pub fn profile(&self, stance: Stance) -> &StanceProfile {
        match stance {
            Stance::Stand => &self.standing,
            Stance::Crouch => &self.crouching,
            Stance::Prone => &self.prone,
        }
    }
}

impl Default for StanceProfiles {
    fn default() -> Self {
        Self {
            standing: StanceProfile {
                camera_height: 1.7,
                collider_height: 1.8,
                collider_center: Vec3::new(0.0, 0.9, 0.0),
            },
            crouching: StanceProfile {
                camera_height: 1.05,
                collider_height: 1.2,
                collider_center: Vec3::new(0.0, 0.6, 0.0),
            },
            prone: StanceProfile {
                camera_height: 0.45,
                collider_height: 0.6,
                collider_center: Vec3::new(0.0, 0.3, 0.0),
            },
        }
    }
}

/// Weapon-presentation tunables: sway channels, idle motion, sights.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeaponSettings {
    /// Look-sway accumulation rate (degrees/second per unit of view input).
    /// Halved while aiming.
    pub sway_amount: f32,
    pub sway_x_inverted: bool,
    pub sway_y_inverted: bool,
    /// Chase time constant: applied rotation toward the sway target.
    pub sway_smoothing: f32,
    /// Relax time constant: sway targets back toward zero.
    pub sway_reset_smoothing: f32,
    /// Look-sway target clamps, degrees.
    pub sway_clamp_x: f32,
    pub sway_clamp_y: f32,

    /// Movement-sway scale per unit of strafe input. Quartered while aiming.
    pub movement_sway_x: f32,
    /// Movement-sway scale per unit of forward input. Quartered while aiming.
    pub movement_sway_y: f32,
    pub movement_sway_x_inverted: bool,
    pub movement_sway_y_inverted: bool,
    /// Chase time constant for the movement-sway channel.
    pub movement_sway_smoothing: f32,

    /// Lissajous amplitudes of the idle motion.
    pub idle_sway_amount_a: f32,
    pub idle_sway_amount_b: f32,
    /// Idle offset divisor; multiplied by four while aiming.
    pub idle_sway_scale: f32,
    /// Linear blend rate toward the idle offset.
    pub idle_sway_lerp_speed: f32,

    /// Distance the sight floats in front of the camera while aiming.
    pub sight_offset: f32,
    /// Aim-in reposition time constant.
    pub aiming_in_time: f32,
    /// Rigid offset from the sway anchor to the sight anchor.
    pub sight_anchor_offset: Vec3,

    /// Minimum airborne time before a grounded edge counts as a landing.
    pub landing_debounce: f32,
}

impl Default for WeaponSettings {
    fn default() -> Self {
        Self {
            sway_amount: 4.0,
            sway_x_inverted: false,
            sway_y_inverted: false,
            sway_smoothing: 0.06,
            sway_reset_smoothing: 0.1,
            sway_clamp_x: 8.0,
            sway_clamp_y: 8.0,

            movement_sway_x: 2.0,
            movement_sway_y: 2.0,
            movement_sway_x_inverted: false,
            movement_sway_y_inverted: false,
            movement_sway_smoothing: 0.08,

            idle_sway_amount_a: 1.0,
            idle_sway_amount_b: 2.0,
            idle_sway_scale: 600.0,
            idle_sway_lerp_speed: 14.0,

            sight_offset: 0.2,
            aiming_in_time: 0.2,
            sight_anchor_offset: Vec3::new(0.0, 0.08, 0.0),

            landing_debounce: 0.1,
        }
    }
}
