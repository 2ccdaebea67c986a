/*!
Critically-damped approach filter.

Every rotation, position, and collider-shape transition in the simulation
is built from this one smoothing step: a spring-damper tuned for critical
damping, so the value approaches its target without overshoot and the rate
of approach is controlled by a single time constant.

Each logical channel keeps its own auxiliary (velocity-like) memory across
frames; the [`DampedF32`]/[`DampedVec3`] structs bundle the pair so two
channels can never alias their auxiliaries.
*/

use serde::{Deserialize, Serialize};

use crate::collision::Vec3;

/// Below this time constant the filter snaps straight to the target
/// instead of dividing by a near-zero smoothing time.
pub const MIN_SMOOTH_TIME: f32 = 1.0e-4;

/// One critically-damped smoothing step for a scalar.
///
/// Returns the new value and the new auxiliary. Guarantees:
/// - deterministic given identical inputs;
/// - `dt <= 0` returns the current value unchanged;
/// - `smooth_time <= MIN_SMOOTH_TIME` snaps to the target in one step;
/// - never overshoots the target.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: f32,
    smooth_time: f32,
    dt: f32,
) -> (f32, f32) {
    if dt <= 0.0 {
        return (current, velocity);
    }
    if smooth_time <= MIN_SMOOTH_TIME {
        return (target, 0.0);
    }

    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    // Pade-style approximation of e^-x, stable for large steps.
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (velocity + omega * change) * dt;
    let mut new_velocity = (velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Clamp at the target if the damped step crossed it.
    if (target - current > 0.0) == (output > target) {
        output = target;
        new_velocity = 0.0;
    }

    (output, new_velocity)
}

/// Component-wise critically-damped step for a 3-vector.
pub fn smooth_damp_vec3(
    current: Vec3,
    target: Vec3,
    velocity: Vec3,
    smooth_time: f32,
    dt: f32,
) -> (Vec3, Vec3) {
    if dt <= 0.0 {
        return (current, velocity);
    }
    if smooth_time <= MIN_SMOOTH_TIME {
        return (target, Vec3::zeros());
    }

    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (velocity + change * omega) * dt;
    let mut new_velocity = (velocity - temp * omega) * exp;
    let mut output = target + (change + temp) * exp;

    // Clamp at the target if the damped step crossed it.
    if (target - current).dot(&(output - target)) > 0.0 {
        output = target;
        new_velocity = Vec3::zeros();
    }

    (output, new_velocity)
}

/// A scalar smoothing channel: current value plus its auxiliary memory.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct DampedF32 {
    pub current: f32,
    velocity: f32,
}

impl DampedF32 {
    #[inline]
    pub fn new(current: f32) -> Self {
        Self {
            current,
            velocity: 0.0,
        }
    }

    /// Advance one step toward `target`; returns the new current value.
    pub fn approach(&mut self, target: f32, smooth_time: f32, dt: f32) -> f32 {
        let (value, velocity) = smooth_damp(self.current, target, self.velocity, smooth_time, dt);
        self.current = value;
        self.velocity = velocity;
        value
    }
}

/// A 3-vector smoothing channel: current value plus its auxiliary memory.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DampedVec3 {
    pub current: Vec3,
    velocity: Vec3,
}

impl Default for DampedVec3 {
    fn default() -> Self {
        Self::new(Vec3::zeros())
    }
}

impl DampedVec3 {
    #[inline]
    pub fn new(current: Vec3) -> Self {
        Self {
            current,
            velocity: Vec3::zeros(),
        }
    }

    /// Advance one step toward `target`; returns the new current value.
    pub fn approach(&mut self, target: Vec3, smooth_time: f32, dt: f32) -> Vec3 {
        let (value, velocity) =
            smooth_damp_vec3(self.current, target, self.velocity, smooth_time, dt);
        self.current = value;
        self.velocity = velocity;
        value
    }

    /// Overwrite the current value, keeping the auxiliary memory.
    #[inline]
    pub fn set(&mut self, value: Vec3) {
        self.current = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn converges_to_target_without_overshoot() {
        let mut channel = DampedF32::new(0.0);
        let target = 5.0;
        let mut previous = channel.current;

        for _ in 0..600 {
            let value = channel.approach(target, 0.25, 1.0 / 60.0);
            // Monotone approach from below, never past the target.
            assert!(value >= previous);
            assert!(value <= target);
            previous = value;
        }
        assert_relative_eq!(channel.current, target, epsilon = 1.0e-3);
    }

    #[test]
    fn zero_dt_returns_current() {
        let (value, velocity) = smooth_damp(1.0, 9.0, 0.5, 0.2, 0.0);
        assert_eq!(value, 1.0);
        assert_eq!(velocity, 0.5);
    }

    #[test]
    fn near_zero_smooth_time_snaps_to_target() {
        let (value, velocity) = smooth_damp(1.0, 9.0, 12.0, 0.0, 1.0 / 60.0);
        assert_eq!(value, 9.0);
        assert_eq!(velocity, 0.0);

        let (vec, aux) = smooth_damp_vec3(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(9.0, 9.0, 9.0),
            0.0,
            1.0 / 60.0,
        );
        assert_eq!(vec, Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(aux, Vec3::zeros());
    }

    #[test]
    fn vector_channel_converges_componentwise() {
        let mut channel = DampedVec3::new(Vec3::new(-2.0, 0.0, 7.0));
        let target = Vec3::new(1.0, 3.0, -1.0);

        for _ in 0..600 {
            channel.approach(target, 0.2, 1.0 / 60.0);
        }
        assert_relative_eq!(channel.current.x, target.x, epsilon = 1.0e-3);
        assert_relative_eq!(channel.current.y, target.y, epsilon = 1.0e-3);
        assert_relative_eq!(channel.current.z, target.z, epsilon = 1.0e-3);
    }

    #[test]
    fn channels_keep_independent_auxiliaries() {
        let mut a = DampedF32::new(0.0);
        let mut b = DampedF32::new(0.0);

        a.approach(10.0, 0.3, 1.0 / 60.0);
        // b was never stepped; its auxiliary must still be at rest.
        let first_b = b.approach(10.0, 0.3, 1.0 / 60.0);
        let (expected, _) = smooth_damp(0.0, 10.0, 0.0, 0.3, 1.0 / 60.0);
        assert_eq!(first_b, expected);
    }

    #[test]
    fn repeated_identical_inputs_are_deterministic() {
        let run = || {
            let mut channel = DampedVec3::new(Vec3::zeros());
            for i in 0..120 {
                let target = Vec3::new(1.0 + (i % 3) as f32, -2.0, 0.5);
                channel.approach(target, 0.15, 1.0 / 60.0);
            }
            channel.current
        };
        assert_eq!(run(), run());
    }
}
