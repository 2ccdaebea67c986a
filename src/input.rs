/*!
Per-frame input and clock samples.

The input collaborator delivers one [`InputSample`] per frame before the
simulation step runs: two analog axes plus the discrete one-shot events
that fired since the previous frame. The clock collaborator supplies a
[`FrameTime`]; `dt` is always passed explicitly so a recorded input stream
replays deterministically.
*/

use serde::{Deserialize, Serialize};

use crate::collision::Vec2;

/// Raw input for a single frame. Immutable for the duration of the frame.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct InputSample {
    /// Movement axes: `x` strafe (right positive), `y` forward.
    pub move_axis: Vec2,
    /// View deltas: `x` yaw, `y` pitch.
    pub view: Vec2,
    /// One-shot: jump action fired this frame.
    pub jump_pressed: bool,
    /// One-shot: crouch action fired this frame.
    pub crouch_pressed: bool,
    /// One-shot: prone action fired this frame.
    pub prone_pressed: bool,
    /// One-shot: sprint toggle fired this frame.
    pub sprint_toggled: bool,
    /// One-shot: the sprint binding was released this frame.
    pub sprint_released: bool,
}

impl InputSample {
    /// Sample with only the analog axes set.
    pub fn axes(move_axis: Vec2, view: Vec2) -> Self {
        Self {
            move_axis,
            view,
            ..Self::default()
        }
    }
}

/// Monotonic per-frame clock sample.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FrameTime {
    /// Elapsed seconds since the previous frame.
    pub delta: f32,
    /// Smoothed delta, used where raw frame jitter would be visible.
    pub smoothed_delta: f32,
}

impl FrameTime {
    pub fn new(delta: f32, smoothed_delta: f32) -> Self {
        Self {
            delta,
            smoothed_delta,
        }
    }

    /// A fixed step where the smoothed delta equals the raw delta.
    pub fn fixed(delta: f32) -> Self {
        Self::new(delta, delta)
    }
}
