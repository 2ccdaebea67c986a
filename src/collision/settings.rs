/*!
Tolerances for the collision backend.

These constants centralize the parameters used by the sweep-and-slide mover
and the overlap probes. Keeping them together makes tuning easier and helps
ensure deterministic behavior across platforms.

Notes
- Distances are in meters.
- Favor practical world-space tolerances over machine epsilon for robust
  behavior on contact.
*/

/// Separation from surfaces kept when stopping at a contact (meters).
/// Too large creates visible gaps; too small risks jitter on contact.
pub const SKIN: f32 = 0.02;

/// Maximum number of slide iterations per kinematic step.
/// Higher values help with tight corners at the cost of more queries.
pub const MAX_SLIDE_ITERATIONS: u32 = 4;

/// Minimum squared movement threshold to consider a step meaningful (m^2).
/// Movements below this are treated as zero to avoid tiny oscillations.
pub const MIN_MOVE_SQ: f32 = 1.0e-8;

/// Practical small distance for comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-6;

/// Margin added around broad-phase query volumes so near misses are kept as
/// candidates for the narrow phase (meters).
pub const BROAD_PHASE_MARGIN: f32 = 0.05;
