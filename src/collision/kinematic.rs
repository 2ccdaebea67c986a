/*!
Sweep-and-slide capsule movement against a set of static shapes.

Algorithm:
- Shape-cast the capsule (TOI) along the desired translation.
- On hit, advance to just before the contact (minus the skin width) and
  slide the leftover motion along the contact plane.
- Iterate to handle corners until the iteration cap or the remaining motion
  is negligible.
*/

use nalgebra as na;
use parry3d::shape as pshape;

use super::{
    broad::{self, WorldAccel},
    narrow_phase,
    settings::{MAX_SLIDE_ITERATIONS, MIN_MOVE_SQ, SKIN},
    types::{CapsuleSpec, Iso, LayerMask, MoveHit, MoveResult, Vec3, WorldStatic},
};

/// Earliest hit of a capsule cast against the masked statics: planes always,
/// finite shapes through the broad-phase candidate list.
fn earliest_hit(
    statics: &[WorldStatic],
    accel: &WorldAccel,
    capsule_iso: Iso,
    capsule: &pshape::Capsule,
    vel: Vec3,
    swept: &parry3d::bounding_volume::Aabb,
    mask: LayerMask,
) -> Option<MoveHit> {
    let mut best: Option<MoveHit> = None;
    let mut consider = |idx: usize| {
        let stat = &statics[idx];
        if !stat.layers.intersects(mask) {
            return;
        }
        if let Some(hit) = narrow_phase::cast_capsule(capsule_iso, capsule, vel, 1.0, stat) {
            if best.as_ref().is_none_or(|b| hit.fraction < b.fraction) {
                best = Some(hit);
            }
        }
    };

    for &idx in &accel.plane_indices {
        consider(idx);
    }
    for idx in accel.candidates(swept) {
        consider(idx);
    }
    best
}

/// Kinematic sweep-and-slide for a Y-aligned capsule centered at `start`.
///
/// Returns the final center position, the last contact (if any), and any
/// translation that could not be consumed.
pub fn sweep_move(
    statics: &[WorldStatic],
    accel: &WorldAccel,
    capsule: CapsuleSpec,
    start: Vec3,
    desired: Vec3,
    mask: LayerMask,
) -> MoveResult {
    let mut pos = start;
    let mut remaining = desired;
    let mut last_hit = None;

    let capsule_shape = pshape::Capsule::new_y(capsule.half_height, capsule.radius);

    for _ in 0..MAX_SLIDE_ITERATIONS {
        if remaining.norm_squared() <= MIN_MOVE_SQ {
            break;
        }

        let len = remaining.norm();
        let dir = remaining / len;

        let capsule_iso = Iso::from_parts(
            na::Translation3::from(pos),
            na::UnitQuaternion::identity(),
        );
        let swept =
            broad::swept_capsule_aabb(capsule.half_height, capsule.radius, pos, remaining, SKIN);

        match earliest_hit(
            statics,
            accel,
            capsule_iso,
            &capsule_shape,
            remaining,
            &swept,
            mask,
        ) {
            None => {
                // Free path: consume the whole translation.
                pos += remaining;
                remaining = Vec3::zeros();
                last_hit = None;
                break;
            }
            Some(hit) => {
                // Travel up to the contact point (minus skin).
                let travel = (len * hit.fraction).max(0.0);
                pos += dir * (travel - SKIN).max(0.0);

                // Slide: remove the normal component from the leftover.
                let n_len_sq = hit.normal.norm_squared();
                let n = if n_len_sq > 1.0e-12 {
                    hit.normal / n_len_sq.sqrt()
                } else {
                    Vec3::zeros()
                };
                let leftover = dir * (len - travel);
                let slide = leftover - n * leftover.dot(&n);

                remaining = slide;
                last_hit = Some(hit);

                if slide.norm_squared() <= MIN_MOVE_SQ {
                    break;
                }
            }
        }
    }

    MoveResult {
        end_pos: pos,
        last_hit,
        remaining,
    }
}
