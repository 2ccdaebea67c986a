/*!
Broad-phase acceleration over immutable world statics.

Finite shapes (cuboid, sphere, capsule) are stored as world-space AABBs in a
BVH and pruned per query. Planes are infinite, so they bypass the BVH and
are kept as a separate index list that every query scans.
*/

use nalgebra as na;
use parry3d::{
    bounding_volume::{Aabb, BoundingVolume},
    partitioning::{Bvh, BvhBuildStrategy},
    shape as pshape,
    shape::Shape,
};

use super::{narrow_phase, types::WorldStatic};

/// Acceleration structure for broad-phase queries over immutable statics.
///
/// `finite_indices` maps BVH leaves back to indices in the original statics
/// slice; `plane_indices` lists the planes in that slice.
pub struct WorldAccel {
    bvh: Bvh,
    finite_indices: Vec<usize>,
    pub plane_indices: Vec<usize>,
}

impl WorldAccel {
    /// Build the accelerator over a slice of world statics.
    pub fn build(statics: &[WorldStatic]) -> Self {
        let mut aabbs: Vec<Aabb> = Vec::new();
        let mut finite_indices: Vec<usize> = Vec::new();
        let mut plane_indices: Vec<usize> = Vec::new();

        for (i, stat) in statics.iter().enumerate() {
            match narrow_phase::world_aabb(stat) {
                Some(aabb) => {
                    aabbs.push(aabb);
                    finite_indices.push(i);
                }
                None => plane_indices.push(i),
            }
        }

        Self {
            bvh: Bvh::from_leaves(BvhBuildStrategy::Binned, &aabbs),
            finite_indices,
            plane_indices,
        }
    }

    /// Indices (into the original statics slice) of finite shapes whose
    /// AABB intersects `volume`.
    pub fn candidates(&self, volume: &Aabb) -> Vec<usize> {
        self.bvh
            .intersect_aabb(volume)
            .map(|leaf_idx| self.finite_indices[leaf_idx as usize])
            .collect()
    }
}

/// Swept AABB for a Y-aligned capsule moving from `start` to
/// `start + desired`, inflated by `margin` to keep near misses.
pub fn swept_capsule_aabb(
    half_height: f32,
    radius: f32,
    start: na::Vector3<f32>,
    desired: na::Vector3<f32>,
    margin: f32,
) -> Aabb {
    let capsule = pshape::Capsule::new_y(half_height, radius);

    let iso_start = na::Isometry3::from_parts(
        na::Translation3::from(start),
        na::UnitQuaternion::identity(),
    );
    let iso_end = na::Isometry3::from_parts(
        na::Translation3::from(start + desired),
        na::UnitQuaternion::identity(),
    );

    let swept = capsule
        .compute_aabb(&iso_start)
        .merged(&capsule.compute_aabb(&iso_end));

    if margin > 0.0 {
        swept.loosened(margin)
    } else {
        swept
    }
}
