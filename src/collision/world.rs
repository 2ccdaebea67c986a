/*!
The world-collision oracle the simulation runs against.

The character code only needs three synchronous, side-effect-free calls:
two overlap probes (ground sensing, stance feasibility) and one
collision-aware move. [`StaticWorld`] implements them over an immutable set
of static shapes with the broad/narrow phase and the sweep-and-slide mover.
*/

use nalgebra as na;
use parry3d::{bounding_volume::BoundingVolume, shape as pshape, shape::Shape};

use super::{
    broad::WorldAccel,
    kinematic, narrow_phase,
    settings::BROAD_PHASE_MARGIN,
    types::{CapsuleSpec, Iso, LayerMask, Vec3, WorldStatic},
};

/// Collaborator contract for world geometry queries.
///
/// All queries are synchronous and leave the world untouched; `move_capsule`
/// returns the displacement that was actually applied after clipping
/// against geometry.
pub trait CollisionWorld {
    /// True iff a sphere at `center` overlaps any static on `mask`.
    fn sphere_overlap(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool;

    /// True iff the capsule spanning the segment `p0..p1` (sphere-cap
    /// centers) overlaps any static on `mask`.
    fn capsule_overlap(&self, p0: Vec3, p1: Vec3, radius: f32, mask: LayerMask) -> bool;

    /// Sweep `capsule` (centered at `center`) by `desired`, sliding along
    /// contacts, and return the applied displacement.
    fn move_capsule(&self, capsule: CapsuleSpec, center: Vec3, desired: Vec3, mask: LayerMask)
    -> Vec3;
}

/// An immutable collection of static shapes with a prebuilt broad phase.
pub struct StaticWorld {
    statics: Vec<WorldStatic>,
    accel: WorldAccel,
}

impl StaticWorld {
    pub fn new(statics: Vec<WorldStatic>) -> Self {
        let accel = WorldAccel::build(&statics);
        Self { statics, accel }
    }

    /// An empty world; every probe misses and moves apply in full.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn statics(&self) -> &[WorldStatic] {
        &self.statics
    }

    /// Overlap test shared by the sphere and capsule probes: planes always,
    /// finite shapes through the broad phase.
    fn any_overlap(&self, probe: &dyn Shape, probe_iso: &Iso, mask: LayerMask) -> bool {
        let volume = probe.compute_aabb(probe_iso).loosened(BROAD_PHASE_MARGIN);

        let hits = |idx: usize| {
            let stat = &self.statics[idx];
            stat.layers.intersects(mask) && narrow_phase::probe_overlaps(probe, probe_iso, stat)
        };

        self.accel.plane_indices.iter().any(|&idx| hits(idx))
            || self.accel.candidates(&volume).into_iter().any(hits)
    }
}

impl CollisionWorld for StaticWorld {
    fn sphere_overlap(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool {
        let ball = pshape::Ball::new(radius);
        let iso = Iso::from_parts(
            na::Translation3::from(center),
            na::UnitQuaternion::identity(),
        );
        self.any_overlap(&ball, &iso, mask)
    }

    fn capsule_overlap(&self, p0: Vec3, p1: Vec3, radius: f32, mask: LayerMask) -> bool {
        let capsule = pshape::Capsule::new(na::Point3::from(p0), na::Point3::from(p1), radius);
        self.any_overlap(&capsule, &Iso::identity(), mask)
    }

    fn move_capsule(
        &self,
        capsule: CapsuleSpec,
        center: Vec3,
        desired: Vec3,
        mask: LayerMask,
    ) -> Vec3 {
        let result = kinematic::sweep_move(&self.statics, &self.accel, capsule, center, desired, mask);
        result.end_pos - center
    }
}
