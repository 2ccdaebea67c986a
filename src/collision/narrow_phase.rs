/*!
Thin wrappers over parry3d narrow-phase queries.

Every static entry is resolved once into a concrete parry shape plus a
world-space pose; casts and overlap tests then go through the type-erased
`&dyn Shape` interface so the per-variant logic is written a single time.
*/

use nalgebra as na;
use parry3d::{
    bounding_volume::Aabb,
    query::{self, ShapeCastOptions},
    shape as pshape,
    shape::Shape,
};

use super::types::{Iso, MoveHit, StaticShape, Vec3, WorldStatic};

/// A static entry's geometry instantiated as a parry shape.
pub(super) enum ResolvedShape {
    Plane(pshape::HalfSpace),
    Cuboid(pshape::Cuboid),
    Ball(pshape::Ball),
    Capsule(pshape::Capsule),
}

impl ResolvedShape {
    #[inline]
    pub(super) fn as_shape(&self) -> &dyn Shape {
        match self {
            ResolvedShape::Plane(s) => s,
            ResolvedShape::Cuboid(s) => s,
            ResolvedShape::Ball(s) => s,
            ResolvedShape::Capsule(s) => s,
        }
    }
}

/// Instantiate the parry shape and world pose for a static entry.
///
/// Planes are positioned at `normal * dist` with the half-space oriented
/// along the world normal; every other shape uses the entry's transform.
pub(super) fn resolve(stat: &WorldStatic) -> (ResolvedShape, Iso) {
    match stat.shape {
        StaticShape::Plane { normal, dist } => {
            let unit = na::Unit::new_normalize(normal);
            let iso = Iso::from_parts(
                na::Translation3::from(normal * dist),
                na::UnitQuaternion::identity(),
            );
            (ResolvedShape::Plane(pshape::HalfSpace::new(unit)), iso)
        }
        StaticShape::Cuboid { half_extents } => (
            ResolvedShape::Cuboid(pshape::Cuboid::new(half_extents)),
            stat.transform.iso(),
        ),
        StaticShape::Sphere { radius } => (
            ResolvedShape::Ball(pshape::Ball::new(radius)),
            stat.transform.iso(),
        ),
        StaticShape::Capsule {
            radius,
            half_height,
        } => (
            ResolvedShape::Capsule(pshape::Capsule::new_y(half_height, radius)),
            stat.transform.iso(),
        ),
    }
}

/// World-space AABB of a static entry, or `None` for infinite shapes.
pub(super) fn world_aabb(stat: &WorldStatic) -> Option<Aabb> {
    if matches!(stat.shape, StaticShape::Plane { .. }) {
        return None;
    }
    let (shape, iso) = resolve(stat);
    Some(shape.as_shape().compute_aabb(&iso))
}

/// Cast a moving Y-aligned capsule against a single static entry and return
/// the earliest hit (if any).
///
/// - `capsule_iso`: the capsule's starting isometry in world space.
/// - `vel`: the world-space translation vector for this cast (meters).
/// - `max_toi`: the maximum fraction of `vel` to consider (typically 1.0).
///
/// The returned normal is taken on the moving capsule and flipped where
/// needed so it always opposes the motion.
pub fn cast_capsule(
    capsule_iso: Iso,
    capsule: &pshape::Capsule,
    vel: Vec3,
    max_toi: f32,
    stat: &WorldStatic,
) -> Option<MoveHit> {
    let (shape, iso) = resolve(stat);

    let mut opts = ShapeCastOptions::with_max_time_of_impact(max_toi);
    opts.stop_at_penetration = true;

    let hit = query::cast_shapes(
        &capsule_iso,
        &vel,
        capsule as &dyn Shape,
        &iso,
        &na::Vector3::zeros(),
        shape.as_shape(),
        opts,
    )
    .ok()
    .flatten()?;

    let mut normal = hit.normal1.into_inner();
    if normal.dot(&vel) > 0.0 {
        normal = -normal;
    }
    Some(MoveHit {
        normal,
        fraction: hit.time_of_impact,
    })
}

/// Static intersection test between an arbitrary probe shape and a static
/// entry. Unsupported shape pairs count as no contact.
pub fn probe_overlaps(probe: &dyn Shape, probe_iso: &Iso, stat: &WorldStatic) -> bool {
    let (shape, iso) = resolve(stat);
    query::intersection_test(probe_iso, probe, &iso, shape.as_shape()).unwrap_or(false)
}
