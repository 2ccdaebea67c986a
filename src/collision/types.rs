/*!
Core collision types and math aliases shared by the collision submodules.

This module intentionally contains no algorithms. It defines the data
exchanged between the broad phase (candidate pruning), the narrow phase
(parry3d casts and intersection tests), the sweep-and-slide mover, and the
character-level probes built on top of them.
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// Bit set of collision layers a static shape belongs to.
///
/// Queries carry a mask of their own; a shape participates in a query iff
/// the two masks share at least one bit. The layer space is small and fixed
/// (ground, obstructions, ...), so a plain `u32` is enough.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Mask with the single bit `index` set.
    #[inline]
    pub const fn layer(index: u8) -> LayerMask {
        LayerMask(1 << index)
    }

    #[inline]
    pub const fn union(self, other: LayerMask) -> LayerMask {
        LayerMask(self.0 | other.0)
    }

    /// True when the two masks share at least one layer bit.
    #[inline]
    pub const fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

/// A rigid transform (isometry) in world space.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::identity(),
        }
    }

    /// Convert to an nalgebra `Isometry3` for use with parry3d queries.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(na::Translation3::from(self.translation), self.rotation)
    }
}

/// Geometry of a static world shape, in local space.
///
/// The pose lives on [`WorldStatic`]; the one exception is `Plane`, which is
/// expressed directly in world space (normal ⋅ x = dist) and ignores the
/// carried transform.
#[derive(Clone, Copy, Debug)]
pub enum StaticShape {
    Plane {
        /// World-space unit normal of the plane.
        normal: Vec3,
        /// Plane offset along the normal, i.e., normal ⋅ x = dist.
        dist: f32,
    },
    Cuboid {
        /// Local-space half-extents (hx, hy, hz).
        half_extents: Vec3,
    },
    Sphere {
        /// Radius in meters.
        radius: f32,
    },
    Capsule {
        /// Radius of the spherical caps and cylinder.
        radius: f32,
        /// Half of the cylinder length along the local +Y axis.
        half_height: f32,
    },
}

/// A static world shape with its pose and the collision layers it occupies.
#[derive(Clone, Copy, Debug)]
pub struct WorldStatic {
    pub shape: StaticShape,
    pub transform: Transform,
    pub layers: LayerMask,
}

impl WorldStatic {
    /// World-space plane satisfying `normal ⋅ x = dist`.
    #[inline]
    pub fn plane(normal: Vec3, dist: f32, layers: LayerMask) -> Self {
        Self {
            shape: StaticShape::Plane { normal, dist },
            transform: Transform::from_translation(Vec3::zeros()),
            layers,
        }
    }

    #[inline]
    pub fn cuboid(half_extents: Vec3, translation: Vec3, rotation: Quat, layers: LayerMask) -> Self {
        Self {
            shape: StaticShape::Cuboid { half_extents },
            transform: Transform::new(translation, rotation),
            layers,
        }
    }

    #[inline]
    pub fn sphere(radius: f32, translation: Vec3, layers: LayerMask) -> Self {
        Self {
            shape: StaticShape::Sphere { radius },
            transform: Transform::from_translation(translation),
            layers,
        }
    }

    #[inline]
    pub fn capsule(
        radius: f32,
        half_height: f32,
        translation: Vec3,
        rotation: Quat,
        layers: LayerMask,
    ) -> Self {
        Self {
            shape: StaticShape::Capsule {
                radius,
                half_height,
            },
            transform: Transform::new(translation, rotation),
            layers,
        }
    }
}

/// Capsule specification for the character's collider.
///
/// `half_height` is the half-length of the cylinder section (aligned with
/// +Y), so the total capsule height is `2*half_height + 2*radius`.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct CapsuleSpec {
    pub radius: f32,
    pub half_height: f32,
}

impl CapsuleSpec {
    /// Build the spec from a total collider height, clamping the cylinder
    /// section to non-negative when the height is smaller than two caps.
    #[inline]
    pub fn from_height(height: f32, radius: f32) -> Self {
        Self {
            radius,
            half_height: (height * 0.5 - radius).max(0.0),
        }
    }
}

/// A single contact returned by a time-of-impact query during
/// sweep-and-slide movement.
#[derive(Clone, Copy, Debug)]
pub struct MoveHit {
    /// World-space contact normal on the moving shape, opposing the motion.
    pub normal: Vec3,
    /// Fraction (0..1) of the tested translation where the hit occurred.
    pub fraction: f32,
}

/// Result of a kinematic movement step (after sweep-and-slide).
#[derive(Clone, Copy, Debug)]
pub struct MoveResult {
    /// Final capsule center position after applying the step and sliding.
    pub end_pos: Vec3,
    /// Last hit encountered during the step, if any.
    pub last_hit: Option<MoveHit>,
    /// Translation that could not be consumed (usually zero).
    pub remaining: Vec3,
}
