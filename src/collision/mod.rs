/*!
Collision backend.

Implements the world-collision oracle the character simulation runs
against, using parry3d for narrow-phase queries and a BVH broad phase over
immutable world statics. The code is split for clarity:

- types:        shared data types (Transform, WorldStatic, CapsuleSpec, etc.)
- settings:     tolerance constants
- broad:        broad-phase accelerator (swept AABBs, candidate queries)
- narrow_phase: thin wrappers over parry3d queries (TOI, intersections)
- kinematic:    sweep-and-slide mover
- world:        the `CollisionWorld` oracle trait and its static-set impl
*/

pub mod broad;
pub mod kinematic;
pub mod narrow_phase;
pub mod settings;
pub mod types;
pub mod world;

pub use types::{
    CapsuleSpec, Iso, LayerMask, MoveHit, MoveResult, Quat, StaticShape, Transform, Vec2, Vec3,
    WorldStatic,
};
pub use world::{CollisionWorld, StaticWorld};

#[cfg(test)]
mod tests {
    use super::*;

    fn y_up_floor() -> WorldStatic {
        WorldStatic::plane(Vec3::y(), 0.0, LayerMask::layer(0))
    }

    #[test]
    fn sphere_overlap_hits_floor_only_within_radius() {
        let world = StaticWorld::new(vec![y_up_floor()]);

        assert!(world.sphere_overlap(Vec3::new(0.0, 0.2, 0.0), 0.3, LayerMask::ALL));
        assert!(!world.sphere_overlap(Vec3::new(0.0, 0.5, 0.0), 0.3, LayerMask::ALL));
    }

    #[test]
    fn layer_mask_filters_probes() {
        let world = StaticWorld::new(vec![y_up_floor()]);

        // Same geometry, disjoint mask: the probe must miss.
        assert!(!world.sphere_overlap(Vec3::new(0.0, 0.2, 0.0), 0.3, LayerMask::layer(1)));
    }

    #[test]
    fn capsule_overlap_detects_ceiling_box() {
        let ceiling = WorldStatic::cuboid(
            Vec3::new(2.0, 0.1, 2.0),
            Vec3::new(0.0, 1.2, 0.0),
            Quat::identity(),
            LayerMask::layer(1),
        );
        let world = StaticWorld::new(vec![y_up_floor(), ceiling]);

        // A standing-height capsule pokes into the box...
        assert!(world.capsule_overlap(
            Vec3::new(0.0, 0.3, 0.0),
            Vec3::new(0.0, 1.5, 0.0),
            0.3,
            LayerMask::layer(1),
        ));
        // ...a crouching-height one does not.
        assert!(!world.capsule_overlap(
            Vec3::new(0.0, 0.3, 0.0),
            Vec3::new(0.0, 0.7, 0.0),
            0.3,
            LayerMask::layer(1),
        ));
    }

    #[test]
    fn move_capsule_clips_against_wall() {
        let wall = WorldStatic::cuboid(
            Vec3::new(0.1, 2.0, 2.0),
            Vec3::new(1.0, 1.0, 0.0),
            Quat::identity(),
            LayerMask::layer(1),
        );
        let world = StaticWorld::new(vec![wall]);
        let capsule = CapsuleSpec::from_height(1.8, 0.3);

        let applied = world.move_capsule(
            capsule,
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            LayerMask::ALL,
        );

        // Stops at the wall face minus radius and skin, never tunnels.
        assert!(applied.x < 0.62, "applied.x = {}", applied.x);
        assert!(applied.x > 0.3, "applied.x = {}", applied.x);
    }

    #[test]
    fn move_capsule_slides_along_wall() {
        let wall = WorldStatic::cuboid(
            Vec3::new(0.1, 2.0, 4.0),
            Vec3::new(1.0, 1.0, 0.0),
            Quat::identity(),
            LayerMask::layer(1),
        );
        let world = StaticWorld::new(vec![wall]);
        let capsule = CapsuleSpec::from_height(1.8, 0.3);

        // Diagonal push into the wall keeps the tangential component.
        let applied = world.move_capsule(
            capsule,
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(2.0, 0.0, 2.0),
            LayerMask::ALL,
        );
        assert!(applied.z > 1.0, "applied.z = {}", applied.z);
        assert!(applied.x < 0.62, "applied.x = {}", applied.x);
    }

    #[test]
    fn empty_world_applies_moves_in_full() {
        let world = StaticWorld::empty();
        let capsule = CapsuleSpec::from_height(1.8, 0.3);

        let desired = Vec3::new(0.5, -0.2, 1.0);
        let applied = world.move_capsule(capsule, Vec3::new(0.0, 1.0, 0.0), desired, LayerMask::ALL);
        assert_eq!(applied, desired);
    }
}
