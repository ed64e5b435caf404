//! Collision detection
//!
//! Axis-aligned boxes with a forgiving hitbox: two boxes only collide when
//! they overlap by more than a tolerance on both axes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box, stored as center and full size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.size / 2.0
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.size / 2.0
    }

    /// Overlap length on each axis (negative when separated)
    pub fn overlap(&self, other: &Aabb) -> Vec2 {
        self.max().min(other.max()) - self.min().max(other.min())
    }

    /// Tolerant overlap test, symmetric in its arguments
    pub fn collides_with(&self, other: &Aabb, tolerance: f32) -> bool {
        let overlap = self.overlap(other);
        overlap.x > tolerance && overlap.y > tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square(x: f32, y: f32, size: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::splat(size))
    }

    #[test]
    fn test_overlap() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(6.0, 8.0, 10.0);
        let overlap = a.overlap(&b);
        assert!((overlap.x - 4.0).abs() < 1e-5);
        assert!((overlap.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_tolerance_is_forgiving() {
        let bird = square(100.0, 100.0, 48.0);
        // Overlaps by 15 on x: within tolerance
        let grazing = Aabb::new(
            Vec2::new(100.0 + 24.0 + 40.0 - 15.0, 100.0),
            Vec2::new(80.0, 200.0),
        );
        assert!(!bird.collides_with(&grazing, 20.0));
        assert!(bird.collides_with(&grazing, 0.0));

        // Overlaps by 25 on x and fully on y
        let hit = Aabb::new(Vec2::new(100.0 + 24.0 + 40.0 - 25.0, 100.0), Vec2::new(80.0, 200.0));
        assert!(bird.collides_with(&hit, 20.0));
    }

    #[test]
    fn test_exact_tolerance_does_not_collide() {
        let a = square(0.0, 0.0, 40.0);
        let b = square(20.0, 20.0, 40.0);
        // Overlap is exactly 20 on both axes
        assert!(!a.collides_with(&b, 20.0));
    }

    proptest! {
        #[test]
        fn collision_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 1.0f32..300.0, ah in 1.0f32..300.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 1.0f32..300.0, bh in 1.0f32..300.0,
            tolerance in 0.0f32..50.0,
        ) {
            let a = Aabb::new(Vec2::new(ax, ay), Vec2::new(aw, ah));
            let b = Aabb::new(Vec2::new(bx, by), Vec2::new(bw, bh));
            prop_assert_eq!(a.collides_with(&b, tolerance), b.collides_with(&a, tolerance));
        }

        #[test]
        fn separated_boxes_never_collide(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            size in 1.0f32..200.0,
            gap in 1.0f32..200.0,
            tolerance in 0.0f32..50.0,
            horizontal in any::<bool>(),
        ) {
            let a = square(ax, ay, size);
            let offset = size + gap;
            let b = if horizontal {
                square(ax + offset, ay, size)
            } else {
                square(ax, ay + offset, size)
            };
            prop_assert!(!a.collides_with(&b, tolerance));
        }

        #[test]
        fn deep_overlap_always_collides(
            x in -500.0f32..500.0, y in -500.0f32..500.0,
            size in 100.0f32..300.0,
            dx in -20.0f32..20.0, dy in -20.0f32..20.0,
            tolerance in 0.0f32..40.0,
        ) {
            // Shifting by at most 20 leaves at least size - 20 >= 80 overlap per axis
            let a = square(x, y, size);
            let b = square(x + dx, y + dy, size);
            prop_assert!(a.collides_with(&b, tolerance));
        }
    }
}
