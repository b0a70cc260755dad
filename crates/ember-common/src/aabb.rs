//! Axis-aligned bounding boxes for particle bounds maintenance.

use glam::{Affine3A, Vec3};

/// An axis-aligned box that can also represent the empty ("null") volume.
///
/// A null box merges as the identity: merging anything into it yields that
/// thing. This is the state a particle system's bounds start from each
/// rebuild pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
    null: bool,
}

impl Aabb {
    /// The empty box.
    pub const NULL: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
        null: true,
    };

    /// Creates a finite box from its corners.
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            null: false,
        }
    }

    /// Whether this is the empty box.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.null
    }

    /// Minimum corner. Meaningless on a null box.
    #[must_use]
    pub const fn min(&self) -> Vec3 {
        self.min
    }

    /// Maximum corner. Meaningless on a null box.
    #[must_use]
    pub const fn max(&self) -> Vec3 {
        self.max
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half the diagonal extent.
    #[must_use]
    pub fn half_size(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Grows the box to contain a point.
    pub fn merge_point(&mut self, p: Vec3) {
        if self.null {
            self.min = p;
            self.max = p;
            self.null = false;
        } else {
            self.min = self.min.min(p);
            self.max = self.max.max(p);
        }
    }

    /// Grows the box to contain another box.
    pub fn merge(&mut self, other: &Aabb) {
        if other.null {
            return;
        }
        self.merge_point(other.min);
        self.merge_point(other.max);
    }

    /// Expands every face outward by `amount` per axis.
    pub fn pad(&mut self, amount: Vec3) {
        if !self.null {
            self.min -= amount;
            self.max += amount;
        }
    }

    /// Returns the smallest axis-aligned box containing this box after an
    /// affine transform (all eight transformed corners merged).
    #[must_use]
    pub fn transformed(&self, transform: &Affine3A) -> Self {
        if self.null {
            return Self::NULL;
        }
        let mut out = Self::NULL;
        for ix in 0..8 {
            let corner = Vec3::new(
                if ix & 1 == 0 { self.min.x } else { self.max.x },
                if ix & 2 == 0 { self.min.y } else { self.max.y },
                if ix & 4 == 0 { self.min.z } else { self.max.z },
            );
            out.merge_point(transform.transform_point3(corner));
        }
        out
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_merge_is_identity() {
        let mut b = Aabb::NULL;
        b.merge_point(Vec3::new(1.0, 2.0, 3.0));
        assert!(!b.is_null());
        assert_eq!(b.min(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.max(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_merge_extends_both_corners() {
        let mut b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        b.merge_point(Vec3::new(-1.0, 2.0, 0.5));
        assert_eq!(b.min(), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.max(), Vec3::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn test_transformed_translation() {
        let b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let t = Affine3A::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let moved = b.transformed(&t);
        assert_eq!(moved.min(), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(moved.max(), Vec3::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn test_pad() {
        let mut b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        b.pad(Vec3::splat(0.5));
        assert_eq!(b.min(), Vec3::splat(-0.5));
        assert_eq!(b.max(), Vec3::splat(1.5));
    }
}
