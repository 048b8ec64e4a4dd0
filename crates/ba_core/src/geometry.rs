//! World coordinates and horizontal-plane distance
//!
//! Hydatos world space is Y-up. Every proximity rule in the crate works on
//! the X/Z plane only; the vertical axis is carried along for the renderer.

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Position in world space (X, Y = up, Z)
pub type WorldPos = Vector3<f32>;

/// Tolerance used when matching an observed position to a catalog position.
pub const LOCATION_EPSILON: f32 = 0.1;

/// Project onto the horizontal plane (X, Z).
#[inline]
pub fn to_plane(pos: &WorldPos) -> Vector2<f32> {
    Vector2::new(pos.x, pos.z)
}

/// Horizontal distance between two world positions, ignoring height.
#[inline]
pub fn distance_2d(a: &WorldPos, b: &WorldPos) -> f32 {
    (to_plane(a) - to_plane(b)).norm()
}

/// True when every component is finite.
#[inline]
pub fn is_finite(pos: &WorldPos) -> bool {
    pos.iter().all(|c| c.is_finite())
}

/// Axis-aligned footprint on the X/Z plane
///
/// Bounds are inclusive on both ends, matching how areas were surveyed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub origin: WorldPos,
    pub dims: WorldPos,
}

impl Footprint {
    pub fn new(origin: WorldPos, dims: WorldPos) -> Self {
        Self { origin, dims }
    }

    pub fn min_x(&self) -> f32 {
        self.origin.x.min(self.origin.x + self.dims.x)
    }

    pub fn max_x(&self) -> f32 {
        self.origin.x.max(self.origin.x + self.dims.x)
    }

    pub fn min_z(&self) -> f32 {
        self.origin.z.min(self.origin.z + self.dims.z)
    }

    pub fn max_z(&self) -> f32 {
        self.origin.z.max(self.origin.z + self.dims.z)
    }

    pub fn contains(&self, pos: &WorldPos) -> bool {
        (self.min_x()..=self.max_x()).contains(&pos.x)
            && (self.min_z()..=self.max_z()).contains(&pos.z)
    }

    /// Rectangles sharing any point (edges included) overlap.
    pub fn overlaps(&self, other: &Footprint) -> bool {
        self.min_x() <= other.max_x()
            && other.min_x() <= self.max_x()
            && self.min_z() <= other.max_z()
            && other.min_z() <= self.max_z()
    }
}
