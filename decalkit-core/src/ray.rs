//! Rays for hit testing

use crate::{Error, Point3f, Result, Vector3f};
use nalgebra::Unit;

/// A half-line with an origin and a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3f,
    pub direction: Unit<Vector3f>,
}

impl Ray {
    /// Create a ray, normalizing the direction
    pub fn new(origin: Point3f, direction: Vector3f) -> Result<Self> {
        if !origin.coords.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidParameter("Ray origin must be finite".to_string()));
        }
        Unit::try_new(direction, f32::EPSILON)
            .map(|direction| Self { origin, direction })
            .ok_or_else(|| Error::InvalidParameter("Ray direction must be non-zero".to_string()))
    }

    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f32) -> Point3f {
        self.origin + self.direction.into_inner() * t
    }

    /// Distance along the ray to the closest approach of a sphere, or None if
    /// the ray misses it entirely. A ray starting inside the sphere hits at 0.
    pub fn intersect_sphere(&self, center: &Point3f, radius: f32) -> Option<f32> {
        let to_center = center - self.origin;
        let tca = to_center.dot(self.direction.as_ref());
        let d2 = to_center.norm_squared() - tca * tca;
        let r2 = radius * radius;
        if d2 > r2 {
            return None;
        }
        let thc = (r2 - d2).sqrt();
        let t0 = tca - thc;
        let t1 = tca + thc;
        if t1 < 0.0 {
            return None;
        }
        Some(t0.max(0.0))
    }
}
