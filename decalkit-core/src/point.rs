//! Point and vector types

use nalgebra::{Point3, Vector2, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A 2D vector, used for texture coordinates and normalized device coordinates
pub type Vector2f = Vector2<f32>;

/// Returns true when every component of the vector is finite
pub fn is_finite_vector(v: &Vector3f) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Returns true when every coordinate of the point is finite
pub fn is_finite_point(p: &Point3f) -> bool {
    is_finite_vector(&p.coords)
}

/// Area of the triangle spanned by three points
pub fn triangle_area(a: &Point3f, b: &Point3f, c: &Point3f) -> f32 {
    (b - a).cross(&(c - a)).norm() * 0.5
}
