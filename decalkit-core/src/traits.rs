//! Core traits for decalkit

use crate::{decal_mesh::DecalMesh, mesh::TriangleMesh, point::*, ray::Ray, Result};

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the axis-aligned bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        nalgebra::center(&min, &max)
    }
}

/// Turns a point in normalized device coordinates into a world-space ray.
///
/// This is the only thing the picking pipeline needs from a camera.
pub trait RayProjector {
    fn ray_from_ndc(&self, ndc: &Vector2f) -> Result<Ray>;
}

fn bounds_of<'a>(points: impl Iterator<Item = &'a Point3f>) -> (Point3f, Point3f) {
    let mut points = points.peekable();
    let Some(first) = points.peek().copied().copied() else {
        return (Point3f::origin(), Point3f::origin());
    };

    let mut min = first;
    let mut max = first;
    for p in points {
        min = min.inf(p);
        max = max.sup(p);
    }
    (min, max)
}

impl Drawable for TriangleMesh {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        bounds_of(self.vertices.iter())
    }
}

impl Drawable for DecalMesh {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        bounds_of(self.vertices().map(|v| &v.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mesh_bounding_box() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(-1.0, 0.0, 2.0),
                Point3f::new(3.0, -2.0, 0.0),
                Point3f::new(0.0, 5.0, 1.0),
            ],
            vec![[0, 1, 2]],
        );
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, Point3f::new(-1.0, -2.0, 0.0));
        assert_eq!(max, Point3f::new(3.0, 5.0, 2.0));
        assert_relative_eq!(mesh.center(), Point3f::new(1.0, 1.5, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_empty_decal_mesh_bounds_at_origin() {
        let (min, max) = DecalMesh::new().bounding_box();
        assert_eq!(min, Point3f::origin());
        assert_eq!(max, Point3f::origin());
    }
}
