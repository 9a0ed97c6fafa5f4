//! Target surfaces for decal placement

use decalkit_core::{Drawable, Error, Point3f, Result, Transform3D, TriangleMesh, Vector3f};
use std::f32::consts::PI;

/// Which faces of a surface can be hit by a ray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    /// Only faces wound counter-clockwise towards the viewer
    #[default]
    Front,
    Back,
    Double,
}

/// A bounding sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Point3f,
    pub radius: f32,
}

impl BoundingSphere {
    /// Smallest sphere around the mesh's bounding box center that contains every vertex
    pub fn from_mesh(mesh: &TriangleMesh) -> Self {
        let center = mesh.center();
        let radius = mesh
            .vertices
            .iter()
            .map(|v| (v - center).norm())
            .fold(0.0, f32::max);
        Self { center, radius }
    }

    pub fn transformed(&self, transform: &Transform3D) -> Self {
        Self {
            center: transform.transform_point(&self.center),
            radius: self.radius * transform.max_scale(),
        }
    }

    pub fn intersects_sphere(&self, center: &Point3f, radius: f32) -> bool {
        (self.center - center).norm() <= self.radius + radius
    }
}

/// A surface triangle in world space
#[derive(Debug, Clone, Copy)]
pub struct WorldTriangle {
    pub face_index: usize,
    pub positions: [Point3f; 3],
    /// Per-corner world normals, unit length unless the source normals were degenerate
    pub normals: [Vector3f; 3],
}

/// The static mesh that decals are placed on, plus its world transform.
///
/// World-space vertex positions and normals are cached and refreshed by
/// [`Surface::set_world`].
#[derive(Debug, Clone)]
pub struct Surface {
    mesh: TriangleMesh,
    world: Transform3D,
    side: Side,
    local_bounds: BoundingSphere,
    world_bounds: BoundingSphere,
    world_vertices: Vec<Point3f>,
    world_normals: Vec<Vector3f>,
}

impl Surface {
    /// Wrap a mesh; faces must reference existing vertices and vertex
    /// normals, when present, must match the vertex count
    pub fn new(mesh: TriangleMesh) -> Result<Self> {
        if mesh.is_empty() {
            return Err(Error::InvalidData("Surface mesh has no faces".to_string()));
        }
        let vertex_count = mesh.vertex_count();
        if mesh.faces.iter().flatten().any(|&i| i >= vertex_count) {
            return Err(Error::InvalidData("Face index out of range".to_string()));
        }
        if let Some(normals) = &mesh.normals {
            if normals.len() != vertex_count {
                return Err(Error::InvalidData(format!(
                    "Mesh has {} vertex normals for {} vertices",
                    normals.len(),
                    vertex_count
                )));
            }
        }

        let local_bounds = BoundingSphere::from_mesh(&mesh);
        let mut surface = Self {
            mesh,
            world: Transform3D::identity(),
            side: Side::default(),
            local_bounds,
            world_bounds: local_bounds,
            world_vertices: Vec::new(),
            world_normals: Vec::new(),
        };
        surface.refresh_world_cache();
        Ok(surface)
    }

    /// A UV sphere centred on the origin.
    ///
    /// Vertices form a `(width_segments + 1) x (height_segments + 1)` grid with
    /// the seam column duplicated; the rows touching each pole emit one
    /// triangle per quad since the other would have zero area.
    pub fn sphere(radius: f32, width_segments: usize, height_segments: usize) -> Result<Self> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(Error::InvalidParameter("Sphere radius must be positive".to_string()));
        }
        if width_segments < 3 || height_segments < 2 {
            return Err(Error::InvalidParameter(
                "Sphere needs at least 3 width and 2 height segments".to_string(),
            ));
        }

        let row = width_segments + 1;
        let mut vertices = Vec::with_capacity(row * (height_segments + 1));
        let mut normals = Vec::with_capacity(vertices.capacity());

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let (phi, theta) = (u * 2.0 * PI, v * PI);
                let position = Point3f::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                );
                vertices.push(position);
                normals.push(position.coords.normalize());
            }
        }

        let mut faces = Vec::with_capacity(width_segments * height_segments * 2);
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                if iy != 0 {
                    faces.push([a, b, d]);
                }
                if iy != height_segments - 1 {
                    faces.push([b, c, d]);
                }
            }
        }

        let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);
        mesh.set_normals(normals);
        Self::new(mesh)
    }

    /// Builder-style side selection
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    pub fn world(&self) -> &Transform3D {
        &self.world
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Bounding sphere in world space
    pub fn bounds(&self) -> &BoundingSphere {
        &self.world_bounds
    }

    pub fn face_count(&self) -> usize {
        self.mesh.face_count()
    }

    /// Replace the world transform; singular transforms are rejected
    pub fn set_world(&mut self, world: Transform3D) -> Result<()> {
        if world.normal_matrix().is_none() {
            return Err(Error::InvalidParameter("Surface world transform is singular".to_string()));
        }
        self.world = world;
        self.refresh_world_cache();
        Ok(())
    }

    /// Face `face_index` in world space
    pub fn world_triangle(&self, face_index: usize) -> WorldTriangle {
        let face = self.mesh.faces[face_index];
        let normals = match self.mesh.normals {
            Some(_) => [
                self.world_normals[face[0]],
                self.world_normals[face[1]],
                self.world_normals[face[2]],
            ],
            None => {
                let n = self
                    .mesh
                    .face_normal(face_index)
                    .and_then(|n| self.world.transform_normal(&n))
                    .unwrap_or_else(Vector3f::zeros);
                [n, n, n]
            }
        };
        WorldTriangle {
            face_index,
            positions: [
                self.world_vertices[face[0]],
                self.world_vertices[face[1]],
                self.world_vertices[face[2]],
            ],
            normals,
        }
    }

    /// Every face in world space, in face order
    pub fn world_triangles(&self) -> impl Iterator<Item = WorldTriangle> + '_ {
        (0..self.mesh.face_count()).map(move |i| self.world_triangle(i))
    }

    fn refresh_world_cache(&mut self) {
        self.world_vertices = self
            .mesh
            .vertices
            .iter()
            .map(|v| self.world.transform_point(v))
            .collect();
        self.world_normals = match &self.mesh.normals {
            Some(normals) => normals
                .iter()
                .map(|n| self.world.transform_normal(n).unwrap_or_else(Vector3f::zeros))
                .collect(),
            None => Vec::new(),
        };
        self.world_bounds = self.local_bounds.transformed(&self.world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_layout() {
        let sphere = Surface::sphere(15.0, 64, 64).unwrap();
        assert_eq!(sphere.mesh().vertex_count(), 65 * 65);
        // Two triangles per quad, minus one per quad on each pole row
        assert_eq!(sphere.face_count(), 64 * 64 * 2 - 2 * 64);
        assert_relative_eq!(sphere.bounds().radius, 15.0, epsilon = 1e-3);
    }

    #[test]
    fn test_sphere_vertices_lie_on_radius() {
        let sphere = Surface::sphere(2.0, 8, 6).unwrap();
        for v in &sphere.mesh().vertices {
            assert_relative_eq!(v.coords.norm(), 2.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_sphere_faces_wind_outwards() {
        let sphere = Surface::sphere(1.0, 12, 8).unwrap();
        for i in 0..sphere.face_count() {
            let normal = sphere.mesh().face_normal(i).unwrap();
            let [a, b, c] = sphere.mesh().triangle(i);
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            assert!(normal.dot(&centroid) > 0.0, "face {} points inwards", i);
        }
    }

    #[test]
    fn test_sphere_rejects_bad_parameters() {
        assert!(Surface::sphere(0.0, 8, 8).is_err());
        assert!(Surface::sphere(1.0, 2, 8).is_err());
        assert!(Surface::sphere(1.0, 8, 1).is_err());
    }

    #[test]
    fn test_new_rejects_mismatched_normals() {
        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::origin(),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        mesh.normals = Some(vec![Vector3f::z()]);
        assert!(matches!(Surface::new(mesh.clone()), Err(Error::InvalidData(_))));

        mesh.normals = Some(vec![Vector3f::z(); 3]);
        let surface = Surface::new(mesh).unwrap();
        assert_eq!(surface.world_triangle(0).normals, [Vector3f::z(); 3]);
    }

    #[test]
    fn test_new_rejects_out_of_range_faces() {
        let mesh = TriangleMesh::from_vertices_and_faces(vec![Point3f::origin()], vec![[0, 1, 2]]);
        assert!(Surface::new(mesh).is_err());
    }

    #[test]
    fn test_set_world_moves_bounds_and_triangles() {
        let mut sphere = Surface::sphere(1.0, 8, 6).unwrap();
        sphere
            .set_world(Transform3D::translation(Vector3f::new(10.0, 0.0, 0.0)))
            .unwrap();
        assert_relative_eq!(sphere.bounds().center.x, 10.0, epsilon = 1e-5);
        let tri = sphere.world_triangle(0);
        for p in tri.positions {
            assert_relative_eq!((p - Point3f::new(10.0, 0.0, 0.0)).norm(), 1.0, epsilon = 1e-5);
        }
        assert!(sphere.set_world(Transform3D::uniform_scaling(0.0)).is_err());
    }
}
