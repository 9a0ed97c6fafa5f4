//! Decal mesh data structures

use crate::point::*;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A decal vertex in world space, laid out for direct upload to a vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct DecalVertex {
    pub position: Point3f,
    pub normal: Vector3f,
    pub uv: Vector2f,
}

unsafe impl Pod for DecalVertex {}
unsafe impl Zeroable for DecalVertex {}

impl DecalVertex {
    pub fn new(position: Point3f, normal: Vector3f, uv: Vector2f) -> Self {
        Self { position, normal, uv }
    }

    /// Finite position and uv, unit-length normal
    pub fn is_valid(&self) -> bool {
        is_finite_point(&self.position)
            && is_finite_vector(&self.normal)
            && self.uv.iter().all(|c| c.is_finite())
            && (self.normal.norm() - 1.0).abs() < 1e-3
    }
}

impl Default for DecalVertex {
    fn default() -> Self {
        Self {
            position: Point3f::origin(),
            normal: Vector3f::new(0.0, 0.0, 1.0),
            uv: Vector2f::new(0.5, 0.5),
        }
    }
}

/// One decal triangle, wound like the surface face it was cut from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecalTriangle(pub [DecalVertex; 3]);

impl DecalTriangle {
    pub fn area(&self) -> f32 {
        let [a, b, c] = &self.0;
        triangle_area(&a.position, &b.position, &c.position)
    }
}

/// An unindexed triangle soup conforming to a target surface
///
/// Triangles can only enter through [`DecalMesh::push`], which refuses
/// anything a renderer could not draw.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecalMesh {
    triangles: Vec<DecalTriangle>,
}

impl DecalMesh {
    /// Create a new empty decal mesh
    pub fn new() -> Self {
        Self { triangles: Vec::new() }
    }

    /// Append a triangle; returns false and drops it when any vertex carries
    /// non-finite data or a zero-length normal
    pub fn push(&mut self, triangle: DecalTriangle) -> bool {
        if triangle.0.iter().all(DecalVertex::is_valid) {
            self.triangles.push(triangle);
            true
        } else {
            false
        }
    }

    /// Get the number of triangles
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Check if the mesh has no triangles
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangles(&self) -> &[DecalTriangle] {
        &self.triangles
    }

    /// Iterate over every vertex in triangle order
    pub fn vertices(&self) -> impl Iterator<Item = &DecalVertex> {
        self.triangles.iter().flat_map(|t| t.0.iter())
    }

    /// Total area of all triangles
    pub fn surface_area(&self) -> f32 {
        self.triangles.iter().map(DecalTriangle::area).sum()
    }

    /// Flatten into a vertex list, three vertices per triangle
    pub fn to_vertex_buffer(&self) -> Vec<DecalVertex> {
        self.vertices().copied().collect()
    }

    /// Raw bytes of the flattened vertex list
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.to_vertex_buffer()).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vertex(x: f32, y: f32) -> DecalVertex {
        DecalVertex::new(Point3f::new(x, y, 0.0), Vector3f::z(), Vector2f::new(x, y))
    }

    #[test]
    fn test_push_accepts_valid_triangle() {
        let mut mesh = DecalMesh::new();
        assert!(mesh.push(DecalTriangle([vertex(0.0, 0.0), vertex(1.0, 0.0), vertex(0.0, 1.0)])));
        assert_eq!(mesh.len(), 1);
        assert_relative_eq!(mesh.surface_area(), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_push_rejects_nan_and_zero_normals() {
        let mut mesh = DecalMesh::new();
        let mut bad = vertex(0.0, 0.0);
        bad.position.x = f32::NAN;
        assert!(!mesh.push(DecalTriangle([bad, vertex(1.0, 0.0), vertex(0.0, 1.0)])));

        let mut flat = vertex(0.0, 0.0);
        flat.normal = Vector3f::zeros();
        assert!(!mesh.push(DecalTriangle([flat, vertex(1.0, 0.0), vertex(0.0, 1.0)])));
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_vertex_buffer_layout() {
        assert_eq!(std::mem::size_of::<DecalVertex>(), 32);
        let mut mesh = DecalMesh::new();
        mesh.push(DecalTriangle([vertex(0.0, 0.0), vertex(1.0, 0.0), vertex(0.0, 1.0)]));
        assert_eq!(mesh.to_vertex_buffer().len(), 3);
        assert_eq!(mesh.to_bytes().len(), 96);
    }
}
