//! Triangle mesh data structures

use crate::point::*;
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh with optional per-vertex normals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3f>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            normals: None,
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Corner positions of a face
    pub fn triangle(&self, face_index: usize) -> [Point3f; 3] {
        let face = self.faces[face_index];
        [
            self.vertices[face[0]],
            self.vertices[face[1]],
            self.vertices[face[2]],
        ]
    }

    /// Unit normal of a face following its winding, or None for a zero-area face
    pub fn face_normal(&self, face_index: usize) -> Option<Vector3f> {
        let [v0, v1, v2] = self.triangle(face_index);
        (v1 - v0).cross(&(v2 - v0)).try_normalize(f32::EPSILON)
    }

    /// Total area of all faces
    pub fn surface_area(&self) -> f32 {
        (0..self.faces.len())
            .map(|i| {
                let [a, b, c] = self.triangle(i);
                triangle_area(&a, &b, &c)
            })
            .sum()
    }

    /// Set vertex normals
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) {
        if normals.len() == self.vertices.len() {
            self.normals = Some(normals);
        }
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
