//! 3D transformation utilities

use nalgebra::{Isometry3, Matrix3, Matrix4, Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// An affine transformation applied to mesh vertices, normals and decal volumes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub matrix: Matrix4<f32>,
}

impl Transform3D {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a translation transformation
    pub fn translation(translation: Vector3<f32>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&translation),
        }
    }

    /// Create a scaling transformation
    pub fn scaling(scale: Vector3<f32>) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&scale),
        }
    }

    /// Create a uniform scaling transformation
    pub fn uniform_scaling(scale: f32) -> Self {
        Self {
            matrix: Matrix4::new_scaling(scale),
        }
    }

    /// Translation * rotation * scale, the usual object-to-world order
    pub fn from_trs(
        translation: Vector3<f32>,
        rotation: UnitQuaternion<f32>,
        scale: Vector3<f32>,
    ) -> Self {
        let isometry = Isometry3::from_parts(translation.into(), rotation);
        Self {
            matrix: isometry.to_homogeneous() * Matrix4::new_nonuniform_scaling(&scale),
        }
    }

    /// Apply the transformation to a point
    pub fn transform_point(&self, point: &Point3<f32>) -> Point3<f32> {
        self.matrix.transform_point(point)
    }

    /// Apply the linear part of the transformation to a vector
    pub fn transform_vector(&self, vector: &Vector3<f32>) -> Vector3<f32> {
        self.linear() * vector
    }

    /// Transform a surface normal with the inverse transpose of the linear part
    pub fn transform_normal(&self, normal: &Vector3<f32>) -> Option<Vector3<f32>> {
        self.normal_matrix()
            .map(|m| m * normal)
            .and_then(|n| n.try_normalize(f32::EPSILON))
    }

    /// Upper-left 3x3 block
    pub fn linear(&self) -> Matrix3<f32> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Inverse transpose of the linear part, None for a singular transform
    pub fn normal_matrix(&self) -> Option<Matrix3<f32>> {
        self.linear().try_inverse().map(|m| m.transpose())
    }

    /// Get the inverse transformation
    pub fn inverse(self) -> Option<Self> {
        self.matrix.try_inverse().map(|inv_matrix| Self {
            matrix: inv_matrix,
        })
    }

    /// Largest axis scale factor, used to grow bounding spheres
    pub fn max_scale(&self) -> f32 {
        let linear = self.linear();
        linear
            .column_iter()
            .map(|c| c.norm())
            .fold(0.0, f32::max)
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}
