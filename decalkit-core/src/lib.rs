//! Core data structures and traits for decalkit
//!
//! This crate provides the fundamental types shared by the decal placement
//! pipeline: points and vectors, rays, triangle meshes, decal meshes,
//! affine transforms, the error type and the traits that connect the
//! pipeline to an external camera or renderer.

pub mod point;
pub mod ray;
pub mod mesh;
pub mod decal_mesh;
pub mod traits;
pub mod transform;
pub mod error;

pub use point::*;
pub use ray::*;
pub use mesh::*;
pub use decal_mesh::*;
pub use traits::*;
pub use transform::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector2, Vector3, Matrix3, Matrix4, Unit, UnitQuaternion};
