//! Pointer picking against a surface

use crate::surface::{Side, Surface, WorldTriangle};
use decalkit_core::{Error, Point3f, Ray, RayProjector, Result, Vector2f, Vector3f};
use log::debug;

/// Below this the ray is treated as parallel to the triangle plane
const PARALLEL_EPSILON: f32 = 1e-8;

/// Result of a surface query.
///
/// A miss is reported with `intersects == false`; the remaining fields are
/// then meaningless and must not be read as a hit at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub intersects: bool,
    /// Hit position in world space
    pub point: Point3f,
    /// Unit normal of the hit face in the surface's local space
    pub face_normal: Vector3f,
    /// Unit normal of the hit face in world space
    pub world_normal: Vector3f,
    /// Distance from the ray origin
    pub distance: f32,
    pub face_index: usize,
}

impl SurfaceHit {
    pub fn miss() -> Self {
        Self {
            intersects: false,
            point: Point3f::origin(),
            face_normal: Vector3f::zeros(),
            world_normal: Vector3f::zeros(),
            distance: f32::INFINITY,
            face_index: 0,
        }
    }

    /// The hit itself, or None for a miss
    pub fn as_hit(&self) -> Option<&Self> {
        self.intersects.then_some(self)
    }
}

/// Convert a pixel position (origin top-left) to normalized device
/// coordinates (origin at the centre, +Y up)
pub fn pointer_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Result<Vector2f> {
    if !(width > 0.0 && height > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "Viewport must have a positive size, got {}x{}",
            width, height
        )));
    }
    Ok(Vector2f::new((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0))
}

/// Ray/triangle distance (Möller–Trumbore), honouring the face side filter
pub fn intersect_triangle(ray: &Ray, triangle: &[Point3f; 3], side: Side) -> Option<f32> {
    let [a, b, c] = triangle;
    let edge1 = b - a;
    let edge2 = c - a;
    let pvec = ray.direction.cross(&edge2);
    // Positive when the ray looks at the counter-clockwise side
    let det = edge1.dot(&pvec);

    let facing_ok = match side {
        Side::Front => det > PARALLEL_EPSILON,
        Side::Back => det < -PARALLEL_EPSILON,
        Side::Double => det.abs() > PARALLEL_EPSILON,
    };
    if !facing_ok {
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = ray.origin - a;
    let u = tvec.dot(&pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(&edge1);
    let v = ray.direction.dot(&qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(&qvec) * inv_det;
    (t >= 0.0).then_some(t)
}

/// Finds the nearest surface point along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raycaster {
    /// Hits closer than this are ignored
    pub near: f32,
    /// Hits farther than this are ignored
    pub far: f32,
}

impl Raycaster {
    pub fn new(near: f32, far: f32) -> Result<Self> {
        if !(near >= 0.0 && far > near) {
            return Err(Error::InvalidParameter(format!(
                "Raycaster range must satisfy 0 <= near < far, got {}..{}",
                near, far
            )));
        }
        Ok(Self { near, far })
    }

    /// Nearest hit of `ray` on `surface`, or a miss
    pub fn intersect_surface(&self, ray: &Ray, surface: &Surface) -> SurfaceHit {
        let bounds = surface.bounds();
        if ray.intersect_sphere(&bounds.center, bounds.radius).is_none() {
            return SurfaceHit::miss();
        }

        let mut nearest: Option<(f32, WorldTriangle)> = None;
        for triangle in surface.world_triangles() {
            let Some(t) = intersect_triangle(ray, &triangle.positions, surface.side()) else {
                continue;
            };
            if t < self.near || t > self.far {
                continue;
            }
            if nearest.as_ref().map_or(true, |(best, _)| t < *best) {
                nearest = Some((t, triangle));
            }
        }

        let Some((distance, triangle)) = nearest else {
            return SurfaceHit::miss();
        };

        let face_normal = surface
            .mesh()
            .face_normal(triangle.face_index)
            .unwrap_or_else(Vector3f::zeros);
        let world_normal = surface
            .world()
            .transform_normal(&face_normal)
            .unwrap_or(face_normal);

        SurfaceHit {
            intersects: true,
            point: ray.at(distance),
            face_normal,
            world_normal,
            distance,
            face_index: triangle.face_index,
        }
    }

    /// Cast through the pixel `(x, y)` of a `width x height` viewport
    pub fn cast_from_pointer<C: RayProjector + ?Sized>(
        &self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        camera: &C,
        surface: &Surface,
    ) -> Result<SurfaceHit> {
        let ndc = pointer_to_ndc(x, y, width, height)?;
        let ray = camera.ray_from_ndc(&ndc)?;
        let hit = self.intersect_surface(&ray, surface);
        if !hit.intersects {
            debug!("Pointer ({:.1}, {:.1}) missed the surface", x, y);
        }
        Ok(hit)
    }
}

impl Default for Raycaster {
    fn default() -> Self {
        Self {
            near: 0.0,
            far: f32::INFINITY,
        }
    }
}
