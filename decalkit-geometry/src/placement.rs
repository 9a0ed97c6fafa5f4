//! Placement frames: where, which way and how large a decal is cut

use crate::raycast::SurfaceHit;
use decalkit_core::{
    is_finite_point, is_finite_vector, Error, Point3f, Result, Transform3D, Vector3f,
};
use nalgebra::{Matrix3, Rotation3, UnitQuaternion};
use rand::Rng;
use std::f32::consts::TAU;

/// Default distance from the hit point to the aiming target along the normal
pub const DEFAULT_PROJECTION_DISTANCE: f32 = 10.0;

/// Oriented box a decal is cut with.
///
/// Local +Z faces away from the surface. Built only through
/// [`PlacementFrame::new`], so every frame in circulation has a finite
/// position, a unit orientation and strictly positive half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementFrame {
    position: Point3f,
    orientation: UnitQuaternion<f32>,
    extent: Vector3f,
}

impl PlacementFrame {
    pub fn new(position: Point3f, orientation: UnitQuaternion<f32>, extent: Vector3f) -> Result<Self> {
        if !is_finite_point(&position) {
            return Err(Error::InvalidParameter("Frame position must be finite".to_string()));
        }
        let q = orientation.quaternion();
        if !q.coords.iter().all(|c| c.is_finite()) || (q.norm() - 1.0).abs() > 1e-3 {
            return Err(Error::InvalidParameter(
                "Frame orientation must be a unit quaternion".to_string(),
            ));
        }
        if !is_finite_vector(&extent) || extent.iter().any(|&e| e <= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "Frame extent must be positive on every axis, got {:?}",
                extent.as_slice()
            )));
        }
        Ok(Self {
            position,
            orientation,
            extent,
        })
    }

    pub fn position(&self) -> &Point3f {
        &self.position
    }

    pub fn orientation(&self) -> &UnitQuaternion<f32> {
        &self.orientation
    }

    /// Half-size of the box along each local axis
    pub fn extent(&self) -> &Vector3f {
        &self.extent
    }

    /// World direction of the frame's local +Z
    pub fn forward(&self) -> Vector3f {
        self.orientation * Vector3f::z()
    }

    /// Box-local to world, without the extent
    pub fn to_transform(&self) -> Transform3D {
        Transform3D::from_trs(self.position.coords, self.orientation, Vector3f::repeat(1.0))
    }
}

/// Inclusive bounds for the random decal size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRange {
    pub min: f32,
    pub max: f32,
}

impl ScaleRange {
    pub fn new(min: f32, max: f32) -> Result<Self> {
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(Error::InvalidParameter(format!(
                "Scale range must satisfy 0 < min <= max, got {}..{}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Uniform draw from `[min, max]`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min == self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self { min: 5.0, max: 10.0 }
    }
}

/// Rotation whose local +Z points from `eye` to `target`, with `up` as the
/// roll reference. Nudges the forward axis when it is parallel to `up`.
pub fn look_at_rotation(eye: &Point3f, target: &Point3f, up: &Vector3f) -> Option<UnitQuaternion<f32>> {
    let mut z = target - eye;
    if z.norm_squared() == 0.0 {
        z.z = 1.0;
    }
    z.try_normalize_mut(f32::EPSILON)?;

    // Forward (nearly) parallel to up leaves no usable side axis
    let x = match up.cross(&z).try_normalize(f32::EPSILON) {
        Some(x) => x,
        None => {
            if (up.z.abs() - 1.0).abs() < f32::EPSILON {
                z.x += 1e-4;
            } else {
                z.z += 1e-4;
            }
            z.try_normalize_mut(f32::EPSILON)?;
            up.cross(&z).try_normalize(f32::EPSILON)?
        }
    };
    let y = z.cross(&x);

    let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[x, y, z]));
    Some(UnitQuaternion::from_rotation_matrix(&rotation))
}

/// Where the hover marker sits and looks for a given hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aim {
    pub position: Point3f,
    /// Point along the world normal the marker looks at
    pub target: Point3f,
    pub orientation: UnitQuaternion<f32>,
}

/// Orientation that faces `hit` along its world normal, or None for a miss
pub fn facing_aim(hit: &SurfaceHit, projection_distance: f32) -> Option<Aim> {
    let hit = hit.as_hit()?;
    let target = hit.point + hit.world_normal * projection_distance;
    let orientation = look_at_rotation(&hit.point, &target, &Vector3f::y())?;
    Some(Aim {
        position: hit.point,
        target,
        orientation,
    })
}

/// Derive the placement frame for a hit.
///
/// `previous_orientation` is the orientation the hover marker already shows
/// for this hit; without it the orientation is derived from the hit normal.
/// With `random_rotation` the roll about the surface normal is replaced by a
/// uniform angle in `[0, 2π)`. Returns None when the hit is a miss.
pub fn build_frame<R: Rng + ?Sized>(
    hit: &SurfaceHit,
    previous_orientation: Option<UnitQuaternion<f32>>,
    random_rotation: bool,
    scale_range: &ScaleRange,
    rng: &mut R,
) -> Option<PlacementFrame> {
    let hit = hit.as_hit()?;
    let mut orientation = match previous_orientation {
        Some(orientation) => orientation,
        None => facing_aim(hit, DEFAULT_PROJECTION_DISTANCE)?.orientation,
    };
    if random_rotation {
        let roll = rng.gen_range(0.0..TAU);
        orientation *= UnitQuaternion::from_axis_angle(&Vector3f::z_axis(), roll);
    }
    let size = scale_range.sample(rng);
    PlacementFrame::new(hit.point, orientation, Vector3f::repeat(size)).ok()
}

/// Placement settings that stay fixed between clicks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementBuilder {
    pub projection_distance: f32,
    pub scale_range: ScaleRange,
    pub random_rotation: bool,
}

impl PlacementBuilder {
    pub fn new(scale_range: ScaleRange, random_rotation: bool) -> Self {
        Self {
            projection_distance: DEFAULT_PROJECTION_DISTANCE,
            scale_range,
            random_rotation,
        }
    }

    /// Hover marker transform for a hit
    pub fn aim(&self, hit: &SurfaceHit) -> Option<Aim> {
        facing_aim(hit, self.projection_distance)
    }

    /// Placement frame for a hit
    pub fn build<R: Rng + ?Sized>(&self, hit: &SurfaceHit, rng: &mut R) -> Option<PlacementFrame> {
        let aim = self.aim(hit)?;
        build_frame(hit, Some(aim.orientation), self.random_rotation, &self.scale_range, rng)
    }
}

impl Default for PlacementBuilder {
    fn default() -> Self {
        Self::new(ScaleRange::default(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hit_at(point: Point3f, normal: Vector3f) -> SurfaceHit {
        SurfaceHit {
            intersects: true,
            point,
            face_normal: normal,
            world_normal: normal,
            distance: 1.0,
            face_index: 0,
        }
    }

    #[test]
    fn test_frame_faces_the_normal() {
        let normal = Vector3f::new(1.0, 1.0, 0.0).normalize();
        let hit = hit_at(Point3f::new(3.0, 3.0, 0.0), normal);
        let mut rng = StdRng::seed_from_u64(7);
        let frame = PlacementBuilder::default().build(&hit, &mut rng).unwrap();

        assert_relative_eq!(frame.forward(), normal, epsilon = 1e-5);
        assert_eq!(*frame.position(), hit.point);
    }

    #[test]
    fn test_look_at_handles_normal_parallel_to_up() {
        let q = look_at_rotation(&Point3f::origin(), &Point3f::new(0.0, 5.0, 0.0), &Vector3f::y()).unwrap();
        let forward = q * Vector3f::z();
        assert!(forward.y > 0.999);
        assert!(q.quaternion().coords.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_look_at_handles_normal_nearly_parallel_to_up() {
        for normal in [Vector3f::new(0.0, 1.0, 1e-8), Vector3f::new(1e-9, -1.0, 0.0)] {
            let hit = hit_at(Point3f::origin(), normal);
            let aim = PlacementBuilder::default().aim(&hit).unwrap();
            let forward = aim.orientation * Vector3f::z();
            assert!(forward.dot(&normal) > 0.999, "forward {:?} for normal {:?}", forward, normal);

            let mut rng = StdRng::seed_from_u64(5);
            assert!(PlacementBuilder::new(ScaleRange::default(), true).build(&hit, &mut rng).is_some());
        }
    }

    #[test]
    fn test_random_rotation_keeps_forward_axis() {
        let normal = Vector3f::new(0.0, 0.0, 1.0);
        let hit = hit_at(Point3f::new(0.0, 0.0, 15.0), normal);
        let builder = PlacementBuilder::new(ScaleRange::default(), true);
        let mut rng = StdRng::seed_from_u64(11);

        let a = builder.build(&hit, &mut rng).unwrap();
        let b = builder.build(&hit, &mut rng).unwrap();
        assert_relative_eq!(a.forward(), normal, epsilon = 1e-5);
        assert_relative_eq!(b.forward(), normal, epsilon = 1e-5);
        assert!(a.orientation().angle_to(b.orientation()) > 1e-4);
    }

    #[test]
    fn test_scale_bounds() {
        let hit = hit_at(Point3f::new(0.0, 0.0, 15.0), Vector3f::z());
        let range = ScaleRange::new(5.0, 10.0).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..1000 {
            let frame = build_frame(&hit, None, true, &range, &mut rng).unwrap();
            for e in frame.extent().iter() {
                assert!((5.0..=10.0).contains(e), "extent {} out of range", e);
            }
            assert_eq!(frame.extent().x, frame.extent().y);
            assert_eq!(frame.extent().y, frame.extent().z);
        }
    }

    #[test]
    fn test_miss_builds_no_frame() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(PlacementBuilder::default().build(&SurfaceHit::miss(), &mut rng).is_none());
        assert!(PlacementBuilder::default().aim(&SurfaceHit::miss()).is_none());
    }

    #[test]
    fn test_frame_validation() {
        let q = UnitQuaternion::identity();
        assert!(PlacementFrame::new(Point3f::origin(), q, Vector3f::new(1.0, 0.0, 1.0)).is_err());
        assert!(PlacementFrame::new(Point3f::origin(), q, Vector3f::new(1.0, -1.0, 1.0)).is_err());
        assert!(PlacementFrame::new(Point3f::new(f32::NAN, 0.0, 0.0), q, Vector3f::repeat(1.0)).is_err());
        assert!(PlacementFrame::new(Point3f::origin(), q, Vector3f::repeat(1.0)).is_ok());
    }

    #[test]
    fn test_scale_range_validation() {
        assert!(ScaleRange::new(0.0, 1.0).is_err());
        assert!(ScaleRange::new(2.0, 1.0).is_err());
        let fixed = ScaleRange::new(3.0, 3.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(fixed.sample(&mut rng), 3.0);
    }
}
