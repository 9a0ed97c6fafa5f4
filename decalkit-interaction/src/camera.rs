//! Camera and orbit controls for picking

use decalkit_core::{Error, Ray, RayProjector, Result, Vector2f};
use nalgebra::{Matrix4, Perspective3, Point3, Vector3};
use std::f32::consts::PI;

/// Keeps the orbit away from the poles where the up vector degenerates
const POLE_MARGIN: f32 = 1e-3;

/// Pixel size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "Viewport must have a positive size, got {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// A perspective camera looking at a target point
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        perspective.into_inner()
    }

    /// Follow a viewport resize
    pub fn set_viewport(&mut self, viewport: &Viewport) {
        self.aspect_ratio = viewport.aspect_ratio();
    }

    /// Move the camera towards the target, never closer than `near`
    pub fn zoom(&mut self, distance: f32) {
        let offset = self.position - self.target;
        let radius = (offset.norm() - distance).max(self.near);
        self.position = self.target + offset.normalize() * radius;
    }

    /// Rotate the camera around the target by spherical angle deltas
    pub fn orbit(&mut self, horizontal: f32, vertical: f32) {
        let offset = self.position - self.target;
        let radius = offset.norm();
        if radius == 0.0 {
            return;
        }

        let theta = offset.x.atan2(offset.z) - horizontal;
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() - vertical)
            .clamp(POLE_MARGIN, PI - POLE_MARGIN);

        let new_offset = Vector3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        self.position = self.target + new_offset;
    }
}

impl RayProjector for Camera {
    /// Ray from the eye through the NDC point, unprojected at mid depth
    fn ray_from_ndc(&self, ndc: &Vector2f) -> Result<Ray> {
        let inverse = (self.projection_matrix() * self.view_matrix())
            .try_inverse()
            .ok_or_else(|| Error::InvalidParameter("Camera projection is singular".to_string()))?;
        let through = inverse.transform_point(&Point3::new(ndc.x, ndc.y, 0.5));
        Ray::new(self.position, through - self.position)
    }
}

impl Default for Camera {
    /// 75 degree camera thirty units up the +Z axis, looking at the origin
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, 0.0, 30.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            75f32.to_radians(),
            Viewport::default().aspect_ratio(),
            0.1,
            100.0,
        )
    }
}

/// Turns primary-button drags into camera orbits
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Radians per pixel of drag
    pub rotate_speed: f32,
    last_pointer: Option<(f32, f32)>,
}

impl OrbitControls {
    pub fn new(rotate_speed: f32) -> Self {
        Self {
            rotate_speed,
            last_pointer: None,
        }
    }

    /// Start a drag at the pointer position
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.last_pointer = Some((x, y));
    }

    /// Orbit while dragging; returns true when the camera moved
    pub fn pointer_move(&mut self, x: f32, y: f32, camera: &mut Camera) -> bool {
        let Some((last_x, last_y)) = self.last_pointer else {
            return false;
        };
        self.last_pointer = Some((x, y));

        let (dx, dy) = (x - last_x, y - last_y);
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        camera.orbit(dx * self.rotate_speed, dy * self.rotate_speed);
        true
    }

    pub fn pointer_up(&mut self) {
        self.last_pointer = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.last_pointer.is_some()
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(0.005)
    }
}
