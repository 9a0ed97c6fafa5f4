//! Oriented-box clipping of a surface into a decal mesh
//!
//! Every surface triangle is moved into the box's local frame, clipped
//! against the six planes `x = ±ex`, `y = ±ey`, `z = ±ez` one plane at a
//! time (Sutherland–Hodgman), fan-triangulated and moved back to world
//! space. Texture coordinates come from projecting each clipped vertex
//! onto the box face that the source triangle faces most directly.

use crate::placement::PlacementFrame;
use crate::surface::{Surface, WorldTriangle};
use decalkit_core::{
    triangle_area, DecalMesh, DecalTriangle, DecalVertex, Error, Point3f, Result, Transform3D,
    Vector2f, Vector3f,
};
use log::debug;

/// Clipped triangles smaller than this fraction of the box face area are dropped
const RELATIVE_AREA_EPSILON: f32 = 1e-7;

/// The six clipping planes as (axis, sign): inside means `sign * p[axis] <= extent[axis]`
const PLANES: [(usize, f32); 6] = [
    (0, 1.0),
    (0, -1.0),
    (1, 1.0),
    (1, -1.0),
    (2, 1.0),
    (2, -1.0),
];

/// A polygon corner during clipping: box-local position, world normal
#[derive(Debug, Clone, Copy)]
struct ClipVertex {
    position: Point3f,
    normal: Vector3f,
}

impl ClipVertex {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(&other.position, t),
            normal: self.normal.lerp(&other.normal, t),
        }
    }
}

/// Keep the part of `input` on the inside of one plane, writing it to `output`.
///
/// Crossing points are snapped exactly onto the plane.
fn clip_against_plane(
    input: &[ClipVertex],
    output: &mut Vec<ClipVertex>,
    axis: usize,
    sign: f32,
    limit: f32,
) {
    output.clear();
    let Some(mut previous) = input.last() else {
        return;
    };
    let mut previous_distance = sign * previous.position[axis] - limit;

    for current in input {
        let current_distance = sign * current.position[axis] - limit;
        let previous_inside = previous_distance <= 0.0;
        let current_inside = current_distance <= 0.0;

        if previous_inside != current_inside {
            let t = previous_distance / (previous_distance - current_distance);
            let mut crossing = previous.lerp(current, t);
            crossing.position[axis] = sign * limit;
            output.push(crossing);
        }
        if current_inside {
            output.push(*current);
        }

        previous = current;
        previous_distance = current_distance;
    }
}

/// True when all three corners lie beyond the same box plane
fn outside_box(local: &[Point3f; 3], extent: &Vector3f) -> bool {
    PLANES.iter().any(|&(axis, sign)| {
        local
            .iter()
            .all(|p| sign * p[axis] > extent[axis])
    })
}

/// Map a box-local position onto the face perpendicular to `axis`, in [0, 1]²
fn project_uv(position: &Point3f, axis: usize, extent: &Vector3f) -> Vector2f {
    let (u_axis, v_axis) = match axis {
        0 => (2, 1),
        1 => (0, 2),
        _ => (0, 1),
    };
    let u = 0.5 + position[u_axis] / (2.0 * extent[u_axis]);
    let v = 0.5 + position[v_axis] / (2.0 * extent[v_axis]);
    Vector2f::new(u.clamp(0.0, 1.0), v.clamp(0.0, 1.0))
}

/// Cuts decal meshes out of a surface with one placement frame's box
#[derive(Debug, Clone)]
pub struct DecalVolumeClipper {
    frame: PlacementFrame,
    box_to_world: Transform3D,
    world_to_box: Transform3D,
}

impl DecalVolumeClipper {
    pub fn new(frame: &PlacementFrame) -> Result<Self> {
        let box_to_world = frame.to_transform();
        let world_to_box = box_to_world
            .inverse()
            .ok_or_else(|| Error::InvalidParameter("Placement box is not invertible".to_string()))?;
        Ok(Self {
            frame: *frame,
            box_to_world,
            world_to_box,
        })
    }

    pub fn frame(&self) -> &PlacementFrame {
        &self.frame
    }

    /// World position of a box-local point
    pub fn to_world(&self, local: &Point3f) -> Point3f {
        self.box_to_world.transform_point(local)
    }

    /// Box-local position of a world point
    pub fn to_local(&self, world: &Point3f) -> Point3f {
        self.world_to_box.transform_point(world)
    }

    /// The part of `surface` inside the box, as a world-space decal mesh
    pub fn clip(&self, surface: &Surface) -> DecalMesh {
        let extent = *self.frame.extent();
        let mut mesh = DecalMesh::new();

        if !surface
            .bounds()
            .intersects_sphere(self.frame.position(), extent.norm())
        {
            debug!("Decal box does not reach the surface bounds");
            return mesh;
        }

        let min_area = RELATIVE_AREA_EPSILON * extent.max() * extent.max();
        let mut polygon = Vec::with_capacity(9);
        let mut scratch = Vec::with_capacity(9);
        let mut dropped = 0usize;

        for triangle in surface.world_triangles() {
            let local = triangle.positions.map(|p| self.to_local(&p));
            if outside_box(&local, &extent) {
                continue;
            }
            let Some(local_normal) = (local[1] - local[0])
                .cross(&(local[2] - local[0]))
                .try_normalize(f32::EPSILON)
            else {
                continue;
            };

            polygon.clear();
            polygon.extend((0..3).map(|i| ClipVertex {
                position: local[i],
                normal: triangle.normals[i],
            }));

            for &(axis, sign) in &PLANES {
                clip_against_plane(&polygon, &mut scratch, axis, sign, extent[axis]);
                std::mem::swap(&mut polygon, &mut scratch);
                if polygon.len() < 3 {
                    break;
                }
            }
            if polygon.len() < 3 {
                continue;
            }

            let axis = local_normal.iamax();
            let fallback_normal = self.face_normal(&triangle, &local_normal, axis);

            for i in 1..polygon.len() - 1 {
                let corners = [polygon[0], polygon[i], polygon[i + 1]];
                if triangle_area(&corners[0].position, &corners[1].position, &corners[2].position)
                    <= min_area
                {
                    dropped += 1;
                    continue;
                }
                let vertices = corners.map(|c| {
                    DecalVertex::new(
                        self.to_world(&c.position),
                        c.normal.try_normalize(f32::EPSILON).unwrap_or(fallback_normal),
                        project_uv(&c.position, axis, &extent),
                    )
                });
                if !mesh.push(DecalTriangle(vertices)) {
                    dropped += 1;
                }
            }
        }

        debug!(
            "Decal clip kept {} triangles ({} degenerate dropped) from {} surface faces",
            mesh.len(),
            dropped,
            surface.face_count()
        );
        mesh
    }

    /// World normal of the source face, or the box face axis it leans towards
    fn face_normal(&self, triangle: &WorldTriangle, local_normal: &Vector3f, axis: usize) -> Vector3f {
        let [a, b, c] = triangle.positions;
        (b - a).cross(&(c - a)).try_normalize(f32::EPSILON).unwrap_or_else(|| {
            let mut face_axis = Vector3f::zeros();
            face_axis[axis] = local_normal[axis].signum();
            self.box_to_world.transform_vector(&face_axis)
        })
    }
}

/// Cut the decal for `frame` out of `surface`
pub fn build_decal_mesh(surface: &Surface, frame: &PlacementFrame) -> Result<DecalMesh> {
    Ok(DecalVolumeClipper::new(frame)?.clip(surface))
}
