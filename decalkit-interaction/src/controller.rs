//! Click-versus-drag state machine driving decal placement

use crate::camera::Viewport;
use crate::material::DecalMaterial;
use crate::scene::{EntityId, NodeKind, Scene, SceneNode};
use crate::store::DecalStore;
use crate::textures::TextureCatalog;
use decalkit_core::{Error, Point3f, RayProjector, Transform3D, Vector3f};
use decalkit_geometry::{build_decal_mesh, PlacementBuilder, Raycaster, Surface, SurfaceHit};
use log::{debug, info, warn};
use nalgebra::UnitQuaternion;
use rand::RngCore;

/// Pointer input, in viewport pixels with the origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32, is_primary: bool },
    Up { x: f32, y: f32 },
    /// The camera controls moved the view
    CameraChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// The camera moved since the last press
    Dragging,
}

/// What handling one event led to
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// Event had no effect
    Ignored,
    Pressed,
    CameraMoved,
    /// Hover preview refreshed; `hit` tells whether the marker is shown
    Hovered { hit: bool },
    Placed { entity: EntityId, draw_order: u32 },
    /// Release ended a camera drag, nothing placed
    Suppressed,
    /// Click did not hit the surface
    Missed,
    /// Click hit, but the decal box cut no triangles
    Empty,
    /// The pipeline refused the placement
    Rejected(Error),
}

/// Live preview of where a click would place a decal
#[derive(Debug, Clone, PartialEq)]
pub struct HoverMarker {
    pub visible: bool,
    pub position: Point3f,
    pub orientation: UnitQuaternion<f32>,
    /// From the hit point out along the surface normal
    pub aim_line: [Point3f; 2],
}

impl HoverMarker {
    pub fn transform(&self) -> Transform3D {
        Transform3D::from_trs(self.position.coords, self.orientation, Vector3f::repeat(1.0))
    }

    /// Maps the unit segment from the origin to local +Z onto `aim_line`
    pub fn line_transform(&self) -> Transform3D {
        let length = (self.aim_line[1] - self.aim_line[0]).norm();
        Transform3D::from_trs(self.aim_line[0].coords, self.orientation, Vector3f::new(1.0, 1.0, length))
    }
}

impl Default for HoverMarker {
    fn default() -> Self {
        Self {
            visible: false,
            position: Point3f::origin(),
            orientation: UnitQuaternion::identity(),
            aim_line: [Point3f::origin(); 2],
        }
    }
}

/// Everything a placement reads or writes besides the controller itself
pub struct PlacementContext<'a> {
    pub surface: &'a Surface,
    pub camera: &'a dyn RayProjector,
    pub scene: &'a mut Scene,
    pub store: &'a mut DecalStore,
    pub catalog: &'a TextureCatalog,
    pub material: &'a DecalMaterial,
    pub rng: &'a mut dyn RngCore,
}

/// Decides whether a release is a click and, if so, places a decal.
///
/// A press clears the drag flag; any camera change before the release sets
/// it. A release with the flag clear is a click.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    drag_flag: bool,
    raycaster: Raycaster,
    builder: PlacementBuilder,
    viewport: Viewport,
    hover: HoverMarker,
    marker_entity: Option<EntityId>,
    line_entity: Option<EntityId>,
}

impl InteractionController {
    pub fn new(builder: PlacementBuilder, viewport: Viewport) -> Self {
        Self {
            state: InteractionState::Idle,
            drag_flag: false,
            raycaster: Raycaster::default(),
            builder,
            viewport,
            hover: HoverMarker::default(),
            marker_entity: None,
            line_entity: None,
        }
    }

    /// Scene nodes that mirror the hover marker and its aim line
    pub fn attach_hover_nodes(&mut self, marker: EntityId, line: EntityId) {
        self.marker_entity = Some(marker);
        self.line_entity = Some(line);
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn hover(&self) -> &HoverMarker {
        &self.hover
    }

    pub fn builder(&self) -> &PlacementBuilder {
        &self.builder
    }

    pub fn set_builder(&mut self, builder: PlacementBuilder) {
        self.builder = builder;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn handle(&mut self, event: PointerEvent, ctx: &mut PlacementContext<'_>) -> Interaction {
        match event {
            PointerEvent::Down { .. } => {
                self.drag_flag = false;
                self.state = InteractionState::Idle;
                Interaction::Pressed
            }
            PointerEvent::CameraChanged => {
                self.drag_flag = true;
                self.state = InteractionState::Dragging;
                Interaction::CameraMoved
            }
            PointerEvent::Move { x, y, is_primary } => {
                if !is_primary {
                    return Interaction::Ignored;
                }
                match self.pick(x, y, ctx) {
                    Ok(hit) => Interaction::Hovered { hit: hit.intersects },
                    Err(e) => Interaction::Rejected(e),
                }
            }
            PointerEvent::Up { x, y } => {
                self.state = InteractionState::Idle;
                if self.drag_flag {
                    debug!("Release after camera drag, no decal placed");
                    return Interaction::Suppressed;
                }
                self.place(x, y, ctx)
            }
        }
    }

    /// Raycast and refresh the hover preview
    fn pick(&mut self, x: f32, y: f32, ctx: &mut PlacementContext<'_>) -> Result<SurfaceHit, Error> {
        let hit = self.raycaster.cast_from_pointer(
            x,
            y,
            self.viewport.width,
            self.viewport.height,
            ctx.camera,
            ctx.surface,
        )?;
        self.update_hover(&hit, ctx.scene);
        Ok(hit)
    }

    fn update_hover(&mut self, hit: &SurfaceHit, scene: &mut Scene) {
        match self.builder.aim(hit) {
            Some(aim) => {
                self.hover = HoverMarker {
                    visible: true,
                    position: aim.position,
                    orientation: aim.orientation,
                    aim_line: [aim.position, aim.target],
                };
            }
            None => self.hover.visible = false,
        }

        if let Some(node) = self.marker_entity.and_then(|id| scene.get_mut(id)) {
            node.transform = self.hover.transform();
            node.visible = self.hover.visible;
        }
        if let Some(node) = self.line_entity.and_then(|id| scene.get_mut(id)) {
            node.transform = self.hover.line_transform();
            node.visible = self.hover.visible;
        }
    }

    fn place(&mut self, x: f32, y: f32, ctx: &mut PlacementContext<'_>) -> Interaction {
        let hit = match self.pick(x, y, ctx) {
            Ok(hit) => hit,
            Err(e) => {
                warn!("Placement rejected: {}", e);
                return Interaction::Rejected(e);
            }
        };
        let Some(frame) = self.builder.build(&hit, &mut *ctx.rng) else {
            return Interaction::Missed;
        };

        let mesh = match build_decal_mesh(ctx.surface, &frame) {
            Ok(mesh) => mesh,
            Err(e) => {
                warn!("Placement rejected: {}", e);
                return Interaction::Rejected(e);
            }
        };
        if mesh.is_empty() {
            warn!("Decal at {:?} cut no triangles, skipping", frame.position());
            return Interaction::Empty;
        }

        let Some((texture, color)) = ctx.catalog.pick(&mut *ctx.rng) else {
            let e = Error::Unsupported("No decal textures registered".to_string());
            warn!("Placement rejected: {}", e);
            return Interaction::Rejected(e);
        };
        let material = ctx.material.with_texture(texture, color);

        let triangles = mesh.len();
        let entity = ctx
            .scene
            .add(SceneNode::new(NodeKind::Decal).with_transform(frame.to_transform()));
        let draw_order = ctx.store.append(mesh, material, frame, entity);

        info!(
            "Placed decal #{} ({} triangles, extent {:.2}) at ({:.2}, {:.2}, {:.2})",
            draw_order,
            triangles,
            frame.extent().x,
            frame.position().x,
            frame.position().y,
            frame.position().z
        );
        Interaction::Placed { entity, draw_order }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        surface: Surface,
        camera: Camera,
        scene: Scene,
        store: DecalStore,
        catalog: TextureCatalog,
        material: DecalMaterial,
        rng: StdRng,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                surface: Surface::sphere(15.0, 32, 32).unwrap(),
                camera: Camera::default(),
                scene: Scene::new(),
                store: DecalStore::new(),
                catalog: TextureCatalog::with_default_stickers(),
                material: DecalMaterial::default(),
                rng: StdRng::seed_from_u64(17),
            }
        }

        fn send(&mut self, controller: &mut InteractionController, event: PointerEvent) -> Interaction {
            let mut ctx = PlacementContext {
                surface: &self.surface,
                camera: &self.camera,
                scene: &mut self.scene,
                store: &mut self.store,
                catalog: &self.catalog,
                material: &self.material,
                rng: &mut self.rng,
            };
            controller.handle(event, &mut ctx)
        }
    }

    fn controller() -> InteractionController {
        InteractionController::new(PlacementBuilder::default(), Viewport::default())
    }

    #[test]
    fn test_camera_change_enters_dragging() {
        let mut fixture = Fixture::new();
        let mut controller = controller();
        fixture.send(&mut controller, PointerEvent::Down { x: 650.0, y: 350.0 });
        assert_eq!(controller.state(), InteractionState::Idle);
        fixture.send(&mut controller, PointerEvent::CameraChanged);
        assert_eq!(controller.state(), InteractionState::Dragging);
        let outcome = fixture.send(&mut controller, PointerEvent::Up { x: 650.0, y: 350.0 });
        assert_eq!(outcome, Interaction::Suppressed);
        assert_eq!(controller.state(), InteractionState::Idle);
        assert!(fixture.store.is_empty());
    }

    #[test]
    fn test_click_places_decal() {
        let mut fixture = Fixture::new();
        let mut controller = controller();
        fixture.send(&mut controller, PointerEvent::Down { x: 650.0, y: 350.0 });
        let outcome = fixture.send(&mut controller, PointerEvent::Up { x: 650.0, y: 350.0 });

        assert!(matches!(outcome, Interaction::Placed { draw_order: 0, .. }));
        assert_eq!(fixture.store.count(), 1);
        assert_eq!(fixture.scene.count_kind(NodeKind::Decal), 1);
    }

    #[test]
    fn test_click_on_background_misses() {
        let mut fixture = Fixture::new();
        let mut controller = controller();
        fixture.send(&mut controller, PointerEvent::Down { x: 5.0, y: 5.0 });
        let outcome = fixture.send(&mut controller, PointerEvent::Up { x: 5.0, y: 5.0 });
        assert_eq!(outcome, Interaction::Missed);
        assert!(!controller.hover().visible);
        assert!(fixture.store.is_empty());
    }

    #[test]
    fn test_hover_tracks_primary_pointer_only() {
        let mut fixture = Fixture::new();
        let mut controller = controller();

        let ignored = fixture.send(&mut controller, PointerEvent::Move { x: 650.0, y: 350.0, is_primary: false });
        assert_eq!(ignored, Interaction::Ignored);
        assert!(!controller.hover().visible);

        let hovered = fixture.send(&mut controller, PointerEvent::Move { x: 650.0, y: 350.0, is_primary: true });
        assert_eq!(hovered, Interaction::Hovered { hit: true });
        let hover = controller.hover();
        assert!(hover.visible);
        let forward = hover.orientation * Vector3f::z();
        assert!(forward.dot(&hover.position.coords.normalize()) > 0.99);
        assert!((hover.aim_line[1] - hover.aim_line[0]).norm() > 9.9);

        fixture.send(&mut controller, PointerEvent::Move { x: 5.0, y: 5.0, is_primary: true });
        assert!(!controller.hover().visible);
    }

    #[test]
    fn test_hover_nodes_follow_marker() {
        let mut fixture = Fixture::new();
        let mut controller = controller();
        let marker = fixture.scene.add(SceneNode::new(NodeKind::HoverMarker).hidden());
        let line = fixture.scene.add(SceneNode::new(NodeKind::AimLine).hidden());
        controller.attach_hover_nodes(marker, line);

        fixture.send(&mut controller, PointerEvent::Move { x: 650.0, y: 350.0, is_primary: true });
        let hover = controller.hover().clone();
        let marker_node = fixture.scene.get(marker).unwrap();
        let line_node = fixture.scene.get(line).unwrap();
        assert!(marker_node.visible && line_node.visible);

        let center = marker_node.transform.transform_point(&Point3f::origin());
        assert!((center - hover.position).norm() < 1e-4);

        let start = line_node.transform.transform_point(&Point3f::origin());
        let end = line_node.transform.transform_point(&Point3f::new(0.0, 0.0, 1.0));
        assert!((start - hover.aim_line[0]).norm() < 1e-4);
        assert!((end - hover.aim_line[1]).norm() < 1e-3);

        fixture.send(&mut controller, PointerEvent::Move { x: 5.0, y: 5.0, is_primary: true });
        assert!(!fixture.scene.get(marker).unwrap().visible);
        assert!(!fixture.scene.get(line).unwrap().visible);
    }
}
