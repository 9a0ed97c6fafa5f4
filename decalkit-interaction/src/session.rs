//! A decal painting session and its per-frame tick

use crate::camera::{Camera, OrbitControls, Viewport};
use crate::controller::{HoverMarker, Interaction, InteractionController, PlacementContext, PointerEvent};
use crate::material::{DecalMaterial, DecalParams, MaterialParams};
use crate::scene::{EntityId, NodeKind, Scene, SceneNode};
use crate::store::{DecalInstance, DecalStore};
use crate::textures::TextureCatalog;
use decalkit_core::Result;
use decalkit_geometry::{PlacementBuilder, Surface};
use log::{info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Receives what to draw each frame.
///
/// Decals arrive in draw order after the surface and the hover marker.
pub trait RenderSink {
    fn draw_surface(&mut self, surface: &Surface, node: &SceneNode);
    fn draw_hover(&mut self, marker: &HoverMarker);
    fn draw_decal(&mut self, decal: &DecalInstance);
}

/// Owns the surface, the camera, the placed decals and the interaction state.
///
/// The host drives it with [`DecalSession::handle_event`] for input and
/// [`DecalSession::tick`] once per frame; nothing runs in between.
pub struct DecalSession {
    surface: Surface,
    surface_entity: EntityId,
    camera: Camera,
    controls: OrbitControls,
    viewport: Viewport,
    scene: Scene,
    store: DecalStore,
    catalog: TextureCatalog,
    params: DecalParams,
    material: DecalMaterial,
    controller: InteractionController,
    rng: StdRng,
    frame_count: u64,
}

impl DecalSession {
    /// Session on the default sphere (radius 15, 64 x 64 segments)
    pub fn new(params: DecalParams, viewport: Viewport, seed: Option<u64>) -> Result<Self> {
        Self::with_surface(Surface::sphere(15.0, 64, 64)?, params, viewport, seed)
    }

    pub fn with_surface(
        surface: Surface,
        params: DecalParams,
        viewport: Viewport,
        seed: Option<u64>,
    ) -> Result<Self> {
        params.validate()?;
        let builder = PlacementBuilder::new(params.scale_range()?, params.rotate);

        let mut scene = Scene::new();
        let surface_entity =
            scene.add(SceneNode::new(NodeKind::Surface).with_transform(*surface.world()));
        let marker = scene.add(SceneNode::new(NodeKind::HoverMarker).hidden());
        let line = scene.add(SceneNode::new(NodeKind::AimLine).hidden());

        let mut controller = InteractionController::new(builder, viewport);
        controller.attach_hover_nodes(marker, line);

        let mut camera = Camera::default();
        camera.set_viewport(&viewport);

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            "Decal session ready: {} surface faces, viewport {}x{}",
            surface.face_count(),
            viewport.width,
            viewport.height
        );

        Ok(Self {
            surface,
            surface_entity,
            camera,
            controls: OrbitControls::default(),
            viewport,
            scene,
            store: DecalStore::new(),
            catalog: TextureCatalog::with_default_stickers(),
            material: DecalMaterial::template(&params),
            params,
            controller,
            rng,
            frame_count: 0,
        })
    }

    /// Feed one input event.
    ///
    /// Presses and moves also drive the orbit controls; a move that turns
    /// the camera is reported to the controller as a camera change first.
    pub fn handle_event(&mut self, event: PointerEvent) -> Interaction {
        match event {
            PointerEvent::Down { x, y } => self.controls.pointer_down(x, y),
            PointerEvent::Move { x, y, is_primary: true } => {
                if self.controls.pointer_move(x, y, &mut self.camera) {
                    self.dispatch(PointerEvent::CameraChanged);
                }
            }
            PointerEvent::Up { .. } => self.controls.pointer_up(),
            _ => {}
        }
        self.dispatch(event)
    }

    fn dispatch(&mut self, event: PointerEvent) -> Interaction {
        let mut ctx = PlacementContext {
            surface: &self.surface,
            camera: &self.camera,
            scene: &mut self.scene,
            store: &mut self.store,
            catalog: &self.catalog,
            material: &self.material,
            rng: &mut self.rng,
        };
        self.controller.handle(event, &mut ctx)
    }

    /// Emit one frame: surface, hover marker if shown, then decals in draw order
    pub fn tick(&mut self, sink: &mut impl RenderSink) {
        if let Some(node) = self.scene.get(self.surface_entity) {
            sink.draw_surface(&self.surface, node);
        }
        let hover = self.controller.hover();
        if hover.visible {
            sink.draw_hover(hover);
        }
        for decal in &self.store {
            sink.draw_decal(decal);
        }

        if self.frame_count % 60 == 0 {
            trace!("Frame {}: {} decals", self.frame_count, self.store.len());
        }
        self.frame_count += 1;
    }

    /// Remove every decal from the store and the scene
    pub fn clear_decals(&mut self) {
        let detached = self.store.clear();
        for id in &detached {
            self.scene.remove(*id);
        }
        info!("Cleared {} decals", detached.len());
    }

    /// Change metalness and roughness of existing and future decals
    pub fn apply_material_params(&mut self, params: MaterialParams) {
        self.params.metalness = params.metalness;
        self.params.roughness = params.roughness;
        self.material.apply(&params);
        self.store.apply_material_params(&params);
    }

    /// Change the size bounds for future decals
    pub fn set_scale_range(&mut self, min_scale: f32, max_scale: f32) -> Result<()> {
        let params = DecalParams {
            min_scale,
            max_scale,
            ..self.params
        };
        let range = params.scale_range()?;
        self.params = params;
        self.controller
            .set_builder(PlacementBuilder { scale_range: range, ..*self.controller.builder() });
        Ok(())
    }

    pub fn set_random_rotation(&mut self, rotate: bool) {
        self.params.rotate = rotate;
        self.controller
            .set_builder(PlacementBuilder { random_rotation: rotate, ..*self.controller.builder() });
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        let viewport = Viewport::new(width, height)?;
        self.viewport = viewport;
        self.camera.set_viewport(&viewport);
        self.controller.set_viewport(viewport);
        Ok(())
    }

    pub fn store(&self) -> &DecalStore {
        &self.store
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn catalog(&self) -> &TextureCatalog {
        &self.catalog
    }

    pub fn params(&self) -> &DecalParams {
        &self.params
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn hover(&self) -> &HoverMarker {
        self.controller.hover()
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
