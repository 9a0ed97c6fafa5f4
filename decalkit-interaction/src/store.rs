//! Placed decals in draw order

use crate::material::{DecalMaterial, MaterialParams};
use crate::scene::EntityId;
use decalkit_core::DecalMesh;
use decalkit_geometry::PlacementFrame;

/// One placed decal: its geometry, how it is drawn and where it was aimed
#[derive(Debug, Clone)]
pub struct DecalInstance {
    mesh: DecalMesh,
    material: DecalMaterial,
    frame: PlacementFrame,
    entity: EntityId,
}

impl DecalInstance {
    pub fn mesh(&self) -> &DecalMesh {
        &self.mesh
    }

    pub fn material(&self) -> &DecalMaterial {
        &self.material
    }

    /// The box the mesh was cut with
    pub fn frame(&self) -> &PlacementFrame {
        &self.frame
    }

    /// Scene node drawing this decal
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn draw_order(&self) -> u32 {
        self.material.draw_order
    }
}

/// Decals in insertion order, which is also the order they are drawn in.
///
/// Only appending and clearing everything are supported.
#[derive(Debug, Default)]
pub struct DecalStore {
    instances: Vec<DecalInstance>,
}

impl DecalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a decal behind all existing ones in draw order; returns its draw order
    pub fn append(
        &mut self,
        mesh: DecalMesh,
        mut material: DecalMaterial,
        frame: PlacementFrame,
        entity: EntityId,
    ) -> u32 {
        let draw_order = self.instances.len() as u32;
        material.draw_order = draw_order;
        self.instances.push(DecalInstance {
            mesh,
            material,
            frame,
            entity,
        });
        draw_order
    }

    /// Remove every decal, returning the scene nodes that drew them
    pub fn clear(&mut self) -> Vec<EntityId> {
        self.instances.drain(..).map(|d| d.entity).collect()
    }

    /// Update metalness and roughness of every placed decal
    pub fn apply_material_params(&mut self, params: &MaterialParams) {
        for decal in &mut self.instances {
            decal.material.apply(params);
        }
    }

    pub fn count(&self) -> usize {
        self.instances.len()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DecalInstance> {
        self.instances.get(index)
    }

    /// Decals in draw order
    pub fn iter(&self) -> std::slice::Iter<'_, DecalInstance> {
        self.instances.iter()
    }

    pub fn for_each(&self, f: impl FnMut(&DecalInstance)) {
        self.instances.iter().for_each(f);
    }
}

impl<'a> IntoIterator for &'a DecalStore {
    type Item = &'a DecalInstance;
    type IntoIter = std::slice::Iter<'a, DecalInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
