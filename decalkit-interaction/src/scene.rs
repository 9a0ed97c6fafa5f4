//! Scene arena for renderable entities
//!
//! The surface, the hover helpers and every decal are nodes in one arena.
//! Other components hold `EntityId`s rather than references; ids are handed
//! out in increasing order and never reused, so a stale id simply resolves
//! to nothing.

use decalkit_core::Transform3D;
use std::collections::BTreeMap;

pub type EntityId = u64;

/// What a scene node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Surface,
    HoverMarker,
    /// Unit segment from the origin along local +Z, scaled to the aim line
    AimLine,
    Decal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub transform: Transform3D,
    pub visible: bool,
}

impl SceneNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            transform: Transform3D::identity(),
            visible: true,
        }
    }

    pub fn with_transform(mut self, transform: Transform3D) -> Self {
        self.transform = transform;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    nodes: BTreeMap<EntityId, SceneNode>,
    next_entity_id: EntityId,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: SceneNode) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        self.nodes.insert(id, node);
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<SceneNode> {
        self.nodes.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.values().filter(|n| n.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_never_reused() {
        let mut scene = Scene::new();
        let a = scene.add(SceneNode::new(NodeKind::Decal));
        scene.remove(a);
        let b = scene.add(SceneNode::new(NodeKind::Decal));
        assert_ne!(a, b);
        assert!(scene.get(a).is_none());
        assert!(scene.contains(b));
    }

    #[test]
    fn test_iteration_follows_insertion() {
        let mut scene = Scene::new();
        let surface = scene.add(SceneNode::new(NodeKind::Surface));
        let marker = scene.add(SceneNode::new(NodeKind::HoverMarker).hidden());
        let ids: Vec<_> = scene.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![surface, marker]);
        assert!(!scene.get(marker).unwrap().visible);
        assert_eq!(scene.count_kind(NodeKind::Surface), 1);
    }
}
