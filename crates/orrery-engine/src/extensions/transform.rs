// extensions/transform.rs
//
// Transform hierarchy: orbit containers carry revolution, body nodes carry spin.
// Tracks parent-child relationships by EntityId, independent of scene contents.
//
// Usage:
//   let mut graph = TransformGraph::new();
//   graph.register_with(container, LocalTransform::new());
//   graph.register_with(body, LocalTransform::new().with_translation(Vec3::X * 150.0));
//   graph.set_parent(body, Some(container))?;
//   let faults = graph.propagate();
//   let pos = graph.world_position(body)?;

use std::collections::HashMap;

use glam::{Affine3A, Quat, Vec3};

use crate::api::types::EntityId;
use crate::error::OrreryError;

/// Local transform relative to the parent node (or world for roots).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl LocalTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Rotation about the vertical axis (the orbital plane is XZ).
    pub fn with_yaw(self, angle: f32) -> Self {
        self.with_rotation(Quat::from_rotation_y(angle))
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.translation)
    }
}

#[derive(Debug, Clone, Default)]
struct TransformNode {
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    local: LocalTransform,
}

/// Transform hierarchy graph.
///
/// `propagate` refreshes cached world transforms. A node whose chain yields a
/// non-finite transform is reported and left out of the cache together with
/// its subtree; the rest of the graph still updates.
#[derive(Debug, Default)]
pub struct TransformGraph {
    nodes: HashMap<EntityId, TransformNode>,
    /// Nodes with no parent (top-level).
    roots: Vec<EntityId>,
    world: HashMap<EntityId, Affine3A>,
    /// Set when locals or hierarchy change, cleared after propagate.
    dirty: bool,
}

impl TransformGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node with a default local transform.
    pub fn register(&mut self, id: EntityId) {
        self.register_with(id, LocalTransform::default());
    }

    /// Register a node with a specific local transform.
    pub fn register_with(&mut self, id: EntityId, local: LocalTransform) {
        let node = self.nodes.entry(id).or_default();
        node.local = local;
        if node.parent.is_none() && !self.roots.contains(&id) {
            self.roots.push(id);
        }
        self.dirty = true;
    }

    /// Set the parent of a node. Pass `None` to make it a root.
    /// Rejects links that would close a cycle.
    pub fn set_parent(&mut self, child: EntityId, parent: Option<EntityId>) -> Result<(), OrreryError> {
        if !self.nodes.contains_key(&child) {
            return Err(OrreryError::UnknownNode(child));
        }
        if let Some(p) = parent {
            if !self.nodes.contains_key(&p) {
                return Err(OrreryError::UnknownNode(p));
            }
            let mut cursor = Some(p);
            while let Some(cur) = cursor {
                if cur == child {
                    return Err(OrreryError::TransformCycle(child));
                }
                cursor = self.nodes.get(&cur).and_then(|n| n.parent);
            }
        }

        if let Some(old_parent) = self.nodes.get(&child).and_then(|n| n.parent) {
            if let Some(old_node) = self.nodes.get_mut(&old_parent) {
                old_node.children.retain(|&c| c != child);
            }
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = parent;
        }

        match parent {
            Some(p) => {
                if let Some(parent_node) = self.nodes.get_mut(&p) {
                    if !parent_node.children.contains(&child) {
                        parent_node.children.push(child);
                    }
                }
                self.roots.retain(|&r| r != child);
            }
            None => {
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }
        }

        self.dirty = true;
        Ok(())
    }

    pub fn set_local(&mut self, id: EntityId, local: LocalTransform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local = local;
            self.dirty = true;
        }
    }

    pub fn get_local(&self, id: EntityId) -> Option<&LocalTransform> {
        self.nodes.get(&id).map(|n| &n.local)
    }

    pub fn get_local_mut(&mut self, id: EntityId) -> Option<&mut LocalTransform> {
        self.dirty = true;
        self.nodes.get_mut(&id).map(|n| &mut n.local)
    }

    pub fn get_parent(&self, id: EntityId) -> Option<EntityId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn get_children(&self, id: EntityId) -> Option<&[EntityId]> {
        self.nodes.get(&id).map(|n| n.children.as_slice())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Remove a node. Its children become roots.
    pub fn remove(&mut self, id: EntityId) {
        if let Some(node) = self.nodes.remove(&id) {
            if let Some(parent) = node.parent {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.children.retain(|&c| c != id);
                }
            }
            for child in node.children {
                if let Some(child_node) = self.nodes.get_mut(&child) {
                    child_node.parent = None;
                }
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }
            self.roots.retain(|&r| r != id);
            self.world.remove(&id);
        }
        self.dirty = true;
    }

    /// Recompute cached world transforms from the roots down.
    /// Returns the nodes that produced non-finite transforms.
    pub fn propagate(&mut self) -> Vec<EntityId> {
        let mut faults = Vec::new();
        if !self.dirty {
            return faults;
        }
        self.world.clear();
        let mut stack: Vec<(EntityId, Affine3A)> =
            self.roots.iter().map(|&r| (r, Affine3A::IDENTITY)).collect();
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else { continue };
            let world = parent_world * node.local.to_affine();
            if !world.is_finite() {
                faults.push(id);
                continue;
            }
            self.world.insert(id, world);
            stack.extend(node.children.iter().map(|&c| (c, world)));
        }
        self.dirty = false;
        faults
    }

    /// World transform of `id`. Uses the propagated cache when it is current,
    /// otherwise walks the parent chain.
    pub fn world_transform(&self, id: EntityId) -> Result<Affine3A, OrreryError> {
        if !self.dirty {
            if let Some(world) = self.world.get(&id) {
                return Ok(*world);
            }
        }
        self.compute_world(id)
    }

    pub fn world_position(&self, id: EntityId) -> Result<Vec3, OrreryError> {
        self.world_transform(id).map(|w| w.translation.into())
    }

    fn compute_world(&self, id: EntityId) -> Result<Affine3A, OrreryError> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(cur) = cursor {
            let node = self.nodes.get(&cur).ok_or(OrreryError::UnknownNode(cur))?;
            if chain.len() > self.nodes.len() {
                return Err(OrreryError::TransformCycle(id));
            }
            chain.push(node.local.to_affine());
            cursor = node.parent;
        }
        let world = chain.iter().rev().fold(Affine3A::IDENTITY, |acc, local| acc * *local);
        if !world.is_finite() {
            return Err(OrreryError::NonFiniteTransform(id));
        }
        Ok(world)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn parent_child_relationship() {
        let mut graph = TransformGraph::new();
        let parent = EntityId(1);
        let child = EntityId(2);
        graph.register(parent);
        graph.register(child);
        graph.set_parent(child, Some(parent)).unwrap();

        assert_eq!(graph.get_parent(child), Some(parent));
        assert_eq!(graph.get_children(parent), Some([child].as_slice()));
    }

    #[test]
    fn yawed_container_carries_child_around() {
        let mut graph = TransformGraph::new();
        let container = EntityId(1);
        let body = EntityId(2);
        graph.register_with(container, LocalTransform::new().with_yaw(FRAC_PI_2));
        graph.register_with(body, LocalTransform::new().with_translation(Vec3::new(150.0, 0.0, 0.0)));
        graph.set_parent(body, Some(container)).unwrap();

        assert!(graph.propagate().is_empty());
        let pos = graph.world_position(body).unwrap();
        assert!(close(pos, Vec3::new(0.0, 0.0, -150.0)), "got {:?}", pos);
    }

    #[test]
    fn nested_containers_compose() {
        let mut graph = TransformGraph::new();
        let (planet_orbit, planet, moon_orbit, moon) = (EntityId(1), EntityId(2), EntityId(3), EntityId(4));
        graph.register(planet_orbit);
        graph.register_with(planet, LocalTransform::new().with_translation(Vec3::X * 100.0));
        graph.register_with(moon_orbit, LocalTransform::new().with_translation(Vec3::X * 100.0));
        graph.register_with(moon, LocalTransform::new().with_translation(Vec3::X * 6.0));
        graph.set_parent(planet, Some(planet_orbit)).unwrap();
        graph.set_parent(moon_orbit, Some(planet_orbit)).unwrap();
        graph.set_parent(moon, Some(moon_orbit)).unwrap();

        graph.get_local_mut(planet_orbit).unwrap().rotation = Quat::from_rotation_y(FRAC_PI_2);
        graph.propagate();
        let moon_pos = graph.world_position(moon).unwrap();
        let planet_pos = graph.world_position(planet).unwrap();
        assert!(close(planet_pos, Vec3::new(0.0, 0.0, -100.0)));
        assert!((moon_pos - planet_pos).length() - 6.0 < 1e-3);
    }

    #[test]
    fn dirty_graph_walks_chain() {
        let mut graph = TransformGraph::new();
        graph.register_with(EntityId(1), LocalTransform::new().with_translation(Vec3::Y));
        graph.propagate();
        graph.set_local(EntityId(1), LocalTransform::new().with_translation(Vec3::Z));
        assert!(graph.is_dirty());
        assert!(close(graph.world_position(EntityId(1)).unwrap(), Vec3::Z));
    }

    #[test]
    fn remove_orphans_children() {
        let mut graph = TransformGraph::new();
        let parent = EntityId(1);
        let child = EntityId(2);
        graph.register(parent);
        graph.register(child);
        graph.set_parent(child, Some(parent)).unwrap();
        graph.remove(parent);

        assert_eq!(graph.get_parent(child), None);
        assert!(graph.roots.contains(&child));
        assert!(matches!(graph.world_position(parent), Err(OrreryError::UnknownNode(_))));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut graph = TransformGraph::new();
        let a = EntityId(1);
        let b = EntityId(2);
        graph.register(a);
        graph.register(b);
        graph.set_parent(b, Some(a)).unwrap();
        assert!(matches!(graph.set_parent(a, Some(b)), Err(OrreryError::TransformCycle(_))));
        assert!(matches!(graph.set_parent(a, Some(a)), Err(OrreryError::TransformCycle(_))));
        assert!(graph.set_parent(EntityId(9), Some(a)).is_err());
    }

    #[test]
    fn non_finite_subtree_is_isolated() {
        let mut graph = TransformGraph::new();
        let bad = EntityId(1);
        let bad_child = EntityId(2);
        let good = EntityId(3);
        graph.register_with(bad, LocalTransform::new().with_translation(Vec3::new(f32::NAN, 0.0, 0.0)));
        graph.register(bad_child);
        graph.register_with(good, LocalTransform::new().with_translation(Vec3::X));
        graph.set_parent(bad_child, Some(bad)).unwrap();

        assert_eq!(graph.propagate(), vec![bad]);
        assert!(close(graph.world_position(good).unwrap(), Vec3::X));
        assert!(matches!(graph.world_position(bad_child), Err(OrreryError::NonFiniteTransform(_))));
    }
}
