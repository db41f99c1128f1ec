use std::collections::HashMap;

use glam::{Quat, Vec3};

use crate::api::types::{EntityId, RequestId};
use crate::assets::catalog::BodyDescriptor;
use crate::error::OrreryError;
use crate::extensions::transform::{LocalTransform, TransformGraph};
use crate::renderer::instance::{InstanceBuffer, NodeInstance};

/// One body placed in the scene.
#[derive(Debug, Clone)]
pub struct SceneEntity {
    /// Body node; carries the spin.
    pub id: EntityId,
    pub descriptor: BodyDescriptor,
    /// Orbit container; carries the revolution.
    pub container: EntityId,
    /// Body entity of the planet a moon orbits.
    pub parent: Option<EntityId>,
    pub orbit_angle: f32,
    pub spin_angle: f32,
    pub texture_request: Option<RequestId>,
    pub textured: bool,
}

impl SceneEntity {
    pub fn new(id: EntityId, container: EntityId, descriptor: BodyDescriptor) -> Self {
        Self {
            id,
            descriptor,
            container,
            parent: None,
            orbit_angle: 0.0,
            spin_angle: 0.0,
            texture_request: None,
            textured: false,
        }
    }

    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn radius(&self) -> f32 {
        self.descriptor.radius
    }

    pub fn is_sun(&self) -> bool {
        self.descriptor.is_emissive
    }
}

/// A node whose world transform is written to the frame each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PublishedNode {
    node: EntityId,
    radius: f32,
    /// Index into `entities` for body nodes.
    body: Option<usize>,
}

/// A node that turns about its local Y axis at a fixed rate.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spinner {
    node: EntityId,
    rate: f32,
    angle: f32,
}

/// Entities, the transform hierarchy and the set of published nodes.
/// Everything hangs off a single root whose yaw turns the whole system.
pub struct SolarScene {
    graph: TransformGraph,
    entities: Vec<SceneEntity>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<EntityId, usize>,
    published: Vec<PublishedNode>,
    spinners: Vec<Spinner>,
    root: EntityId,
    next_id: u32,
    faults: u64,
}

impl SolarScene {
    pub fn new() -> Self {
        let root = EntityId(1);
        let mut graph = TransformGraph::new();
        graph.register(root);
        Self {
            graph,
            entities: Vec::with_capacity(32),
            by_name: HashMap::new(),
            by_id: HashMap::new(),
            published: Vec::new(),
            spinners: Vec::new(),
            root,
            next_id: 2,
            faults: 0,
        }
    }

    pub fn root(&self) -> EntityId {
        self.root
    }

    /// Generate the next unique node ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create a node under `parent` (the root when `None`).
    pub fn add_node(&mut self, parent: Option<EntityId>, local: LocalTransform) -> Result<EntityId, OrreryError> {
        let id = self.next_id();
        self.graph.register_with(id, local);
        self.graph.set_parent(id, Some(parent.unwrap_or(self.root)))?;
        Ok(id)
    }

    /// Add a body whose nodes already exist in the graph. Publishes the body node.
    pub fn add_entity(&mut self, entity: SceneEntity) -> Result<usize, OrreryError> {
        if !self.graph.contains(entity.id) {
            return Err(OrreryError::UnknownNode(entity.id));
        }
        if !self.graph.contains(entity.container) {
            return Err(OrreryError::UnknownNode(entity.container));
        }
        let index = self.entities.len();
        self.by_name.insert(entity.descriptor.name.to_lowercase(), index);
        self.by_id.insert(entity.id, index);
        self.published.push(PublishedNode {
            node: entity.id,
            radius: entity.radius(),
            body: Some(index),
        });
        self.entities.push(entity);
        Ok(index)
    }

    /// Publish a non-body node (orbit centre or decoration).
    pub fn publish(&mut self, node: EntityId, radius: f32) {
        self.published.push(PublishedNode { node, radius, body: None });
    }

    pub fn add_spinner(&mut self, node: EntityId, rate: f32) {
        self.spinners.push(Spinner { node, rate, angle: 0.0 });
    }

    pub fn entity(&self, id: EntityId) -> Option<&SceneEntity> {
        self.by_id.get(&id).and_then(|&i| self.entities.get(i))
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut SceneEntity> {
        let index = *self.by_id.get(&id)?;
        self.entities.get_mut(index)
    }

    /// Case-insensitive lookup by body name.
    pub fn entity_by_name(&self, name: &str) -> Option<&SceneEntity> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .and_then(|&i| self.entities.get(i))
    }

    pub fn entities(&self) -> &[SceneEntity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn published_count(&self) -> usize {
        self.published.len()
    }

    pub fn graph(&self) -> &TransformGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut TransformGraph {
        &mut self.graph
    }

    /// Turn the whole system about the vertical axis.
    pub fn set_scene_yaw(&mut self, angle: f32) {
        if let Some(local) = self.graph.get_local_mut(self.root) {
            local.rotation = Quat::from_rotation_y(angle);
        }
    }

    pub fn scene_yaw(&self) -> f32 {
        self.graph
            .get_local(self.root)
            .map(|l| l.rotation.to_euler(glam::EulerRot::YXZ).0)
            .unwrap_or(0.0)
    }

    /// Advance every orbit and spin by one fixed step.
    /// An entity that fails is logged, counted and skipped; the rest still move.
    /// Returns the number of failures this step.
    pub fn animate_step(&mut self) -> usize {
        let mut failed = 0;
        for index in 0..self.entities.len() {
            if let Err(e) = self.step_entity(index) {
                let name = self.entities.get(index).map(|e| e.name()).unwrap_or("?");
                log::warn!("Error updating celestial body {}: {}", name, e);
                failed += 1;
            }
        }
        for spinner in &mut self.spinners {
            spinner.angle += spinner.rate;
            match self.graph.get_local_mut(spinner.node) {
                Some(local) => local.rotation = Quat::from_rotation_y(spinner.angle),
                None => failed += 1,
            }
        }
        self.faults += failed as u64;
        failed
    }

    fn step_entity(&mut self, index: usize) -> Result<(), OrreryError> {
        let Some(entity) = self.entities.get_mut(index) else {
            return Ok(());
        };
        entity.orbit_angle += entity.descriptor.orbit_rate;
        entity.spin_angle += entity.descriptor.rotation_rate;
        if !entity.orbit_angle.is_finite() || !entity.spin_angle.is_finite() {
            return Err(OrreryError::NonFiniteTransform(entity.id));
        }
        let (orbit, spin) = (entity.orbit_angle, entity.spin_angle);
        let (container, body) = (entity.container, entity.id);

        self.graph
            .get_local_mut(container)
            .ok_or(OrreryError::UnknownNode(container))?
            .rotation = Quat::from_rotation_y(orbit);
        self.graph
            .get_local_mut(body)
            .ok_or(OrreryError::UnknownNode(body))?
            .rotation = Quat::from_rotation_y(spin);
        Ok(())
    }

    pub fn world_position(&self, id: EntityId) -> Result<Vec3, OrreryError> {
        self.graph.world_position(id)
    }

    /// Refresh world transforms and write one instance per published node.
    /// Unresolvable nodes are written hidden and counted. Returns the failure count.
    pub fn write_instances(&mut self, out: &mut InstanceBuffer) -> usize {
        for node in self.graph.propagate() {
            log::warn!("Non-finite transform at node {:?}", node);
        }
        out.clear();
        let mut failed = 0;
        for published in &self.published {
            let textured = published
                .body
                .and_then(|i| self.entities.get(i))
                .is_some_and(|e| e.textured);
            match self.graph.world_transform(published.node) {
                Ok(world) => out.push(NodeInstance::from_world(published.node, &world, published.radius, textured)),
                Err(e) => {
                    log::warn!("Skipping node {:?} this frame: {}", published.node, e);
                    out.push(NodeInstance::hidden(published.node, published.radius));
                    failed += 1;
                }
            }
        }
        self.faults += failed as u64;
        failed
    }

    /// Mark a body textured by the resolution of `request`.
    /// Returns the body node, or `None` when the request is not the body's
    /// live request or the body already has its texture.
    pub fn apply_texture(&mut self, request: RequestId) -> Option<EntityId> {
        let entity = self
            .entities
            .iter_mut()
            .find(|e| e.texture_request == Some(request))?;
        if entity.textured {
            return None;
        }
        entity.textured = true;
        Some(entity.id)
    }

    /// Total isolated failures since creation.
    pub fn fault_count(&self) -> u64 {
        self.faults
    }
}

impl Default for SolarScene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::catalog::solar_system;

    fn descriptor(name: &str) -> BodyDescriptor {
        solar_system().into_iter().find(|b| b.name == name).unwrap()
    }

    /// Container under the root, body at its orbital distance.
    fn add_planet(scene: &mut SolarScene, name: &str) -> EntityId {
        let desc = descriptor(name);
        let container = scene.add_node(None, LocalTransform::new()).unwrap();
        let body = scene
            .add_node(
                Some(container),
                LocalTransform::new().with_translation(Vec3::X * desc.orbital_distance),
            )
            .unwrap();
        scene.add_entity(SceneEntity::new(body, container, desc)).unwrap();
        body
    }

    #[test]
    fn animate_moves_planets_along_their_orbit() {
        let mut scene = SolarScene::new();
        let earth = add_planet(&mut scene, "Earth");
        let start = scene.world_position(earth).unwrap();
        for _ in 0..100 {
            scene.animate_step();
        }
        let end = scene.world_position(earth).unwrap();
        assert!((start.length() - end.length()).abs() < 1e-2);
        assert!((start - end).length() > 1.0);
        let e = scene.entity(earth).unwrap();
        assert!((e.orbit_angle - 100.0 * e.descriptor.orbit_rate).abs() < 1e-4);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut scene = SolarScene::new();
        let mars = add_planet(&mut scene, "Mars");
        assert_eq!(scene.entity_by_name("  mARs ").map(|e| e.id), Some(mars));
        assert!(scene.entity_by_name("Vulcan").is_none());
    }

    #[test]
    fn failing_entity_is_isolated() {
        let mut scene = SolarScene::new();
        let earth = add_planet(&mut scene, "Earth");
        let mars = add_planet(&mut scene, "Mars");
        scene.graph_mut().remove(earth);

        let before = scene.entity(mars).unwrap().orbit_angle;
        assert_eq!(scene.animate_step(), 1);
        assert!(scene.entity(mars).unwrap().orbit_angle > before);

        let mut out = InstanceBuffer::new();
        assert_eq!(scene.write_instances(&mut out), 1);
        assert_eq!(out.instance_count(), 2);
        assert_eq!(out.instances[0].hidden, 1.0);
        assert_eq!(out.instances[1].hidden, 0.0);
        assert_eq!(scene.fault_count(), 2);
    }

    #[test]
    fn scene_yaw_turns_everything() {
        let mut scene = SolarScene::new();
        let earth = add_planet(&mut scene, "Earth");
        scene.set_scene_yaw(std::f32::consts::FRAC_PI_2);
        assert!((scene.scene_yaw() - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
        let p = scene.world_position(earth).unwrap();
        assert!(p.x.abs() < 1e-3);
        assert!((p.z + 150.0).abs() < 1e-3);
    }

    #[test]
    fn texture_applies_once_for_the_live_request() {
        let mut scene = SolarScene::new();
        let earth = add_planet(&mut scene, "Earth");
        scene.entity_mut(earth).unwrap().texture_request = Some(RequestId(4));

        assert_eq!(scene.apply_texture(RequestId(9)), None);
        assert_eq!(scene.apply_texture(RequestId(4)), Some(earth));
        assert_eq!(scene.apply_texture(RequestId(4)), None);
        assert!(scene.entity(earth).unwrap().textured);
    }

    #[test]
    fn spinners_turn_their_node() {
        let mut scene = SolarScene::new();
        let pivot = scene.add_node(None, LocalTransform::new()).unwrap();
        let marker = scene
            .add_node(Some(pivot), LocalTransform::new().with_translation(Vec3::X * 2.0))
            .unwrap();
        scene.publish(marker, 0.2);
        scene.add_spinner(pivot, 0.03);
        for _ in 0..10 {
            scene.animate_step();
        }
        let p = scene.world_position(marker).unwrap();
        assert!((p.length() - 2.0).abs() < 1e-4);
        assert!(p.z < 0.0);
    }
}
