use bytemuck::{Pod, Zeroable};
use glam::{Affine3A, Quat, Vec3};

use crate::api::types::EntityId;

/// Per-node frame data read by the host renderer.
/// Must match the host protocol: 12 floats = 48 bytes stride.
///
/// Every published scene node (bodies, moon orbit centres, decorations)
/// gets one instance per frame carrying its world transform.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct NodeInstance {
    /// Node id as recorded by the backend.
    pub node: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// World rotation quaternion.
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
    /// Uniform world scale.
    pub scale: f32,
    /// Sphere radius, 0 for anchors.
    pub radius: f32,
    /// 1.0 once the node's texture has been applied.
    pub textured: f32,
    /// 0.0 visible, 1.0 hidden (transform could not be resolved this frame).
    pub hidden: f32,
}

impl NodeInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_world(node: EntityId, world: &Affine3A, radius: f32, textured: bool) -> Self {
        let (scale, rotation, translation) = world.to_scale_rotation_translation();
        Self::from_parts(node, translation, rotation, scale.x, radius, textured)
    }

    pub fn from_parts(node: EntityId, position: Vec3, rotation: Quat, scale: f32, radius: f32, textured: bool) -> Self {
        Self {
            node: node.0 as f32,
            x: position.x,
            y: position.y,
            z: position.z,
            qx: rotation.x,
            qy: rotation.y,
            qz: rotation.z,
            qw: rotation.w,
            scale,
            radius,
            textured: if textured { 1.0 } else { 0.0 },
            hidden: 0.0,
        }
    }

    /// Placeholder for a node whose transform failed this frame.
    pub fn hidden(node: EntityId, radius: f32) -> Self {
        Self {
            node: node.0 as f32,
            qw: 1.0,
            scale: 1.0,
            radius,
            hidden: 1.0,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Instances for one frame, in publication order.
pub struct InstanceBuffer {
    pub instances: Vec<NodeInstance>,
}

impl InstanceBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(64),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: NodeInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for InstanceBuffer {
    fn default() -> Self {
        Self::new()
    }
}
