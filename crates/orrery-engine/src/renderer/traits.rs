//! Render backend contract.
//!
//! The engine never draws. It describes what exists in the scene (spheres,
//! rings, line strips, point clouds, textures) through this trait once at
//! composition time, then publishes per-node world transforms every frame
//! through the frame buffer. The web host records the calls and realises them
//! with its own GPU scene graph.

use serde::Serialize;

use crate::api::types::EntityId;
use crate::assets::catalog::BodyDescriptor;
use crate::textures::image::TextureImage;

/// Surface description for a sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaterialDesc {
    /// 0xRRGGBB base color, shown until a texture arrives.
    pub color: u32,
    pub emissive: u32,
    pub emissive_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    /// Unlit materials ignore scene lights.
    pub lit: bool,
}

impl MaterialDesc {
    /// Unlit flat color.
    pub fn flat(color: u32, opacity: f32) -> Self {
        Self {
            color,
            emissive: 0,
            emissive_intensity: 0.0,
            roughness: 1.0,
            metalness: 0.0,
            opacity,
            lit: false,
        }
    }

    /// Material for a body: emissive bodies are unlit, planets glow faintly
    /// in their own color, moons are plain lit surfaces.
    pub fn for_body(body: &BodyDescriptor) -> Self {
        if body.is_emissive {
            return Self {
                emissive: body.color,
                emissive_intensity: 1.0,
                ..Self::flat(body.color, 1.0)
            };
        }
        let (emissive, emissive_intensity) = if body.is_moon() {
            (0, 0.0)
        } else {
            (scale_color(body.color, 0.3), 0.5)
        };
        Self {
            color: body.color,
            emissive,
            emissive_intensity,
            roughness: 0.5,
            metalness: 0.2,
            opacity: 1.0,
            lit: true,
        }
    }
}

/// Multiply each channel of a 0xRRGGBB color.
pub fn scale_color(color: u32, factor: f32) -> u32 {
    let channel = |shift: u32| {
        let c = ((color >> shift) & 0xff) as f32 * factor;
        (c.round().clamp(0.0, 255.0) as u32) << shift
    };
    channel(16) | channel(8) | channel(0)
}

/// Where an attachment lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "space", content = "node", rename_all = "snake_case")]
pub enum Anchor {
    /// Fixed world coordinates.
    World,
    /// Local space of a published scene node; follows its world transform.
    Node(EntityId),
}

/// A sphere bound to a published node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SphereDesc {
    pub node: EntityId,
    pub name: String,
    pub radius: f32,
    pub segments: u32,
    pub material: MaterialDesc,
    /// Faint white wireframe drawn over the surface.
    pub wireframe_overlay: bool,
    /// Name sprite floating above the sphere.
    pub label: Option<String>,
}

/// Flat annulus in the anchor's XZ plane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingDesc {
    pub anchor: Anchor,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub segments: u32,
    pub color: u32,
    pub opacity: f32,
}

/// Line strip in anchor-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineDesc {
    pub anchor: Anchor,
    pub points: Vec<[f32; 3]>,
    pub color: u32,
    pub opacity: f32,
    /// Text shown at the first point.
    pub label: Option<String>,
}

/// Point cloud in world space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointsDesc {
    /// Layer index; animated layers receive their parameters through the frame header.
    pub layer: u32,
    pub positions: Vec<[f32; 3]>,
    pub color: u32,
    /// Per-point colors; empty means every point uses `color`.
    pub colors: Vec<u32>,
    pub size: f32,
    pub opacity: f32,
    pub size_attenuation: bool,
    pub animated: bool,
}

/// Receiver of scene descriptions.
///
/// Implemented by the web bridge (records commands for JS) and by test
/// doubles. Calls are made in creation order; a node is always created before
/// anything anchored to it.
pub trait RenderBackend {
    fn create_body(&mut self, sphere: &SphereDesc);

    fn create_ring(&mut self, ring: &RingDesc);

    fn create_line(&mut self, line: &LineDesc);

    fn create_points(&mut self, points: &PointsDesc);

    /// Replace the surface texture of the sphere bound to `node`.
    fn set_texture(&mut self, node: EntityId, image: &TextureImage);
}

/// Backend that records every call. Used by tests and headless runs.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub bodies: Vec<SphereDesc>,
    pub rings: Vec<RingDesc>,
    pub lines: Vec<LineDesc>,
    pub points: Vec<PointsDesc>,
    pub textures: Vec<(EntityId, u32, u32)>,
}

impl RenderBackend for RecordingBackend {
    fn create_body(&mut self, sphere: &SphereDesc) {
        self.bodies.push(sphere.clone());
    }

    fn create_ring(&mut self, ring: &RingDesc) {
        self.rings.push(ring.clone());
    }

    fn create_line(&mut self, line: &LineDesc) {
        self.lines.push(line.clone());
    }

    fn create_points(&mut self, points: &PointsDesc) {
        self.points.push(points.clone());
    }

    fn set_texture(&mut self, node: EntityId, image: &TextureImage) {
        self.textures.push((node, image.width(), image.height()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::catalog::solar_system;

    fn body(name: &str) -> BodyDescriptor {
        solar_system().into_iter().find(|b| b.name == name).unwrap()
    }

    #[test]
    fn scale_color_per_channel() {
        assert_eq!(scale_color(0xffffff, 0.3), 0x4d4d4d);
        assert_eq!(scale_color(0x6b93d6, 0.0), 0);
        assert_eq!(scale_color(0x102030, 1.0), 0x102030);
    }

    #[test]
    fn sun_is_unlit() {
        let m = MaterialDesc::for_body(&body("Sun"));
        assert!(!m.lit);
        assert_eq!(m.emissive, m.color);
    }

    #[test]
    fn planets_glow_faintly_and_moons_do_not() {
        let earth = MaterialDesc::for_body(&body("Earth"));
        assert!(earth.lit);
        assert_eq!(earth.emissive, scale_color(earth.color, 0.3));
        assert_eq!(earth.emissive_intensity, 0.5);

        let moon = MaterialDesc::for_body(&body("Moon"));
        assert_eq!(moon.emissive, 0);
        assert_eq!(moon.roughness, 0.5);
        assert_eq!(moon.metalness, 0.2);
    }

    #[test]
    fn anchor_serializes_tagged() {
        let json = serde_json::to_string(&Anchor::Node(EntityId(4))).unwrap();
        assert_eq!(json, r#"{"space":"node","node":4}"#);
        let json = serde_json::to_string(&Anchor::World).unwrap();
        assert_eq!(json, r#"{"space":"world"}"#);
    }
}
