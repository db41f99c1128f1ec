//! Builds the scene from the body registry.
//!
//! Every planet gets an orbit container under the scene root with the body at
//! its orbital distance. A moon's container hangs off its planet's container,
//! offset to the planet's position, so the moon travels with the planet while
//! revolving around it. Each body requests exactly one texture.

use glam::Vec3;

use crate::api::types::{EntityId, RequestId};
use crate::assets::catalog::BodyDescriptor;
use crate::assets::manifest::TextureManifest;
use crate::assets::registry::BodyRegistry;
use crate::core::rng::Rng;
use crate::core::scene::{SceneEntity, SolarScene};
use crate::error::OrreryError;
use crate::extensions::transform::LocalTransform;
use crate::renderer::traits::{Anchor, MaterialDesc, RenderBackend, RingDesc, SphereDesc};
use crate::systems::orbits::{distance_markers, indicator_orbit, moon_orbit_path, orbit_path};
use crate::systems::starfield::build_star_field;
use crate::textures::pipeline::{TextureFetcher, TexturePipeline};

pub const SPHERE_SEGMENTS: u32 = 32;

pub const RING_COLOR: u32 = 0xf8e9c9;
pub const RING_OPACITY: f32 = 0.8;
/// Ring extent beyond the body surface.
pub const RING_INNER_GAP: f32 = 3.0;
pub const RING_OUTER_GAP: f32 = 8.0;

pub const INDICATOR_COLOR: u32 = 0xffff00;
/// Indicator spin per fixed step, radians.
pub const INDICATOR_SPIN: f32 = 0.03;

/// Largest random inclination of a moon orbit path, radians.
const MAX_MOON_TILT: f32 = 0.3;

/// What composition produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposeReport {
    pub bodies: Vec<EntityId>,
    pub requests: Vec<RequestId>,
}

pub struct SceneComposer<'a> {
    pub registry: &'a BodyRegistry,
    pub manifest: &'a TextureManifest,
    /// Star count multiplier, 1.0 = full field.
    pub star_density: f32,
}

impl<'a> SceneComposer<'a> {
    pub fn new(registry: &'a BodyRegistry, manifest: &'a TextureManifest) -> Self {
        Self {
            registry,
            manifest,
            star_density: 1.0,
        }
    }

    pub fn with_star_density(mut self, density: f32) -> Self {
        self.star_density = density;
        self
    }

    /// Populate `scene`, describe every renderable to `backend` and start one
    /// texture request per body.
    pub fn compose(
        &self,
        scene: &mut SolarScene,
        pipeline: &mut TexturePipeline,
        backend: &mut dyn RenderBackend,
        fetcher: &mut dyn TextureFetcher,
        rng: &mut Rng,
    ) -> Result<ComposeReport, OrreryError> {
        for layer in build_star_field(self.star_density, rng) {
            backend.create_points(&layer);
        }
        for marker in distance_markers() {
            backend.create_line(&marker);
        }

        let mut report = ComposeReport::default();
        for desc in self.registry.iter() {
            let body = match &desc.parent {
                None => self.place_planet(desc, scene, backend)?,
                Some(parent) => self.place_moon(desc, parent, scene, backend, rng)?,
            };

            let candidates = self.manifest.candidates(&desc.name);
            let request = pipeline.acquire(&desc.name, candidates, fetcher);
            if let Some(entity) = scene.entity_mut(body) {
                entity.texture_request = Some(request);
            }
            report.bodies.push(body);
            report.requests.push(request);
        }
        log::info!(
            "Composed {} bodies, {} published nodes",
            report.bodies.len(),
            scene.published_count()
        );
        Ok(report)
    }

    fn place_planet(
        &self,
        desc: &BodyDescriptor,
        scene: &mut SolarScene,
        backend: &mut dyn RenderBackend,
    ) -> Result<EntityId, OrreryError> {
        let container = scene.add_node(None, LocalTransform::new())?;
        let body = scene.add_node(
            Some(container),
            LocalTransform::new().with_translation(Vec3::X * desc.orbital_distance),
        )?;
        scene.add_entity(SceneEntity::new(body, container, desc.clone()))?;
        backend.create_body(&sphere_for(body, desc));

        if desc.orbital_distance > 0.0 {
            backend.create_line(&orbit_path(desc.orbital_distance));
        }
        if desc.has_rings {
            backend.create_ring(&RingDesc {
                anchor: Anchor::Node(body),
                inner_radius: desc.radius + RING_INNER_GAP,
                outer_radius: desc.radius + RING_OUTER_GAP,
                segments: 64,
                color: RING_COLOR,
                opacity: RING_OPACITY,
            });
        }
        if desc.is_dwarf {
            self.place_dwarf_indicator(desc, body, scene, backend)?;
        }
        Ok(body)
    }

    /// Small sphere circling a dwarf planet at twice its radius.
    fn place_dwarf_indicator(
        &self,
        desc: &BodyDescriptor,
        body: EntityId,
        scene: &mut SolarScene,
        backend: &mut dyn RenderBackend,
    ) -> Result<(), OrreryError> {
        let orbit = desc.radius * 2.0;
        let radius = desc.radius * 0.2;
        let pivot = scene.add_node(Some(body), LocalTransform::new())?;
        scene.add_spinner(pivot, INDICATOR_SPIN);
        let indicator = scene.add_node(Some(pivot), LocalTransform::new().with_translation(Vec3::X * orbit))?;
        scene.publish(indicator, radius);

        backend.create_body(&SphereDesc {
            node: indicator,
            name: format!("{} indicator", desc.name),
            radius,
            segments: 16,
            material: MaterialDesc::flat(INDICATOR_COLOR, 0.8),
            wireframe_overlay: false,
            label: Some("Dwarf Planet".to_string()),
        });
        backend.create_line(&indicator_orbit(body, orbit));
        Ok(())
    }

    fn place_moon(
        &self,
        desc: &BodyDescriptor,
        parent: &str,
        scene: &mut SolarScene,
        backend: &mut dyn RenderBackend,
        rng: &mut Rng,
    ) -> Result<EntityId, OrreryError> {
        let (parent_id, parent_container, parent_distance, parent_radius) = {
            let p = scene
                .entity_by_name(parent)
                .ok_or_else(|| OrreryError::Registry(format!("Parent planet {} not found for moon {}", parent, desc.name)))?;
            (p.id, p.container, p.descriptor.orbital_distance, p.radius())
        };

        let container = scene.add_node(
            Some(parent_container),
            LocalTransform::new().with_translation(Vec3::X * parent_distance),
        )?;
        let orbit = desc.orbit_radius(Some(parent_radius));
        let body = scene.add_node(Some(container), LocalTransform::new().with_translation(Vec3::X * orbit))?;
        scene.publish(container, 0.0);
        scene.add_entity(SceneEntity::new(body, container, desc.clone()).with_parent(parent_id))?;

        backend.create_body(&sphere_for(body, desc));
        backend.create_line(&moon_orbit_path(container, orbit, rng.range(0.0, MAX_MOON_TILT)));
        Ok(body)
    }
}

fn sphere_for(node: EntityId, desc: &BodyDescriptor) -> SphereDesc {
    let is_planet = !desc.is_emissive && !desc.is_moon();
    SphereDesc {
        node,
        name: desc.name.clone(),
        radius: desc.radius,
        segments: SPHERE_SEGMENTS,
        material: MaterialDesc::for_body(desc),
        wireframe_overlay: is_planet,
        label: (!desc.is_emissive).then(|| desc.name.clone()),
    }
}
