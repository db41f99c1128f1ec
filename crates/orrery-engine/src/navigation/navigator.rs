// navigation/navigator.rs
//
// Camera navigation state machine: free orbiting, or tracking one body.
// While tracking, the camera sits at a fixed offset from the body's live
// world position and looks at it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::types::EntityId;
use crate::core::scene::{SceneEntity, SolarScene};
use crate::error::OrreryError;
use crate::renderer::camera::Camera3D;
use crate::ui::notices::Notice;

/// Named camera placements. All look at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPreset {
    Default,
    Overview,
    Top,
    Sun,
}

impl ViewPreset {
    pub const ALL: [ViewPreset; 4] = [ViewPreset::Default, ViewPreset::Overview, ViewPreset::Top, ViewPreset::Sun];

    pub fn position(self) -> Vec3 {
        match self {
            ViewPreset::Default => Vec3::new(0.0, 500.0, 1500.0),
            ViewPreset::Overview => Vec3::new(0.0, 3000.0, 6000.0),
            // Slightly off the pole so look-at keeps a defined up vector.
            ViewPreset::Top => Vec3::new(0.0, 5000.0, 0.01),
            ViewPreset::Sun => Vec3::new(100.0, 50.0, 100.0),
        }
    }

    pub fn index(self) -> u32 {
        match self {
            ViewPreset::Default => 0,
            ViewPreset::Overview => 1,
            ViewPreset::Top => 2,
            ViewPreset::Sun => 3,
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "default" | "reset" => Some(ViewPreset::Default),
            "overview" => Some(ViewPreset::Overview),
            "top" => Some(ViewPreset::Top),
            "sun" => Some(ViewPreset::Sun),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    Free,
    Tracking(EntityId),
}

/// Result of a successful focus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusOutcome {
    pub entity: EntityId,
    /// Planet whose moon list the UI should show: the body itself, or a moon's parent.
    pub panel: EntityId,
    pub target: Vec3,
    pub distance: f32,
}

/// Viewing distance for a tracked body.
pub fn viewing_distance(entity: &SceneEntity) -> f32 {
    if entity.is_sun() {
        100.0
    } else {
        (entity.radius() * 10.0).max(30.0)
    }
}

/// Camera offset from a tracked body at viewing distance `d`.
pub fn tracking_offset(d: f32) -> Vec3 {
    Vec3::new(d, d * 0.3, d * 0.3)
}

#[derive(Debug, Default)]
pub struct CameraNavigator {
    state: NavState,
    notices: Vec<Notice>,
}

impl CameraNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, NavState::Tracking(_))
    }

    pub fn target(&self) -> Option<EntityId> {
        match self.state {
            NavState::Tracking(id) => Some(id),
            NavState::Free => None,
        }
    }

    /// Start tracking `name` and place the camera at once.
    /// Unknown names leave the state unchanged.
    pub fn focus(&mut self, name: &str, scene: &SolarScene, camera: &mut Camera3D) -> Result<FocusOutcome, OrreryError> {
        self.debug(format!("Focusing on planet: {}", name));
        let Some(entity) = scene.entity_by_name(name) else {
            self.debug(format!("Planet not found: {}", name));
            log::debug!("focus: unknown body {:?}", name);
            return Err(OrreryError::UnknownBody(name.to_string()));
        };
        let target = scene.world_position(entity.id)?;
        let distance = viewing_distance(entity);
        camera.place(target + tracking_offset(distance), target);

        self.state = NavState::Tracking(entity.id);
        self.debug(format!("Now tracking: {}", entity.name()));
        self.debug(format!(
            "Target position: {:.2}, {:.2}, {:.2}",
            target.x, target.y, target.z
        ));
        Ok(FocusOutcome {
            entity: entity.id,
            panel: entity.parent.unwrap_or(entity.id),
            target,
            distance,
        })
    }

    /// Return to free mode, leaving the camera where it is.
    /// Returns whether a body was being tracked.
    pub fn stop_tracking(&mut self) -> bool {
        let was_tracking = self.is_tracking();
        self.state = NavState::Free;
        if was_tracking {
            self.debug("Planet tracking manually stopped".to_string());
        }
        was_tracking
    }

    pub fn apply_preset(&mut self, preset: ViewPreset, camera: &mut Camera3D) {
        self.state = NavState::Free;
        camera.place(preset.position(), Vec3::ZERO);
        self.debug(format!("View preset: {:?}", preset));
    }

    pub fn reset_view(&mut self, camera: &mut Camera3D) {
        self.apply_preset(ViewPreset::Default, camera);
    }

    pub fn overview(&mut self, camera: &mut Camera3D) {
        self.apply_preset(ViewPreset::Overview, camera);
    }

    /// Follow the tracked body. Returns `true` when tracking had to be
    /// dropped because the target could not be resolved.
    pub fn update(&mut self, scene: &SolarScene, camera: &mut Camera3D, dt: f32) -> bool {
        let NavState::Tracking(id) = self.state else {
            return false;
        };
        let resolved = scene
            .entity(id)
            .ok_or(OrreryError::UnknownNode(id))
            .and_then(|entity| Ok((scene.world_position(id)?, viewing_distance(entity))));
        match resolved {
            Ok((target, distance)) => {
                camera.follow(target + tracking_offset(distance), target, dt);
                false
            }
            Err(e) => {
                log::warn!("Tracking dropped: {}", e);
                self.state = NavState::Free;
                self.debug(format!("Planet tracking stopped: {}", e));
                true
            }
        }
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn debug(&mut self, text: String) {
        self.notices.push(Notice::Debug(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::catalog::solar_system;
    use crate::extensions::transform::LocalTransform;

    fn scene_with(names: &[&str]) -> SolarScene {
        let mut scene = SolarScene::new();
        let all = solar_system();
        let mut ids = std::collections::HashMap::new();
        for name in names {
            let desc = all.iter().find(|b| b.name == *name).unwrap().clone();
            match desc.parent.clone() {
                None => {
                    let container = scene.add_node(None, LocalTransform::new()).unwrap();
                    let body = scene
                        .add_node(Some(container), LocalTransform::new().with_translation(Vec3::X * desc.orbital_distance))
                        .unwrap();
                    ids.insert(desc.name.clone(), (body, container, desc.orbital_distance, desc.radius));
                    scene.add_entity(SceneEntity::new(body, container, desc)).unwrap();
                }
                Some(parent) => {
                    let (parent_body, parent_container, parent_distance, parent_radius) = ids[&parent];
                    let container = scene
                        .add_node(Some(parent_container), LocalTransform::new().with_translation(Vec3::X * parent_distance))
                        .unwrap();
                    let body = scene
                        .add_node(Some(container), LocalTransform::new().with_translation(Vec3::X * desc.orbital_distance * parent_radius))
                        .unwrap();
                    scene
                        .add_entity(SceneEntity::new(body, container, desc).with_parent(parent_body))
                        .unwrap();
                }
            }
        }
        scene
    }

    fn camera() -> Camera3D {
        let mut cam = Camera3D::new(75.0, 1.0, 0.1, 20000.0);
        cam.place(ViewPreset::Default.position(), Vec3::ZERO);
        cam
    }

    #[test]
    fn tracking_keeps_fixed_offset_over_many_frames() {
        let mut scene = scene_with(&["Sun", "Earth"]);
        let mut cam = camera();
        let mut nav = CameraNavigator::new();
        let outcome = nav.focus("earth", &scene, &mut cam).unwrap();
        assert_eq!(outcome.distance, 30.0);

        for _ in 0..150 {
            scene.animate_step();
            nav.update(&scene, &mut cam, 1.0 / 60.0);
            let earth = scene.world_position(outcome.entity).unwrap();
            assert!((cam.position - (earth + Vec3::new(30.0, 9.0, 9.0))).length() < 1e-3);
            assert!((cam.target - earth).length() < 1e-3);
        }

        assert!(nav.stop_tracking());
        let parked = cam.position;
        for _ in 0..20 {
            scene.animate_step();
            nav.update(&scene, &mut cam, 1.0 / 60.0);
        }
        assert_eq!(cam.position, parked);
        assert_eq!(nav.state(), NavState::Free);
    }

    #[test]
    fn sun_uses_fixed_distance() {
        let scene = scene_with(&["Sun"]);
        let mut cam = camera();
        let mut nav = CameraNavigator::new();
        let outcome = nav.focus("Sun", &scene, &mut cam).unwrap();
        assert_eq!(outcome.distance, 100.0);
        assert!((cam.position - Vec3::new(100.0, 30.0, 30.0)).length() < 1e-4);
        assert_eq!(cam.target, Vec3::ZERO);
    }

    #[test]
    fn unknown_body_leaves_state_unchanged() {
        let scene = scene_with(&["Sun", "Earth"]);
        let mut cam = camera();
        let mut nav = CameraNavigator::new();
        nav.focus("Earth", &scene, &mut cam).unwrap();
        let before = cam.clone();

        let err = nav.focus("Vulcan", &scene, &mut cam).unwrap_err();
        assert!(matches!(err, OrreryError::UnknownBody(ref n) if n == "Vulcan"));
        assert!(nav.is_tracking());
        assert_eq!(cam, before);
        assert!(nav
            .take_notices()
            .iter()
            .any(|n| n.text() == "Planet not found: Vulcan"));
    }

    #[test]
    fn moons_open_their_parent_panel() {
        let scene = scene_with(&["Sun", "Earth", "Moon"]);
        let mut cam = camera();
        let mut nav = CameraNavigator::new();
        let earth = scene.entity_by_name("Earth").unwrap().id;
        let outcome = nav.focus("Moon", &scene, &mut cam).unwrap();
        assert_eq!(outcome.panel, earth);
        let planet = nav.focus("Earth", &scene, &mut cam).unwrap();
        assert_eq!(planet.panel, earth);
    }

    #[test]
    fn moon_follows_its_planet() {
        let mut scene = scene_with(&["Sun", "Earth", "Moon"]);
        let earth = scene.entity_by_name("Earth").unwrap().id;
        let moon = scene.entity_by_name("Moon").unwrap().id;
        for _ in 0..300 {
            scene.animate_step();
        }
        let gap = scene.world_position(moon).unwrap() - scene.world_position(earth).unwrap();
        assert!((gap.length() - 6.0).abs() < 1e-2, "gap {}", gap.length());
    }

    #[test]
    fn presets_free_the_camera() {
        let scene = scene_with(&["Sun", "Earth"]);
        let mut cam = camera();
        let mut nav = CameraNavigator::new();
        nav.focus("Earth", &scene, &mut cam).unwrap();
        nav.overview(&mut cam);
        assert_eq!(nav.state(), NavState::Free);
        assert_eq!(cam.position, Vec3::new(0.0, 3000.0, 6000.0));
        assert_eq!(cam.target, Vec3::ZERO);
        nav.reset_view(&mut cam);
        assert_eq!(cam.position, Vec3::new(0.0, 500.0, 1500.0));
        assert_eq!(ViewPreset::from_name("TOP"), Some(ViewPreset::Top));
        assert_eq!(ViewPreset::from_index(3), Some(ViewPreset::Sun));
        assert_eq!(ViewPreset::from_index(4), None);
    }

    #[test]
    fn lost_target_drops_to_free() {
        let mut scene = scene_with(&["Sun", "Earth"]);
        let mut cam = camera();
        let mut nav = CameraNavigator::new();
        let outcome = nav.focus("Earth", &scene, &mut cam).unwrap();
        scene.graph_mut().remove(outcome.entity);
        assert!(nav.update(&scene, &mut cam, 0.016));
        assert_eq!(nav.state(), NavState::Free);
        assert!(!nav.update(&scene, &mut cam, 0.016));
    }
}
