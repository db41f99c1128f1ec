// renderer/controls.rs
//
// Drag-to-orbit and wheel-dolly around the camera target, with damping.
// Pointer coordinates are CSS pixels; one viewport height of drag is a full turn.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::camera::Camera3D;

/// Keeps the polar angle away from the poles so look-at never degenerates.
const POLE_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlLimits {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Fraction of the pending rotation applied per update.
    pub damping: f32,
    pub rotate_speed: f32,
    /// Distance multiplier per wheel notch toward the target.
    pub zoom_scale: f32,
}

impl Default for ControlLimits {
    fn default() -> Self {
        Self {
            min_distance: 20.0,
            max_distance: 10000.0,
            damping: 0.05,
            rotate_speed: 1.0,
            zoom_scale: 0.95,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub limits: ControlLimits,
    enabled: bool,
    /// Pending (theta, phi) rotation, drained by `update` through damping.
    rotate_delta: Vec2,
    /// Pending distance multiplier, consumed by the next `update`.
    scale: f32,
    /// Last pointer position while a drag is active.
    drag_from: Option<Vec2>,
    viewport_height: f32,
}

impl OrbitControls {
    pub fn new(limits: ControlLimits) -> Self {
        Self {
            limits,
            enabled: true,
            rotate_delta: Vec2::ZERO,
            scale: 1.0,
            drag_from: None,
            viewport_height: 1.0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling drops any pending motion and an active drag.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.rotate_delta = Vec2::ZERO;
            self.scale = 1.0;
            self.drag_from = None;
        }
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        if height > 0.0 {
            self.viewport_height = height;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    pub fn pointer_down(&mut self, at: Vec2) {
        if self.enabled {
            self.drag_from = Some(at);
        }
    }

    pub fn pointer_move(&mut self, at: Vec2) {
        if !self.enabled {
            return;
        }
        if let Some(from) = self.drag_from {
            let delta = at - from;
            let per_pixel = TAU * self.limits.rotate_speed / self.viewport_height;
            self.rotate_delta.x -= delta.x * per_pixel;
            self.rotate_delta.y -= delta.y * per_pixel;
            self.drag_from = Some(at);
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag_from = None;
    }

    /// Negative `delta_y` (wheel up) dollies in.
    pub fn wheel(&mut self, delta_y: f32) {
        if !self.enabled || delta_y == 0.0 || !delta_y.is_finite() {
            return;
        }
        if delta_y < 0.0 {
            self.scale *= self.limits.zoom_scale;
        } else {
            self.scale /= self.limits.zoom_scale;
        }
    }

    /// Apply pending motion to the camera. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut Camera3D) -> bool {
        if !self.enabled {
            return false;
        }
        if self.rotate_delta.length_squared() < 1e-12 && self.scale == 1.0 {
            self.rotate_delta = Vec2::ZERO;
            return false;
        }
        let offset = camera.offset();
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return false;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta += self.rotate_delta.x * self.limits.damping;
        phi += self.rotate_delta.y * self.limits.damping;
        phi = phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);

        let new_radius = (radius * self.scale).clamp(self.limits.min_distance, self.limits.max_distance);

        let sin_phi = phi.sin();
        let new_offset = Vec3::new(
            new_radius * sin_phi * theta.sin(),
            new_radius * phi.cos(),
            new_radius * sin_phi * theta.cos(),
        );

        self.rotate_delta *= 1.0 - self.limits.damping;
        self.scale = 1.0;

        camera.position = camera.target + new_offset;
        true
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(ControlLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(position: Vec3) -> Camera3D {
        let mut cam = Camera3D::new(75.0, 1.0, 0.1, 20000.0);
        cam.place(position, Vec3::ZERO);
        cam
    }

    #[test]
    fn wheel_up_dollies_in() {
        let mut controls = OrbitControls::default();
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 1000.0));
        controls.wheel(-100.0);
        controls.update(&mut cam);
        assert!((cam.distance() - 950.0).abs() < 1e-2);
    }

    #[test]
    fn distance_is_clamped() {
        let mut controls = OrbitControls::default();
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 21.0));
        for _ in 0..50 {
            controls.wheel(-1.0);
        }
        controls.update(&mut cam);
        assert!((cam.distance() - 20.0).abs() < 1e-3);

        for _ in 0..500 {
            controls.wheel(1.0);
        }
        controls.update(&mut cam);
        assert!((cam.distance() - 10000.0).abs() < 1e-1);
    }

    #[test]
    fn drag_rotates_with_damping() {
        let mut controls = OrbitControls::default();
        controls.set_viewport_height(800.0);
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 500.0));

        controls.pointer_down(Vec2::new(400.0, 400.0));
        controls.pointer_move(Vec2::new(600.0, 400.0));
        controls.pointer_up();

        let first = cam.position;
        controls.update(&mut cam);
        let after_one = cam.position;
        assert_ne!(first, after_one);
        for _ in 0..600 {
            controls.update(&mut cam);
        }
        // Damped rotation keeps the radius.
        assert!((cam.distance() - 500.0).abs() < 1e-2);
        assert!(!controls.update(&mut cam));
    }

    #[test]
    fn polar_angle_stays_off_the_pole() {
        let mut controls = OrbitControls::new(ControlLimits { damping: 1.0, ..ControlLimits::default() });
        controls.set_viewport_height(100.0);
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 500.0));
        controls.pointer_down(Vec2::ZERO);
        controls.pointer_move(Vec2::new(0.0, 1000.0));
        controls.update(&mut cam);
        assert!(cam.position.is_finite());
        assert!(cam.offset().y > 499.0);
        assert!((cam.distance() - 500.0).abs() < 1e-2);
    }

    #[test]
    fn disabled_controls_discard_input() {
        let mut controls = OrbitControls::default();
        let mut cam = camera_at(Vec3::new(0.0, 0.0, 500.0));
        controls.set_enabled(false);
        controls.wheel(-1.0);
        controls.pointer_down(Vec2::ZERO);
        controls.pointer_move(Vec2::new(50.0, 50.0));
        assert!(!controls.update(&mut cam));

        controls.set_enabled(true);
        assert!(!controls.is_dragging());
        controls.update(&mut cam);
        assert!((cam.distance() - 500.0).abs() < 1e-3);
    }
}
