use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Perspective camera looking at a target point.
/// Produces view and projection matrices for the host renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera3D {
    /// Eye position in world space.
    pub position: Vec3,
    /// Look-at point in world space.
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Viewport width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Smoothing factor for camera follow (0.0 = instant, 1.0 = never moves).
    pub smoothing: f32,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
    /// Eye position, w = 1.
    pub eye: [f32; 4],
}

impl Camera3D {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees,
            aspect,
            near,
            far,
            smoothing: 0.0,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Right-handed perspective projection, depth in [0, 1].
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_projection: self.view_projection().to_cols_array_2d(),
            eye: self.position.extend(1.0).to_array(),
        }
    }

    /// Resize the viewport. Zero-height viewports keep the previous aspect.
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        if viewport_height > 0.0 && viewport_width > 0.0 {
            self.aspect = viewport_width / viewport_height;
        }
    }

    /// Set smoothing factor for camera movement.
    /// 0.0 = instant snap, 0.9 = very smooth/slow.
    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, 0.99);
    }

    /// Place the camera directly.
    pub fn place(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
    }

    /// Move toward `position` while looking at `target`.
    /// Call this each frame with the tracked point.
    pub fn follow(&mut self, position: Vec3, target: Vec3, dt: f32) {
        if self.smoothing <= 0.0 {
            self.place(position, target);
        } else {
            let lerp_factor = 1.0 - self.smoothing.powf(dt * 60.0);
            self.position += (position - self.position) * lerp_factor;
            self.target = target;
        }
    }

    /// Eye position relative to the target.
    pub fn offset(&self) -> Vec3 {
        self.position - self.target
    }

    pub fn distance(&self) -> f32 {
        self.offset().length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera3D {
        Camera3D::new(75.0, 16.0 / 9.0, 0.1, 20000.0)
    }

    #[test]
    fn view_matrix_maps_target_onto_negative_z() {
        let mut cam = camera();
        cam.place(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let p = cam.view_matrix().transform_point3(Vec3::ZERO);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        assert!((p.z + 10.0).abs() < 1e-4);
    }

    #[test]
    fn projection_keeps_target_in_clip_range() {
        let mut cam = camera();
        cam.place(Vec3::new(0.0, 500.0, 1500.0), Vec3::ZERO);
        let clip = cam.view_projection().project_point3(Vec3::ZERO);
        assert!(clip.x.abs() < 1e-4 && clip.y.abs() < 1e-4);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut cam = camera();
        cam.resize(1920.0, 1080.0);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        cam.resize(800.0, 0.0);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn follow_with_no_smoothing_snaps() {
        let mut cam = camera();
        cam.follow(Vec3::new(30.0, 9.0, 9.0), Vec3::ZERO, 0.016);
        assert_eq!(cam.position, Vec3::new(30.0, 9.0, 9.0));
        assert_eq!(cam.offset(), Vec3::new(30.0, 9.0, 9.0));
    }

    #[test]
    fn follow_with_smoothing_interpolates() {
        let mut cam = camera();
        cam.set_smoothing(0.9);
        cam.follow(Vec3::new(100.0, 100.0, 100.0), Vec3::X, 0.016);
        assert!(cam.position.x > 0.0 && cam.position.x < 100.0);
        assert_eq!(cam.target, Vec3::X);
    }

    #[test]
    fn uniform_carries_eye() {
        let mut cam = camera();
        cam.place(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO);
        assert_eq!(cam.uniform().eye, [1.0, 2.0, 3.0, 1.0]);
    }
}
