// extensions/easing.rs
//
// Easing curves for the opening camera flight.

use glam::Vec3;

/// Shape of an interpolation over normalized time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Fast start, long settle.
    CubicOut,
}

impl Easing {
    /// Map `t` (clamped to [0, 1]) through the curve.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

#[inline]
pub fn ease_vec3(a: Vec3, b: Vec3, t: f32, easing: Easing) -> Vec3 {
    a.lerp(b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_out_front_loads_motion() {
        let mid = Easing::CubicOut.apply(0.5);
        assert!((mid - 0.875).abs() < 1e-6, "CubicOut at 0.5 = {}", mid);
        assert_eq!(Easing::CubicOut.apply(1.0), 1.0);
        assert_eq!(Easing::Linear.apply(0.25), 0.25);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::CubicOut.apply(-3.0), 0.0);
        assert_eq!(Easing::Linear.apply(7.0), 1.0);
    }

    #[test]
    fn flight_endpoints() {
        let a = Vec3::new(0.0, 100.0, 300.0);
        let b = Vec3::new(0.0, 500.0, 1500.0);
        assert_eq!(ease_vec3(a, b, 0.0, Easing::CubicOut), a);
        assert!((ease_vec3(a, b, 1.0, Easing::CubicOut) - b).length() < 1e-3);
        assert!((ease(75.0, 80.0, 0.5, Easing::Linear) - 77.5).abs() < 1e-4);
    }
}
