use serde::{Deserialize, Serialize};

use crate::error::OrreryError;
use crate::renderer::controls::ControlLimits;
use crate::textures::synth::{FALLBACK_SIZE, MAX_FALLBACK_SIZE};
use crate::ui::notices::NoticeTimings;

/// Viewer configuration. Every field has a default; the host may override
/// any subset as JSON at init.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Fixed timestep in seconds (default: 1/60). Orbit and spin rates are per step.
    pub fixed_dt: f32,
    /// Seconds to wait on one texture source before moving to the next.
    pub texture_timeout: f32,
    /// Edge length of synthesized textures in pixels.
    pub fallback_size: u32,
    /// Seed for star placement, moon orbit tilts and texture synthesis.
    pub seed: u64,
    pub debug_log_capacity: usize,
    pub toast_ms: u32,
    pub notification_ms: u32,
    /// Length of the opening camera flight in seconds; 0 skips it.
    pub intro_duration: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Camera follow smoothing while tracking (0 = rigid).
    pub tracking_smoothing: f32,
    pub controls: ControlLimits,
    /// Star count multiplier, 1.0 = full field.
    pub star_density: f32,
    /// Frame buffer capacities.
    pub max_instances: usize,
    pub max_events: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let timings = NoticeTimings::default();
        Self {
            fixed_dt: 1.0 / 60.0,
            texture_timeout: 10.0,
            fallback_size: FALLBACK_SIZE,
            seed: 0x5eed,
            debug_log_capacity: timings.debug_log_capacity,
            toast_ms: timings.toast_ms,
            notification_ms: timings.notification_ms,
            intro_duration: 8.0,
            fov_degrees: 75.0,
            near: 0.1,
            far: 20000.0,
            tracking_smoothing: 0.0,
            controls: ControlLimits::default(),
            star_density: 1.0,
            max_instances: 128,
            max_events: 64,
        }
    }
}

impl ViewerConfig {
    /// Parse host-supplied JSON. Blank input yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, OrreryError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_json::from_str(json)?;
        config.sanitize();
        Ok(config)
    }

    /// Replace nonsensical values with defaults.
    fn sanitize(&mut self) {
        let defaults = Self::default();
        if !(self.fixed_dt.is_finite() && self.fixed_dt > 0.0) {
            log::warn!("Invalid fixed_dt {}; using default", self.fixed_dt);
            self.fixed_dt = defaults.fixed_dt;
        }
        if !(self.texture_timeout.is_finite() && self.texture_timeout >= 0.0) {
            self.texture_timeout = defaults.texture_timeout;
        }
        if self.fallback_size == 0 || self.fallback_size > MAX_FALLBACK_SIZE {
            log::warn!(
                "fallback_size {} outside 1..={}; using default",
                self.fallback_size,
                MAX_FALLBACK_SIZE
            );
            self.fallback_size = defaults.fallback_size;
        }
        if !(self.near > 0.0 && self.far > self.near) {
            self.near = defaults.near;
            self.far = defaults.far;
        }
        if !self.intro_duration.is_finite() || self.intro_duration < 0.0 {
            self.intro_duration = defaults.intro_duration;
        }
    }

    pub fn notice_timings(&self) -> NoticeTimings {
        NoticeTimings {
            debug_log_capacity: self.debug_log_capacity,
            toast_ms: self.toast_ms,
            notification_ms: self.notification_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_json_is_default() {
        assert_eq!(ViewerConfig::from_json("  ").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = ViewerConfig::from_json(r#"{"texture_timeout": 2.5, "controls": {"min_distance": 5.0}}"#).unwrap();
        assert_eq!(config.texture_timeout, 2.5);
        assert_eq!(config.controls.min_distance, 5.0);
        assert_eq!(config.controls.max_distance, 10000.0);
        assert_eq!(config.intro_duration, 8.0);
    }

    #[test]
    fn oversized_fallback_is_rejected() {
        let config = ViewerConfig::from_json(r#"{"fallback_size": 70000}"#).unwrap();
        assert_eq!(config.fallback_size, FALLBACK_SIZE);
        let config = ViewerConfig::from_json(r#"{"fallback_size": 4096}"#).unwrap();
        assert_eq!(config.fallback_size, 4096);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = ViewerConfig::from_json(r#"{"fixed_dt": -1.0, "near": 10.0, "far": 1.0}"#).unwrap();
        assert_eq!(config.fixed_dt, 1.0 / 60.0);
        assert_eq!(config.near, 0.1);
        assert_eq!(config.far, 20000.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(ViewerConfig::from_json("{"), Err(OrreryError::Json(_))));
    }
}
