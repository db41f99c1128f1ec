// navigation/intro.rs
//
// Opening camera flight: pull back from near the inner planets to the
// default overview while widening the field of view and yawing the system.

use glam::Vec3;

use crate::extensions::easing::{ease, ease_vec3, Easing};

pub const INTRO_START: Vec3 = Vec3::new(0.0, 100.0, 300.0);
pub const INTRO_END: Vec3 = Vec3::new(0.0, 500.0, 1500.0);

/// Camera parameters for one moment of the flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntroPose {
    pub position: Vec3,
    pub fov_degrees: f32,
    /// Yaw of the whole system, radians.
    pub scene_yaw: f32,
    /// True on the frame the flight completes.
    pub just_finished: bool,
}

#[derive(Debug, Clone)]
pub struct IntroFlight {
    pub from: Vec3,
    pub to: Vec3,
    pub fov_from: f32,
    pub fov_to: f32,
    pub yaw_to: f32,
    pub duration: f32,
    pub easing: Easing,
    elapsed: f32,
    finished: bool,
}

impl IntroFlight {
    pub fn new(duration: f32, base_fov: f32) -> Self {
        Self {
            from: INTRO_START,
            to: INTRO_END,
            fov_from: base_fov,
            fov_to: base_fov + 5.0,
            yaw_to: 0.2,
            duration: duration.max(0.0),
            easing: Easing::CubicOut,
            elapsed: 0.0,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fraction of the flight completed, in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).min(1.0)
    }

    fn pose(&self, just_finished: bool) -> IntroPose {
        let t = self.progress();
        IntroPose {
            position: ease_vec3(self.from, self.to, t, self.easing),
            fov_degrees: ease(self.fov_from, self.fov_to, t, self.easing),
            scene_yaw: ease(0.0, self.yaw_to, t, self.easing),
            just_finished,
        }
    }

    /// Pose before any time has passed.
    pub fn start_pose(&self) -> IntroPose {
        IntroPose {
            position: self.from,
            fov_degrees: self.fov_from,
            scene_yaw: 0.0,
            just_finished: false,
        }
    }

    /// Advance the flight. Returns `None` once it has finished.
    pub fn advance(&mut self, dt: f32) -> Option<IntroPose> {
        if self.finished {
            return None;
        }
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        let done = self.progress() >= 1.0;
        self.finished = done;
        Some(self.pose(done))
    }

    /// Jump to the end. Returns the final pose if the flight was still running.
    pub fn finish(&mut self) -> Option<IntroPose> {
        if self.finished {
            return None;
        }
        self.elapsed = self.duration;
        self.finished = true;
        Some(self.pose(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flight_reaches_overview_after_duration() {
        let mut intro = IntroFlight::new(8.0, 75.0);
        let mut last = intro.start_pose();
        for _ in 0..(8 * 60) {
            if let Some(pose) = intro.advance(1.0 / 60.0) {
                last = pose;
            }
        }
        // Accumulated float steps may land a hair short of 8 s.
        if let Some(pose) = intro.advance(1.0 / 60.0) {
            last = pose;
        }
        assert!(intro.is_finished());
        assert!(last.just_finished);
        assert!((last.position - INTRO_END).length() < 1e-3);
        assert!((last.fov_degrees - 80.0).abs() < 1e-4);
        assert!((last.scene_yaw - 0.2).abs() < 1e-6);
        assert!(intro.advance(1.0).is_none());
    }

    #[test]
    fn ease_out_front_loads_the_flight() {
        let mut intro = IntroFlight::new(8.0, 75.0);
        let pose = intro.advance(4.0).unwrap();
        // CubicOut at 0.5 = 0.875
        assert!((pose.position.z - (300.0 + 0.875 * 1200.0)).abs() < 1e-2);
        assert!(!pose.just_finished);
    }

    #[test]
    fn finish_jumps_to_the_end() {
        let mut intro = IntroFlight::new(8.0, 75.0);
        intro.advance(0.5);
        let pose = intro.finish().unwrap();
        assert_eq!(pose.position, INTRO_END);
        assert!(intro.finish().is_none());
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let mut intro = IntroFlight::new(0.0, 75.0);
        let pose = intro.advance(0.0).unwrap();
        assert!(pose.just_finished);
        assert_eq!(pose.position, INTRO_END);
    }
}
