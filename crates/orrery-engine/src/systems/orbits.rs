// systems/orbits.rs
//
// Line geometry for orbit paths, the dwarf-planet indicator ring and the
// distance markers. Circles lie in the XZ plane unless tilted.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};

use crate::api::types::EntityId;
use crate::assets::catalog::AU;
use crate::renderer::traits::{Anchor, LineDesc};

pub const ORBIT_SEGMENTS: u32 = 100;
pub const ORBIT_COLOR: u32 = 0x666666;
pub const ORBIT_OPACITY: f32 = 0.5;

pub const MARKER_SEGMENTS: u32 = 128;
pub const MARKER_COLOR: u32 = 0x333333;
pub const MARKER_OPACITY: f32 = 0.3;

pub const INDICATOR_SEGMENTS: u32 = 50;
pub const INDICATOR_COLOR: u32 = 0xffff00;

/// Closed circle of `segments + 1` points in the XZ plane; the last point repeats the first.
pub fn circle_points(radius: f32, segments: u32) -> Vec<[f32; 3]> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let angle = TAU * (i % segments) as f32 / segments as f32;
            [radius * angle.cos(), 0.0, radius * angle.sin()]
        })
        .collect()
}

/// Circle inclined by `tilt` radians about the X axis.
pub fn tilted_circle_points(radius: f32, segments: u32, tilt: f32) -> Vec<[f32; 3]> {
    let rotation = Quat::from_rotation_x(tilt);
    circle_points(radius, segments)
        .into_iter()
        .map(|p| (rotation * Vec3::from(p)).to_array())
        .collect()
}

/// Heliocentric orbit of a planet.
pub fn orbit_path(radius: f32) -> LineDesc {
    LineDesc {
        anchor: Anchor::World,
        points: circle_points(radius, ORBIT_SEGMENTS),
        color: ORBIT_COLOR,
        opacity: ORBIT_OPACITY,
        label: None,
    }
}

/// Orbit of a moon around its parent, drawn in the moon's orbit container.
pub fn moon_orbit_path(container: EntityId, radius: f32, tilt: f32) -> LineDesc {
    LineDesc {
        anchor: Anchor::Node(container),
        points: tilted_circle_points(radius, ORBIT_SEGMENTS, tilt),
        color: ORBIT_COLOR,
        opacity: ORBIT_OPACITY,
        label: None,
    }
}

/// Ring traced by the dwarf-planet indicator around its body.
pub fn indicator_orbit(body: EntityId, radius: f32) -> LineDesc {
    LineDesc {
        anchor: Anchor::Node(body),
        points: circle_points(radius, INDICATOR_SEGMENTS),
        color: INDICATOR_COLOR,
        opacity: 0.4,
        label: None,
    }
}

/// 1..=4 AU, then every 5 AU out to 40.
pub fn marker_distances() -> Vec<u32> {
    let mut out = Vec::new();
    let mut au = 1;
    while au <= 40 {
        out.push(au);
        au += if au < 5 { 1 } else { 5 };
    }
    out
}

/// Faint reference circles labelled "N AU".
pub fn distance_markers() -> Vec<LineDesc> {
    marker_distances()
        .into_iter()
        .map(|au| LineDesc {
            anchor: Anchor::World,
            points: circle_points(au as f32 * AU, MARKER_SEGMENTS),
            color: MARKER_COLOR,
            opacity: MARKER_OPACITY,
            label: Some(format!("{} AU", au)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_is_closed_and_flat() {
        let pts = circle_points(150.0, ORBIT_SEGMENTS);
        assert_eq!(pts.len(), 101);
        assert_eq!(pts.first(), pts.last());
        for p in &pts {
            assert_eq!(p[1], 0.0);
            let r = (p[0] * p[0] + p[2] * p[2]).sqrt();
            assert!((r - 150.0).abs() < 1e-3);
        }
    }

    #[test]
    fn tilt_lifts_points_off_the_plane() {
        let pts = tilted_circle_points(10.0, 40, 0.3);
        assert!(pts.iter().any(|p| p[1].abs() > 1.0));
        for p in &pts {
            let r = Vec3::from(*p).length();
            assert!((r - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn marker_sequence() {
        assert_eq!(marker_distances(), vec![1, 2, 3, 4, 5, 10, 15, 20, 25, 30, 35, 40]);
        let markers = distance_markers();
        assert_eq!(markers.len(), 12);
        assert_eq!(markers[5].label.as_deref(), Some("10 AU"));
        assert!((markers[5].points[0][0] - 1500.0).abs() < 1e-3);
        assert_eq!(markers[0].points.len(), MARKER_SEGMENTS as usize + 1);
    }

    #[test]
    fn moon_orbits_follow_their_container() {
        let line = moon_orbit_path(EntityId(12), 6.0, 0.1);
        assert_eq!(line.anchor, Anchor::Node(EntityId(12)));
        assert_eq!(line.color, ORBIT_COLOR);
    }
}
