//! Built-in solar system data.
//!
//! Planet radii are Earth radii scaled by [`EARTH_RADIUS`]; planet distances
//! are scene units from the sun (1 AU = [`AU`]). Moon distances are in parent
//! radii. Rates are radians per fixed step.

use serde::{Deserialize, Serialize};

/// Scene units per astronomical unit.
pub const AU: f32 = 150.0;
/// Scene radius of Earth; other bodies scale from it.
pub const EARTH_RADIUS: f32 = 3.0;
pub const SUN_RADIUS: f32 = 30.0;

/// Immutable description of one body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDescriptor {
    pub name: String,
    pub radius: f32,
    /// Scene units from the sun for planets, parent radii for moons.
    pub orbital_distance: f32,
    /// Spin per step, radians.
    pub rotation_rate: f32,
    /// Revolution per step, radians.
    pub orbit_rate: f32,
    /// 0xRRGGBB material tint.
    pub color: u32,
    #[serde(default)]
    pub is_emissive: bool,
    #[serde(default)]
    pub has_rings: bool,
    #[serde(default)]
    pub is_dwarf: bool,
    /// Name of the body this one orbits (moons only).
    #[serde(default)]
    pub parent: Option<String>,
}

impl BodyDescriptor {
    pub fn is_moon(&self) -> bool {
        self.parent.is_some()
    }

    /// Distance from the orbit centre in scene units.
    pub fn orbit_radius(&self, parent_radius: Option<f32>) -> f32 {
        match parent_radius {
            Some(r) if self.is_moon() => self.orbital_distance * r,
            _ => self.orbital_distance,
        }
    }
}

fn planet(name: &str, earth_radii: f32, distance: f32, rotation: f32, orbit: f32, color: u32) -> BodyDescriptor {
    BodyDescriptor {
        name: name.to_string(),
        radius: earth_radii * EARTH_RADIUS,
        orbital_distance: distance,
        rotation_rate: rotation,
        orbit_rate: orbit,
        color,
        is_emissive: false,
        has_rings: false,
        is_dwarf: false,
        parent: None,
    }
}

fn moon(name: &str, parent: &str, earth_radii: f32, distance: f32, rotation: f32, orbit: f32, color: u32) -> BodyDescriptor {
    BodyDescriptor {
        parent: Some(parent.to_string()),
        ..planet(name, earth_radii, distance, rotation, orbit, color)
    }
}

/// Sun, nine planets and twenty moons, parents before their moons.
pub fn solar_system() -> Vec<BodyDescriptor> {
    let sun = BodyDescriptor {
        name: "Sun".to_string(),
        radius: SUN_RADIUS,
        orbital_distance: 0.0,
        rotation_rate: 0.004,
        orbit_rate: 0.0,
        color: 0xffdd00,
        is_emissive: true,
        has_rings: false,
        is_dwarf: false,
        parent: None,
    };
    let saturn = BodyDescriptor {
        has_rings: true,
        ..planet("Saturn", 9.45, 1427.0, 0.038, 0.0008, 0xf7e9b9)
    };
    let pluto = BodyDescriptor {
        is_dwarf: true,
        ..planet("Pluto", 0.18, 5925.0, 0.005, 0.0001, 0xbbaa99)
    };

    vec![
        sun,
        planet("Mercury", 0.38, 58.0, 0.004, 0.012, 0xbbbbbb),
        planet("Venus", 0.95, 108.0, 0.002, 0.007, 0xfff1c9),
        planet("Earth", 1.0, AU, 0.01, 0.005, 0x2d9bf0),
        planet("Mars", 0.53, 228.0, 0.008, 0.003, 0xff5500),
        planet("Jupiter", 11.2, 778.0, 0.04, 0.001, 0xf0c384),
        saturn,
        planet("Uranus", 4.01, 2870.0, 0.03, 0.0004, 0x9df5ff),
        planet("Neptune", 3.88, 4500.0, 0.032, 0.0003, 0x5580ff),
        pluto,
        moon("Moon", "Earth", 0.27, 2.0, 0.015, 0.015, 0xdeddda),
        moon("Phobos", "Mars", 0.008, 1.6, 0.01, 0.03, 0x888888),
        moon("Deimos", "Mars", 0.004, 2.5, 0.008, 0.015, 0x777777),
        moon("Io", "Jupiter", 0.286, 1.3, 0.01, 0.02, 0xfff499),
        moon("Europa", "Jupiter", 0.245, 1.5, 0.008, 0.015, 0xccccbb),
        moon("Ganymede", "Jupiter", 0.413, 1.8, 0.006, 0.01, 0xaabbcc),
        moon("Callisto", "Jupiter", 0.378, 2.1, 0.005, 0.008, 0x888899),
        moon("Titan", "Saturn", 0.404, 1.5, 0.007, 0.012, 0xffbb66),
        moon("Enceladus", "Saturn", 0.04, 1.8, 0.008, 0.014, 0xffffff),
        moon("Mimas", "Saturn", 0.03, 1.3, 0.009, 0.016, 0xdddddd),
        moon("Rhea", "Saturn", 0.12, 2.1, 0.007, 0.01, 0xcccccc),
        moon("Iapetus", "Saturn", 0.115, 2.4, 0.006, 0.008, 0xaaaaaa),
        moon("Titania", "Uranus", 0.124, 1.6, 0.009, 0.014, 0xdddddd),
        moon("Oberon", "Uranus", 0.119, 1.8, 0.008, 0.012, 0xcccccc),
        moon("Miranda", "Uranus", 0.037, 1.2, 0.01, 0.018, 0xcccccc),
        moon("Ariel", "Uranus", 0.09, 1.4, 0.009, 0.016, 0xdddddd),
        moon("Umbriel", "Uranus", 0.092, 1.7, 0.008, 0.013, 0x888888),
        moon("Triton", "Neptune", 0.212, 1.5, 0.006, 0.01, 0xffddcc),
        moon("Proteus", "Neptune", 0.039, 1.2, 0.008, 0.016, 0x888888),
        moon("Nereid", "Neptune", 0.027, 2.2, 0.005, 0.007, 0xaaaaaa),
    ]
}
