use std::collections::HashMap;

use crate::assets::catalog::{self, BodyDescriptor};
use crate::error::OrreryError;

/// Validated, case-insensitive lookup over the body catalog.
/// Order is preserved; every parent precedes its moons.
#[derive(Debug, Clone)]
pub struct BodyRegistry {
    bodies: Vec<BodyDescriptor>,
    by_name: HashMap<String, usize>,
}

impl BodyRegistry {
    /// Validate and index `bodies`.
    pub fn new(bodies: Vec<BodyDescriptor>) -> Result<Self, OrreryError> {
        let mut by_name = HashMap::with_capacity(bodies.len());
        for (i, body) in bodies.iter().enumerate() {
            let key = body.name.trim().to_lowercase();
            if key.is_empty() {
                return Err(OrreryError::Registry(format!("body #{} has an empty name", i)));
            }
            if !(body.radius.is_finite() && body.radius > 0.0) {
                return Err(OrreryError::Registry(format!("{}: radius must be positive", body.name)));
            }
            let numbers = [body.orbital_distance, body.rotation_rate, body.orbit_rate];
            if numbers.iter().any(|v| !v.is_finite()) || body.orbital_distance < 0.0 {
                return Err(OrreryError::Registry(format!("{}: invalid orbit parameters", body.name)));
            }
            if let Some(parent) = &body.parent {
                let parent_idx = by_name.get(&parent.trim().to_lowercase()).copied().ok_or_else(|| {
                    OrreryError::Registry(format!("{}: parent {} must be listed first", body.name, parent))
                })?;
                let parent_body: &BodyDescriptor = &bodies[parent_idx];
                if parent_body.is_moon() {
                    return Err(OrreryError::Registry(format!(
                        "{}: parent {} is itself a moon",
                        body.name, parent
                    )));
                }
            }
            if by_name.insert(key, i).is_some() {
                return Err(OrreryError::Registry(format!("duplicate body name {}", body.name)));
            }
        }
        Ok(Self { bodies, by_name })
    }

    /// The built-in sun, planets and moons.
    pub fn solar_system() -> Result<Self, OrreryError> {
        Self::new(catalog::solar_system())
    }

    /// Parse a JSON array of descriptors.
    pub fn from_json(json: &str) -> Result<Self, OrreryError> {
        let bodies: Vec<BodyDescriptor> = serde_json::from_str(json)?;
        Self::new(bodies)
    }

    /// Look up a body by name, ignoring case and surrounding whitespace.
    pub fn get(&self, name: &str) -> Option<&BodyDescriptor> {
        self.index_of(name).map(|i| &self.bodies[i])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(&name.trim().to_lowercase()).copied()
    }

    pub fn moons_of<'a>(&'a self, planet: &'a str) -> impl Iterator<Item = &'a BodyDescriptor> + 'a {
        self.bodies
            .iter()
            .filter(move |b| b.parent.as_deref().is_some_and(|p| p.eq_ignore_ascii_case(planet)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyDescriptor> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
