// systems/starfield.rs
//
// Background stars: three static layers scattered in nested cubes plus a small
// twinkling layer whose opacity, point size and scale pulse over time.

use bytemuck::{Pod, Zeroable};

use crate::core::rng::Rng;
use crate::renderer::traits::PointsDesc;

/// Static description of one star layer.
#[derive(Debug, Clone, Copy)]
pub struct StarLayer {
    pub count: u32,
    /// Edge length of the cube the stars are scattered in, centred on the origin.
    pub spread: f32,
    pub size: f32,
    pub color: u32,
    /// When non-empty, each star picks one of these instead of `color`.
    pub palette: &'static [u32],
    pub animated: bool,
}

/// White, yellow, blue, orange.
pub const BRIGHT_STAR_COLORS: [u32; 4] = [0xffffff, 0xffffaa, 0xaaddff, 0xffaa55];

pub const STAR_LAYERS: [StarLayer; 4] = [
    // Distant, numerous, faintly blue.
    StarLayer { count: 40000, spread: 20000.0, size: 0.8, color: 0xaaaaff, palette: &[], animated: false },
    StarLayer { count: 15000, spread: 15000.0, size: 1.5, color: 0xffffff, palette: &[], animated: false },
    StarLayer { count: 5000, spread: 10000.0, size: 2.5, color: 0xffffff, palette: &BRIGHT_STAR_COLORS, animated: false },
    StarLayer { count: 200, spread: 5000.0, size: 3.0, color: 0xffffff, palette: &[], animated: true },
];

/// Animated parameters of the twinkling layer for one frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Twinkle {
    pub opacity: f32,
    pub size: f32,
    /// Uniform scale applied to the whole layer.
    pub scale: f32,
}

impl Twinkle {
    pub fn at(seconds: f32) -> Self {
        Self {
            opacity: 0.6 + (seconds * 2.0).sin() * 0.4,
            size: 2.5 + (seconds * 3.0).sin() * 0.5,
            scale: 1.0 + seconds.sin() * 0.03,
        }
    }
}

/// Scatter one layer. `density` scales the star count (1.0 = full field).
pub fn scatter(index: u32, layer: &StarLayer, density: f32, rng: &mut Rng) -> PointsDesc {
    let count = (layer.count as f32 * density.max(0.0)).round() as usize;
    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::new();
    for _ in 0..count {
        positions.push([rng.spread(layer.spread), rng.spread(layer.spread), rng.spread(layer.spread)]);
        if let Some(&c) = rng.pick(layer.palette) {
            colors.push(c);
        }
    }
    PointsDesc {
        layer: index,
        positions,
        color: layer.color,
        colors,
        size: layer.size,
        opacity: 1.0,
        size_attenuation: false,
        animated: layer.animated,
    }
}

/// Scatter every layer.
pub fn build_star_field(density: f32, rng: &mut Rng) -> Vec<PointsDesc> {
    STAR_LAYERS
        .iter()
        .enumerate()
        .map(|(i, layer)| scatter(i as u32, layer, density, rng))
        .collect()
}
