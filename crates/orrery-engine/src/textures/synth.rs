use glam::Vec2;

use crate::core::rng::Rng;
use super::canvas::{Canvas, Color, Paint, RadialGradient};
use super::font;
use super::image::TextureImage;
use super::palette::palette_for;

/// Default edge length of synthesized textures.
pub const FALLBACK_SIZE: u32 = 256;
/// Largest edge a synthesized texture may have.
pub const MAX_FALLBACK_SIZE: u32 = 4096;

/// Paint a placeholder texture for `name`: palette gradient, detail pattern,
/// then the name stamped in translucent white.
///
/// Total for any input, including empty and non-ASCII names. The size is
/// clamped to `1..=MAX_FALLBACK_SIZE`.
pub fn synthesize(name: &str, size: u32, rng: &mut Rng) -> TextureImage {
    let size = size.clamp(1, MAX_FALLBACK_SIZE);
    let palette = palette_for(name);
    let mut canvas = Canvas::new(size, size);
    let extent = canvas.size();
    let center = extent / 2.0;

    canvas.fill_all(Paint::Radial(RadialGradient {
        center,
        radius: extent.x / 2.0,
        inner: palette.primary,
        outer: palette.secondary,
    }));

    (palette.pattern.painter())(&mut canvas, rng);

    let label = name.trim().to_uppercase();
    if !label.is_empty() {
        let max_scale = ((extent.x / FALLBACK_SIZE as f32) * 4.0).round().max(1.0) as u32;
        let scale = font::fit_scale(&label, extent.x * 0.9, max_scale);
        font::draw_text_centered(
            &mut canvas,
            &label,
            Vec2::new(center.x, center.y),
            scale as f32,
            Color::WHITE.with_alpha(0.2),
        );
    }

    log::debug!("Created fallback texture for {}", name);
    canvas.into_texture()
}

/// Owns the random source and counts how many fallbacks were painted.
#[derive(Debug, Clone)]
pub struct TextureSynthesizer {
    size: u32,
    rng: Rng,
    produced: u32,
}

impl TextureSynthesizer {
    pub fn new(size: u32, seed: u64) -> Self {
        Self {
            size: size.clamp(1, MAX_FALLBACK_SIZE),
            rng: Rng::new(seed),
            produced: 0,
        }
    }

    pub fn synthesize(&mut self, name: &str) -> TextureImage {
        self.produced += 1;
        synthesize(name, self.size, &mut self.rng)
    }

    /// Number of textures painted so far.
    pub fn produced(&self) -> u32 {
        self.produced
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

impl Default for TextureSynthesizer {
    fn default() -> Self {
        Self::new(FALLBACK_SIZE, 0x5eed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_names_are_full_size() {
        let mut rng = Rng::new(11);
        let long = "x".repeat(500);
        for name in ["Mars", "Io", "Vulcan", "", "   ", "Ünïcødé ☄", long.as_str()] {
            let tex = synthesize(name, FALLBACK_SIZE, &mut rng);
            assert_eq!((tex.width(), tex.height()), (256, 256), "name {:?}", name);
        }
    }

    #[test]
    fn output_is_opaque() {
        let tex = synthesize("Europa", FALLBACK_SIZE, &mut Rng::new(2));
        assert!(tex.as_bytes().chunks_exact(4).all(|p| p[3] == 255));
    }

    #[test]
    fn gradient_uses_palette_colors() {
        // Stripe bands skip rows 25..32, where the bare gradient shows.
        let tex = synthesize("Jupiter", FALLBACK_SIZE, &mut Rng::new(3));
        let edge = tex.pixel(0, 28).unwrap();
        let secondary = Color::hex(0xf39c12);
        assert_eq!(edge[0], (secondary.r * 255.0).round() as u8);
        assert_eq!(edge[1], (secondary.g * 255.0).round() as u8);
    }

    #[test]
    fn zero_size_is_clamped() {
        let tex = synthesize("Mars", 0, &mut Rng::new(4));
        assert_eq!((tex.width(), tex.height()), (1, 1));
    }

    #[test]
    fn oversized_requests_are_capped() {
        let synth = TextureSynthesizer::new(70_000, 1);
        assert_eq!(synth.size(), MAX_FALLBACK_SIZE);
        let tex = synthesize("Mars", u32::MAX, &mut Rng::new(5));
        assert_eq!((tex.width(), tex.height()), (MAX_FALLBACK_SIZE, MAX_FALLBACK_SIZE));
    }

    #[test]
    fn synthesizer_counts_output() {
        let mut synth = TextureSynthesizer::default();
        synth.synthesize("Mars");
        synth.synthesize("Nowhere");
        assert_eq!(synth.produced(), 2);
        assert_eq!(synth.size(), FALLBACK_SIZE);
    }
}
