//! Detail painters for synthesized textures.
//!
//! Every painter is a pure function of the canvas and the random source.
//! Geometry is authored for a 256 px surface and scaled to the canvas width.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::core::rng::Rng;
use super::canvas::{Canvas, Color, Paint, RadialGradient};
use super::palette::DetailPattern;

const REFERENCE_SIZE: f32 = 256.0;

const LAVA: [Color; 4] = [
    Color::hex(0xff5500),
    Color::hex(0xff0000),
    Color::hex(0xaa0000),
    Color::hex(0xffaa00),
];

/// Painter signature shared by every pattern.
pub type PatternFn = fn(&mut Canvas, &mut Rng);

impl DetailPattern {
    pub fn painter(self) -> PatternFn {
        match self {
            DetailPattern::Crater => paint_craters,
            DetailPattern::Stripe => paint_stripes,
            DetailPattern::Land => paint_land,
            DetailPattern::Swirl => paint_swirls,
            DetailPattern::Smooth => paint_smooth,
            DetailPattern::Volcanic => paint_volcanic,
            DetailPattern::Cracked => paint_cracks,
            DetailPattern::Dark => paint_dark,
            DetailPattern::Mixed => paint_mixed,
            DetailPattern::Haze => paint_haze,
        }
    }
}

fn unit(canvas: &Canvas) -> f32 {
    canvas.width() as f32 / REFERENCE_SIZE
}

fn random_point(canvas: &Canvas, rng: &mut Rng) -> Vec2 {
    let size = canvas.size();
    Vec2::new(rng.range(0.0, size.x), rng.range(0.0, size.y))
}

/// Closed blob: the centre followed by a ring of points at jittered radii.
fn blob(center: Vec2, step: f32, min_r: f32, max_r: f32, rng: &mut Rng) -> Vec<Vec2> {
    let mut points = vec![center];
    let mut a = 0.0f32;
    while a < TAU {
        let r = rng.range(min_r, max_r);
        points.push(center + Vec2::new(a.cos(), a.sin()) * r);
        a += step;
    }
    points
}

pub fn paint_craters(canvas: &mut Canvas, rng: &mut Rng) {
    let u = unit(canvas);
    for _ in 0..20 {
        let center = random_point(canvas, rng);
        let radius = rng.range(5.0, 25.0) * u;
        canvas.fill_circle(center, radius, Color::BLACK.with_alpha(rng.next_f32() * 0.3));
        let rim = Color::WHITE.with_alpha(rng.next_f32() * 0.3);
        canvas.stroke_circle(center, radius * 0.9, u, rim);
    }
}

pub fn paint_stripes(canvas: &mut Canvas, rng: &mut Rng) {
    let u = unit(canvas);
    let width = canvas.size().x;
    for i in 0..8 {
        let y = i as f32 * 32.0 * u;
        let height = rng.range(15.0, 25.0) * u;
        let alpha = rng.next_f32() * 0.3 + 0.1;
        let band = if i % 2 == 0 { Color::WHITE } else { Color::BLACK };
        canvas.fill_rect(Vec2::new(0.0, y), width, height, band.with_alpha(alpha));
    }
}

pub fn paint_land(canvas: &mut Canvas, rng: &mut Rng) {
    let u = unit(canvas);
    let green = Color::rgba8(0, 100, 0, 0.4);
    for _ in 0..7 {
        let center = random_point(canvas, rng);
        let shape = blob(center, 0.3, 20.0 * u, 60.0 * u, rng);
        canvas.fill_polygon(&shape, green);
    }
}

pub fn paint_swirls(canvas: &mut Canvas, rng: &mut Rng) {
    let u = unit(canvas);
    let turns = PI * 6.0;
    for _ in 0..5 {
        let center = random_point(canvas, rng);
        let radius = rng.range(30.0, 80.0) * u;
        let rotation = rng.next_f32() * TAU;
        let color = Color::WHITE.with_alpha(rng.next_f32() * 0.4);

        let mut spiral = Vec::with_capacity(190);
        let mut a = 0.0f32;
        while a < turns {
            let r = radius * (1.0 - a / turns);
            spiral.push(center + Vec2::new((a + rotation).cos(), (a + rotation).sin()) * r);
            a += 0.1;
        }
        canvas.fill_polygon(&spiral, color);
    }
}

pub fn paint_smooth(canvas: &mut Canvas, rng: &mut Rng) {
    let u = unit(canvas);
    let previous = canvas.global_alpha();
    canvas.set_global_alpha(0.2);
    for _ in 0..10 {
        let center = random_point(canvas, rng);
        let radius = rng.range(30.0, 80.0) * u;
        let glow = RadialGradient {
            center,
            radius,
            inner: Color::WHITE.with_alpha(0.5),
            outer: Color::WHITE.with_alpha(0.0),
        };
        canvas.fill_circle(center, radius, Paint::Radial(glow));
    }
    canvas.set_global_alpha(previous);
}

pub fn paint_volcanic(canvas: &mut Canvas, rng: &mut Rng) {
    let u = unit(canvas);
    canvas.fill_all(Color::BLACK.with_alpha(0.2));
    for _ in 0..15 {
        let center = random_point(canvas, rng);
        let radius = rng.range(5.0, 20.0) * u;
        let lava = rng.pick(&LAVA).copied().unwrap_or(LAVA[0]);
        canvas.fill_circle(center, radius, lava);

        let halo = RadialGradient {
            center,
            radius: radius * 1.5,
            inner: Color::rgba8(255, 100, 0, 0.5),
            outer: Color::rgba8(255, 100, 0, 0.0),
        };
        canvas.fill_circle(center, radius * 1.5, Paint::Radial(halo));
    }
}

pub fn paint_cracks(canvas: &mut Canvas, rng: &mut Rng) {
    let u = unit(canvas);
    let ice = Color::rgba8(0, 30, 100, 0.3);
    for _ in 0..20 {
        let mut cursor = random_point(canvas, rng);
        let segments = 3 + rng.next_int(6) as usize;
        let mut line = Vec::with_capacity(segments + 1);
        line.push(cursor);
        for _ in 0..segments {
            cursor += Vec2::new(rng.spread(80.0), rng.spread(80.0)) * u;
            line.push(cursor);
        }
        canvas.stroke_polyline(&line, u, ice);
    }
}

pub fn paint_dark(canvas: &mut Canvas, rng: &mut Rng) {
    let u = unit(canvas);
    canvas.fill_all(Color::BLACK.with_alpha(0.5));
    for _ in 0..10 {
        let center = random_point(canvas, rng);
        let radius = rng.range(10.0, 30.0) * u;
        canvas.fill_circle(center, radius, Color::WHITE.with_alpha(rng.next_f32() * 0.15));
    }
}

pub fn paint_mixed(canvas: &mut Canvas, rng: &mut Rng) {
    let u = unit(canvas);
    for _ in 0..10 {
        let center = random_point(canvas, rng);
        let radius = rng.range(2.0, 10.0) * u;
        canvas.fill_circle(center, radius, Color::BLACK.with_alpha(0.2));
    }
    let pale = Color::WHITE.with_alpha(0.1);
    for _ in 0..5 {
        let center = random_point(canvas, rng);
        let shape = blob(center, 0.2, 10.0 * u, 50.0 * u, rng);
        canvas.fill_polygon(&shape, pale);
    }
}

pub fn paint_haze(canvas: &mut Canvas, _rng: &mut Rng) {
    let u = unit(canvas);
    let width = canvas.size().x;
    let haze = Color::rgba8(255, 180, 30, 0.2);
    for i in 0..8 {
        let y = i as f32 * 32.0 * u;
        canvas.fill_rect(Vec2::new(0.0, y), width, 15.0 * u, haze);
    }
}
