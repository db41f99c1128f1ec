//! Built-in 5x7 bitmap font for stamping labels onto procedural textures.
//!
//! Rows are stored top to bottom; bit 4 is the leftmost column.

use glam::Vec2;

use super::canvas::{Canvas, Color};

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal advance per glyph in font units (one column of spacing).
pub const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;

const QUESTION: [u8; 7] = [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04];

/// Bitmap rows for `c`, case-insensitive. Unsupported characters render as '?'.
pub fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ' ' => [0x00; 7],
        _ => QUESTION,
    }
}

/// Width of `text` in pixels at the given scale.
pub fn text_width(text: &str, scale: f32) -> f32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        return 0.0;
    }
    (n * GLYPH_ADVANCE - 1) as f32 * scale
}

/// Largest integer scale up to `max_scale` that fits `text` inside `max_width`.
pub fn fit_scale(text: &str, max_width: f32, max_scale: u32) -> u32 {
    let units = text_width(text, 1.0);
    if units <= 0.0 {
        return max_scale.max(1);
    }
    ((max_width / units).floor() as u32).clamp(1, max_scale.max(1))
}

/// Stamp `text` centred on `center`. Glyph pixels never overlap, so
/// translucent colors blend exactly once.
pub fn draw_text_centered(canvas: &mut Canvas, text: &str, center: Vec2, scale: f32, color: Color) {
    if text.is_empty() || scale <= 0.0 {
        return;
    }
    let width = text_width(text, scale);
    let height = GLYPH_HEIGHT as f32 * scale;
    let origin = Vec2::new(center.x - width / 2.0, center.y - height / 2.0);

    for (i, c) in text.chars().enumerate() {
        let left = origin.x + (i as u32 * GLYPH_ADVANCE) as f32 * scale;
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    let pos = Vec2::new(left + col as f32 * scale, origin.y + row as f32 * scale);
                    canvas.fill_rect(pos, scale, scale, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(glyph('e'), glyph('E'));
        assert_eq!(glyph(' '), [0; 7]);
        assert_eq!(glyph('~'), QUESTION);
        assert_eq!(glyph('é'), QUESTION);
    }

    #[test]
    fn width_accounts_for_spacing() {
        assert_eq!(text_width("", 3.0), 0.0);
        assert_eq!(text_width("A", 1.0), 5.0);
        assert_eq!(text_width("MARS", 3.0), 69.0);
    }

    #[test]
    fn fit_scale_shrinks_long_text() {
        assert_eq!(fit_scale("IO", 240.0, 3), 3);
        let long = "X".repeat(60);
        assert_eq!(fit_scale(&long, 240.0, 3), 1);
    }

    #[test]
    fn draws_near_centre() {
        let mut canvas = Canvas::new(64, 64);
        draw_text_centered(&mut canvas, "I", Vec2::new(32.0, 32.0), 2.0, Color::WHITE);
        // Middle column of 'I' is lit on every row.
        assert_eq!(canvas.pixel(32, 32).unwrap()[3], 255);
        assert_eq!(canvas.pixel(2, 2).unwrap()[3], 0);
    }

    #[test]
    fn oversized_text_clips_without_panicking() {
        let mut canvas = Canvas::new(16, 16);
        draw_text_centered(&mut canvas, "WAY TOO LONG FOR THIS", Vec2::new(8.0, 8.0), 4.0, Color::WHITE);
    }
}
