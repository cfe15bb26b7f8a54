// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the mirrored camera image with the game on top.
// 2) Plain pixel/rect/dim primitives.
// 3) A tiny 5x7 bitmap font (scalable) to render HUD text on top of the video.

use crate::error::{Error, Result};
use crate::types::FrameBuffer;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the camera feed.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen. This also pumps the
    /// window's event queue, which is what the key checks below read.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<()> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Q or ESC: leave the game.
    pub fn quit_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape) || self.window.is_key_pressed(Key::Q, KeyRepeat::No)
    }

    // only acted on while the game-over screen is up
    pub fn r_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::R, KeyRepeat::No)
    }
}

/* ---------- Software drawing: rects, dimming ---------- */

/// Fill an axis-aligned rectangle, clipped to the frame.
pub fn fill_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    let x0 = x.max(0) as usize;
    let y0 = y.max(0) as usize;
    let x1 = ((x + w).max(0) as usize).min(fb.width);
    let y1 = ((y + h).max(0) as usize).min(fb.height);
    for yy in y0..y1 {
        let row = yy * fb.width;
        fb.pixels[row + x0.min(x1)..row + x1].fill(color);
    }
}

/// Scale every channel by `keep` (0..1): a black overlay with opacity `1 - keep`.
/// Visual: the whole picture darkens, text drawn afterwards pops out.
pub fn dim(fb: &mut FrameBuffer, keep: f32) {
    let k = keep.clamp(0.0, 1.0);
    for px in &mut fb.pixels {
        let r = (((*px >> 16) & 0xFF) as f32 * k).round() as u32;
        let g = (((*px >> 8) & 0xFF) as f32 * k).round() as u32;
        let b = ((*px & 0xFF) as f32 * k).round() as u32;
        *px = (r << 16) | (g << 8) | b;
    }
}

/* ---------- 5x7 bitmap font (uppercase subset for the game's HUD) ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
/// Lowercase letters are drawn with their uppercase glyph.
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Letters used by SCORE / LIVES / GAME OVER / PRESS 'R' TO RESTART / QUIT
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),

        // Punctuation: space, colon, dot, apostrophe
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),

        _ => None,
    }
}

/// Draw a single character at (x,y), each font pixel a `scale × scale` block.
/// Visual: a glyph with a black drop shadow for contrast against the video.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32, scale: i32) {
    if let Some(rows) = glyph5x7(ch) {
        // Shadow pass first, then the glyph itself
        for (offset, c) in [(scale.max(1) / 2 + 1, 0x00000000), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if ((*rowbits >> (4 - rx)) & 1) != 0 {
                        let px = x + rx * scale + offset;
                        let py = y + ry as i32 * scale + offset;
                        fill_rect(fb, px, py, scale, scale, c);
                    }
                }
            }
        }
    }
}

/// Pixel width of `text` at `scale` (5 px glyph + 1 px spacing per char).
pub fn text_width_5x7(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * 6 * scale
}

/// Draw a text string using 5x7 glyphs at the given integer scale.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32, scale: i32) {
    let scale = scale.max(1);
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color, scale);
        x += 6 * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_clips() {
        let mut fb = FrameBuffer::filled(4, 4, 0);
        fill_rect(&mut fb, 2, -1, 10, 2, 1);
        let filled: Vec<usize> = (0..16).filter(|&i| fb.pixels[i] == 1).collect();
        assert_eq!(filled, vec![2, 3]);
        fill_rect(&mut fb, 10, 10, 3, 3, 2);
        fill_rect(&mut fb, -5, 0, 2, 2, 2);
        assert!(!fb.pixels.contains(&2));
    }

    #[test]
    fn dim_scales_channels() {
        let mut fb = FrameBuffer::filled(1, 1, 0x00FF640A);
        dim(&mut fb, 0.3);
        assert_eq!(fb.pixels[0], (77 << 16) | (30 << 8) | 3);
    }

    #[test]
    fn every_hud_string_has_glyphs() {
        let hud = [
            "SCORE: 0123456789",
            "LIVES",
            "GAME OVER",
            "FINAL SCORE",
            "PRESS 'R' TO RESTART",
            "PRESS 'Q' TO QUIT",
        ];
        for s in hud {
            assert!(s.chars().all(|c| glyph5x7(c).is_some()), "missing glyph in {s}");
        }
    }

    #[test]
    fn scaled_text_is_wider() {
        assert_eq!(text_width_5x7("GAME", 1), 24);
        assert_eq!(text_width_5x7("GAME", 3), 72);
    }

    #[test]
    fn text_draws_in_color() {
        let mut fb = FrameBuffer::filled(20, 10, 0x00123456);
        draw_text_5x7(&mut fb, 1, 1, "I", 0x00FFFFFF, 1);
        // top row of 'I' is 0b01110 → x = 2..=4 at y = 1
        assert_eq!(fb.pixels[1 * 20 + 2], 0x00FFFFFF);
        assert_eq!(fb.pixels[1 * 20 + 1], 0x00123456);
    }
}
