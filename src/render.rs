// Puts the game on top of the camera frame.
// Visual: icon over the video, a striped white flash on a catch, score/lives in
// the corner; on game over the picture darkens and the final score is centred.
use rand::Rng;

use crate::draw::{dim, draw_text_5x7, text_width_5x7};
use crate::game::{Game, Tick};
use crate::sprite::Sprite;
use crate::types::FrameBuffer;

const WHITE: u32 = 0x00_FF_FF_FF;
const SCORE_COLOR: u32 = 0x00_00_00_FF; // blue
const LIVES_COLOR: u32 = 0x00_FF_00_00; // red
const HUD_SCALE: i32 = 2;
const TITLE_SCALE: i32 = 5;
const PROMPT_SCALE: i32 = 3;
/// Share of the camera image left visible behind the game-over text.
const GAME_OVER_KEEP: f32 = 0.3;

/// Draw the solid pixels of `sprite` with its top-left at (x, y), clipped.
pub fn blit_sprite(fb: &mut FrameBuffer, sprite: &Sprite, x: usize, y: usize) {
    for sy in 0..sprite.size {
        let fy = y + sy;
        if fy >= fb.height {
            break;
        }
        for sx in 0..sprite.size {
            let fx = x + sx;
            if fx >= fb.width {
                break;
            }
            if sprite.is_opaque(sx, sy) {
                fb.pixels[fy * fb.width + fx] = sprite.pixels[sy * sprite.size + sx];
            }
        }
    }
}

/// Catch flash: every other row (0, 2, 4, …) goes white for this frame.
pub fn flash(fb: &mut FrameBuffer) {
    let w = fb.width;
    if w == 0 {
        return;
    }
    for row in fb.pixels.chunks_exact_mut(w).step_by(2) {
        row.fill(WHITE);
    }
}

pub fn draw_hud(fb: &mut FrameBuffer, score: u32, lives: u32) {
    draw_text_5x7(fb, 30, 30, &format!("SCORE: {score}"), SCORE_COLOR, HUD_SCALE);
    draw_text_5x7(fb, 30, 70, &format!("LIVES: {lives}"), LIVES_COLOR, HUD_SCALE);
}

pub fn draw_game_over(fb: &mut FrameBuffer, score: u32) {
    dim(fb, GAME_OVER_KEEP);

    let w = fb.width as i32;
    let title = "GAME OVER";
    let title_w = text_width_5x7(title, TITLE_SCALE);
    let title_h = 7 * TITLE_SCALE;

    // Everything lines up with the title's left edge, like a small menu.
    let x = (w - title_w) / 2;
    let y = (fb.height as i32 - title_h) / 2 - 40;

    draw_text_5x7(fb, x, y, title, WHITE, TITLE_SCALE);
    draw_text_5x7(fb, x, y + 50, &format!("FINAL SCORE: {score}"), WHITE, PROMPT_SCALE);
    draw_text_5x7(fb, x, y + 100, "PRESS 'R' TO RESTART", WHITE, PROMPT_SCALE - 1);
    draw_text_5x7(fb, x, y + 140, "PRESS 'Q' TO QUIT", WHITE, PROMPT_SCALE - 1);
}

/// Render one tick's outcome onto the (already mirrored) camera frame.
pub fn render_scene<R: Rng>(fb: &mut FrameBuffer, game: &Game<R>, tick: Tick) {
    if game.is_over() {
        draw_game_over(fb, game.score);
        return;
    }
    blit_sprite(fb, game.sprite(), game.x, game.y);
    if tick.is_catch() {
        flash(fb);
    }
    draw_hud(fb, game.score, game.lives);
}
