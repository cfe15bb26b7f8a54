// What you SEE:
// • Your mirrored camera image with an icon falling from the top.
// • Wave a hand through the icon to catch it (white flash, +1 score).
// • Let it reach the bottom and you lose a life; at zero lives it's GAME OVER.
// • R restarts on the game-over screen. Q or ESC quits.

use log::{debug, info};
use motion_catch::camera::CameraCapture;
use motion_catch::draw::Drawer;
use motion_catch::error::Error;
use motion_catch::game::{Game, ICON_SIZE};
use motion_catch::render::render_scene;
use motion_catch::sprite::{ICON_PATH, Sprite};
use motion_catch::vision::MotionDetector;
use rand::{SeedableRng, rngs::StdRng};
use std::time::{Duration, Instant};

const CAMERA_INDEX: u32 = 0;
const CAPTURE_WIDTH: u32 = 640;
const CAPTURE_HEIGHT: u32 = 480;
/// The background model runs at 1/DOWNSCALE of the capture size.
const DOWNSCALE: usize = 2;
/// Frames averaged into the background.
const WINDOW_LEN: usize = 5;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    /* --- Assets first: no point opening the camera without the icon --- */
    let sprite = Sprite::load(ICON_PATH, ICON_SIZE)?;

    /* --- Camera + window setup ---
       Visual: window opens with live camera feed. */
    let mut cam = CameraCapture::new(CAMERA_INDEX, CAPTURE_WIDTH, CAPTURE_HEIGHT)?;
    let (w, h) = cam.resolution();
    let (w, h) = (w as usize, h as usize);
    let mut drawer = Drawer::new("Motion Catch", w, h)?;

    let mut detector = MotionDetector::new(w, h, DOWNSCALE, WINDOW_LEN)?;
    let mut game = Game::new(w, h, sprite, StdRng::from_entropy())?;
    info!("ready: {w}x{h}, {} lives", game.lives);

    /* --- FPS (logged once a second at debug level) --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() {
        /* 1) Capture → motion mask */
        let mut screen = cam.next_frame()?;
        let mask = detector.apply(&screen)?;

        /* 2) Rules, then draw the outcome over the camera image */
        let tick = game.update_position(&mask)?;
        render_scene(&mut screen, &game, tick);

        /* 3) Present (also polls the keyboard) */
        drawer.present(&screen)?;

        /* 4) Keys */
        if drawer.quit_pressed() {
            info!("quit, score {}", game.score);
            break;
        }
        if game.is_over() && drawer.r_pressed_once() {
            game.restart();
        }

        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            debug!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
