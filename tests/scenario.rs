// tests/scenario.rs: whole-pipeline checks through the public API only.

use motion_catch::game::{INITIAL_LIVES, Tick};
use motion_catch::render::render_scene;
use motion_catch::{
    BackgroundEstimator, ForegroundMask, FrameBuffer, Game, GrayFrame, MotionDetector, Sprite,
};
use rand::{SeedableRng, rngs::StdRng};

// ===== Background estimator =====

#[test]
fn zero_warmup_then_bright_frame() {
    let mut est = BackgroundEstimator::new(8, 8, 5).unwrap();
    let dark = GrayFrame::filled(8, 8, 0);

    for _ in 0..5 {
        let mask = est.observe(&dark).unwrap();
        assert_eq!(mask.count(), 0);
        assert!(est.mean().iter().all(|&m| m == 0.0));
    }
    assert!(est.is_warm());

    // The bright frame enters the window before the mask is taken:
    // mean becomes 255 / 5 = 51 and |255 - 51| = 204 > 15 everywhere.
    let mask = est.observe(&GrayFrame::filled(8, 8, 255)).unwrap();
    for &m in est.mean() {
        assert!((m - 51.0).abs() < 1e-3, "mean {m}");
    }
    assert_eq!(mask.count(), 64);
    assert_eq!(est.len(), 5);
}

#[test]
fn bright_frame_fades_into_background() {
    let mut est = BackgroundEstimator::new(4, 4, 5).unwrap();
    let bright = GrayFrame::filled(4, 4, 255);
    for _ in 0..5 {
        est.observe(&GrayFrame::new(4, 4)).unwrap();
    }
    // 255 held still: mean climbs 51, 102, 153, 204, 255
    let counts: Vec<usize> = (0..5).map(|_| est.observe(&bright).unwrap().count()).collect();
    assert_eq!(counts, vec![16, 16, 16, 16, 0]);
}

// ===== Detector + game =====

#[test]
fn waving_over_the_icon_scores() {
    let (w, h) = (200, 160);
    let mut det = MotionDetector::new(w, h, 2, 5).unwrap();
    let sprite = Sprite::solid(20, 0x00FFAA00);
    let mut game = Game::new(w, h, sprite, StdRng::seed_from_u64(11)).unwrap();

    let scene = FrameBuffer::filled(w, h, 0x00404040);
    for _ in 0..5 {
        let mask = det.apply(&scene).unwrap();
        assert_eq!(game.update_position(&mask).unwrap(), Tick::Fell);
    }

    // A "hand" covers the band where the icon will be next tick.
    let next_y = game.y + game.speed;
    let mut hand = scene.clone();
    for y in next_y..(next_y + 20).min(h) {
        for x in 0..w {
            hand.pixels[y * w + x] = 0x00F0F0F0;
        }
    }
    let mask = det.apply(&hand).unwrap();
    let tick = game.update_position(&mask).unwrap();
    assert!(tick.is_catch());
    assert_eq!(game.score, 1);
    assert_eq!(game.y, 0);

    let mut screen = hand.clone();
    render_scene(&mut screen, &game, tick);
    assert_eq!(screen.pixels[0], 0x00FFFFFF, "catch flash paints row 0");
}

#[test]
fn ignored_icon_runs_out_of_lives_then_restarts() {
    let (w, h) = (120, 100);
    let sprite = Sprite::solid(10, 0x00FFFFFF);
    let mut game = Game::new(w, h, sprite, StdRng::seed_from_u64(3)).unwrap();
    let still = ForegroundMask::new(w, h);

    let mut misses = 0;
    for _ in 0..1000 {
        match game.update_position(&still).unwrap() {
            Tick::Missed => misses += 1,
            Tick::Idle => break,
            _ => {}
        }
    }
    assert_eq!(misses, INITIAL_LIVES);
    assert!(game.is_over());

    assert!(game.restart());
    assert!(!game.is_over());
    assert_eq!((game.score, game.lives, game.y), (0, INITIAL_LIVES, 0));
}
