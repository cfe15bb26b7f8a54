// Catch-the-icon rules.
// Visual: an icon falls from the top; wave through it to score, let it hit the
// bottom and you lose a life. Zero lives = game over until you restart.
use std::ops::Range;

use log::{debug, info};
use rand::Rng;

use crate::error::{Error, Result};
use crate::sprite::Sprite;
use crate::types::ForegroundMask;

pub const ICON_SIZE: u32 = 50;
pub const INITIAL_SPEED: usize = 15;
pub const INITIAL_LIVES: u32 = 5;
/// Speed drawn after a catch.
pub const CATCH_SPEED: Range<usize> = 10..20;
/// Speed drawn after a miss.
pub const MISS_SPEED: Range<usize> = 10..15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Playing,
    GameOver,
}

/// What happened on one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Fell,
    Caught,
    Missed,
    /// Game over; nothing moves.
    Idle,
}

impl Tick {
    /// The collision signal: true only on the tick the icon was caught.
    pub fn is_catch(self) -> bool {
        self == Tick::Caught
    }
}

pub struct Game<R: Rng> {
    width: usize,   // play area (frame) size
    height: usize,
    sprite: Sprite,
    rng: R,
    pub x: usize,   // icon top-left
    pub y: usize,
    pub speed: usize,
    pub score: u32,
    pub lives: u32,
    state: GameState,
}

impl<R: Rng> Game<R> {
    pub fn new(width: usize, height: usize, sprite: Sprite, rng: R) -> Result<Self> {
        if width <= sprite.size || height <= sprite.size {
            return Err(Error::InvalidConfiguration(format!(
                "play area {width}x{height} must be larger than the {0}x{0} icon",
                sprite.size
            )));
        }
        let mut game = Self {
            width,
            height,
            sprite,
            rng,
            x: 0,
            y: 0,
            speed: INITIAL_SPEED,
            score: 0,
            lives: INITIAL_LIVES,
            state: GameState::Playing,
        };
        game.reset();
        Ok(game)
    }

    // Full reset: fresh column at the top, base speed, score 0, full lives.
    fn reset(&mut self) {
        self.x = self.random_column();
        self.y = 0;
        self.speed = INITIAL_SPEED;
        self.score = 0;
        self.lives = INITIAL_LIVES;
        self.state = GameState::Playing;
    }

    /// Start over. Only honoured from `GameOver`; returns whether it happened.
    pub fn restart(&mut self) -> bool {
        if self.state != GameState::GameOver {
            return false;
        }
        self.reset();
        info!("restart");
        true
    }

    fn random_column(&mut self) -> usize {
        self.rng.gen_range(0..self.width - self.sprite.size)
    }

    // Back to the top in a new column with a new speed.
    fn respawn(&mut self, speeds: Range<usize>) {
        self.y = 0;
        self.speed = self.rng.gen_range(speeds);
        self.x = self.random_column();
    }

    /// True if any solid icon pixel sits on a foreground mask pixel.
    pub fn touches(&self, mask: &ForegroundMask) -> bool {
        let s = self.sprite.size;
        (0..s).any(|sy| {
            (0..s).any(|sx| {
                self.sprite.is_opaque(sx, sy) && mask.is_foreground(self.x + sx, self.y + sy)
            })
        })
    }

    /// Advance one tick against this tick's foreground mask.
    ///
    /// The mask must cover the play area exactly. The icon moves down first;
    /// a catch at the new position wins over reaching the bottom.
    pub fn update_position(&mut self, mask: &ForegroundMask) -> Result<Tick> {
        Error::check_dims((self.width, self.height), mask.dims())?;
        if self.state == GameState::GameOver {
            return Ok(Tick::Idle);
        }

        self.y += self.speed;

        if self.touches(mask) {
            self.score += 1;
            debug!("catch at ({}, {}), score {}", self.x, self.y, self.score);
            self.respawn(CATCH_SPEED);
            return Ok(Tick::Caught);
        }

        if self.y + self.sprite.size >= self.height {
            self.lives = self.lives.saturating_sub(1);
            debug!("miss, {} lives left", self.lives);
            self.respawn(MISS_SPEED);
            if self.lives == 0 {
                self.state = GameState::GameOver;
                info!("game over, final score {}", self.score);
            }
            return Ok(Tick::Missed);
        }

        Ok(Tick::Fell)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    const W: usize = 640;
    const H: usize = 480;

    fn game(seed: u64) -> Game<StdRng> {
        Game::new(W, H, Sprite::solid(50, 0x00FF8800), StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn starts_playing_with_defaults() {
        let g = game(1);
        assert_eq!(g.state(), GameState::Playing);
        assert_eq!((g.y, g.speed, g.score, g.lives), (0, INITIAL_SPEED, 0, INITIAL_LIVES));
        assert!(g.x < W - 50);
    }

    #[test]
    fn rejects_play_area_smaller_than_icon() {
        let r = Game::new(50, 480, Sprite::solid(50, 1), StdRng::seed_from_u64(0));
        assert!(matches!(r, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn empty_mask_just_falls() {
        let mut g = game(2);
        let mask = ForegroundMask::new(W, H);
        assert_eq!(g.update_position(&mask).unwrap(), Tick::Fell);
        assert_eq!(g.y, INITIAL_SPEED);
        assert_eq!(g.score, 0);
    }

    #[test]
    fn full_mask_always_catches() {
        let mask = ForegroundMask::filled(W, H, true);
        for seed in 0..20 {
            let mut g = game(seed);
            // walk down a random number of empty ticks first
            let empty = ForegroundMask::new(W, H);
            for _ in 0..(seed as usize % 25) {
                if g.update_position(&empty).unwrap() == Tick::Missed {
                    break;
                }
            }
            let before = g.score;
            assert_eq!(g.update_position(&mask).unwrap(), Tick::Caught);
            assert_eq!(g.score, before + 1);
            assert_eq!(g.y, 0);
            assert!(CATCH_SPEED.contains(&g.speed));
            assert!(g.x < W - 50);
        }
    }

    #[test]
    fn catch_beats_reaching_the_bottom() {
        let mut g = game(3);
        g.y = H - 60;
        let mask = ForegroundMask::filled(W, H, true);
        assert_eq!(g.update_position(&mask).unwrap(), Tick::Caught);
        assert_eq!(g.lives, INITIAL_LIVES);
    }

    #[test]
    fn transparent_pixels_do_not_catch() {
        // Icon solid only in its top-left pixel
        let mut pixels = vec![0u32; 50 * 50];
        pixels[0] = 0x00FFFFFF;
        let sprite = Sprite::from_pixels(50, pixels).unwrap();
        let mut g = Game::new(W, H, sprite, StdRng::seed_from_u64(4)).unwrap();
        g.x = 100;
        g.y = 0;

        // Foreground everywhere except the solid pixel's landing spot
        let mut mask = ForegroundMask::filled(W, H, true);
        mask.set(100, INITIAL_SPEED, false);
        assert_eq!(g.update_position(&mask).unwrap(), Tick::Fell);

        mask.set(100, 2 * INITIAL_SPEED, true);
        assert_eq!(g.update_position(&mask).unwrap(), Tick::Caught);
    }

    #[test]
    fn miss_costs_a_life_and_respawns() {
        let mut g = game(5);
        g.y = H - 50 - INITIAL_SPEED;
        let mask = ForegroundMask::new(W, H);
        assert_eq!(g.update_position(&mask).unwrap(), Tick::Missed);
        assert_eq!(g.lives, INITIAL_LIVES - 1);
        assert_eq!(g.y, 0);
        assert!(MISS_SPEED.contains(&g.speed));
        assert_eq!(g.state(), GameState::Playing);
    }

    #[test]
    fn last_life_ends_the_game() {
        let mut g = game(6);
        g.lives = 1;
        g.y = H - 50;
        assert_eq!(g.update_position(&ForegroundMask::new(W, H)).unwrap(), Tick::Missed);
        assert_eq!(g.lives, 0);
        assert!(g.is_over());
    }

    #[test]
    fn game_over_freezes_the_icon() {
        let mut g = game(7);
        g.lives = 1;
        g.y = H - 50;
        g.update_position(&ForegroundMask::new(W, H)).unwrap();
        let (x, y, score) = (g.x, g.y, g.score);

        assert_eq!(g.update_position(&ForegroundMask::filled(W, H, true)).unwrap(), Tick::Idle);
        assert_eq!((g.x, g.y, g.score), (x, y, score));
    }

    #[test]
    fn restart_only_from_game_over() {
        let mut g = game(8);
        g.score = 3;
        assert!(!g.restart());
        assert_eq!(g.score, 3);

        g.lives = 1;
        g.y = H - 50;
        g.update_position(&ForegroundMask::new(W, H)).unwrap();
        assert!(g.is_over());

        assert!(g.restart());
        assert_eq!(g.state(), GameState::Playing);
        assert_eq!((g.y, g.speed, g.score, g.lives), (0, INITIAL_SPEED, 0, INITIAL_LIVES));
        assert!(g.x < W - 50);
    }

    #[test]
    fn wrong_sized_mask_is_rejected() {
        let mut g = game(9);
        g.x = 400;
        let (x, y) = (g.x, g.y);
        let half = ForegroundMask::filled(W / 2, H / 2, true);
        let err = g.update_position(&half).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: (W, H), actual: (320, 240) }));
        // the icon did not move and nothing was scored
        assert_eq!((g.x, g.y, g.score), (x, y, 0));
    }

    #[test]
    fn same_seed_same_game() {
        let mut a = game(42);
        let mut b = game(42);
        let full = ForegroundMask::filled(W, H, true);
        for _ in 0..10 {
            a.update_position(&full).unwrap();
            b.update_position(&full).unwrap();
            assert_eq!((a.x, a.speed), (b.x, b.speed));
        }
    }
}
