// Webcam reflex game: wave at the falling icon to catch it.
// Pipeline per frame: camera → vision (shrink/gray/blur) → background model →
// foreground mask → game rules → render → window.

pub mod background;
pub mod camera;
pub mod draw;
pub mod error;
pub mod game;
pub mod render;
pub mod sprite;
pub mod types;
pub mod vision;

pub use background::BackgroundEstimator;
pub use error::{Error, Result};
pub use game::{Game, GameState, Tick};
pub use sprite::Sprite;
pub use types::{ForegroundMask, FrameBuffer, GrayFrame};
pub use vision::MotionDetector;
