// One error type for the whole game.
// Every variant states *where* things went wrong; all of them are fatal for the run.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Estimator, detector or game constructed with unusable sizes.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A frame whose size differs from the one the component was built for.
    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),

    #[error("Asset decode error: {0}")]
    AssetDecode(String),

    /// Grabbing/decoding a frame failed
    #[error("Capture failure: {0}")]
    CaptureFailure(String),

    /// Opening/starting the camera failed
    #[error("Camera init error: {0}")]
    CameraInit(String),

    #[error("Window init error: {0}")]
    WindowInit(String),

    #[error("Window update error: {0}")]
    WindowUpdate(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for the size check every grid-consuming function performs.
    pub fn check_dims(expected: (usize, usize), actual: (usize, usize)) -> Result<()> {
        if expected != actual {
            return Err(Error::DimensionMismatch { expected, actual });
        }
        Ok(())
    }

    /// Checks that a flat pixel buffer really holds `w * h` samples. A buffer
    /// of the wrong length is reported as a `len x 1` row.
    pub fn check_len(expected: (usize, usize), len: usize) -> Result<()> {
        if expected.0 * expected.1 != len {
            return Err(Error::DimensionMismatch { expected, actual: (len, 1) });
        }
        Ok(())
    }
}
