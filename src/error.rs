// One error type for the whole crate.
// Every variant states *where* things went wrong.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating a window failed
    #[error("Window init error: {0}")]
    WindowInit(String),

    /// Updating a window buffer failed
    #[error("Window update error: {0}")]
    WindowUpdate(String),

    /// Opening/starting the camera failed
    #[error("Camera init error: {0}")]
    CameraInit(String),

    /// Grabbing/decoding a frame failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String),

    /// The calibration file could not be opened or written
    #[error("Calibration file {}: {source}", .path.display())]
    CalibrationIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The calibration file is not valid JSON for a color range, or could not be written
    #[error("Calibration JSON error: {0}")]
    CalibrationJson(#[from] serde_json::Error),

    /// The calibration file parsed but describes an unusable range
    #[error("Invalid color range: {0}")]
    InvalidRange(String),

    /// Writing the canvas to disk failed
    #[error("Export error: {0}")]
    Export(#[from] image::ImageError),

    /// Frames, masks and canvases must share the same dimensions
    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

pub type Result<T> = std::result::Result<T, Error>;
