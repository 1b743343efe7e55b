pub mod cache;
pub mod camera;
pub mod collector;
pub mod detector;
pub mod logger;
pub mod preview;
pub mod saver;
pub mod session;

use std::path::PathBuf;
use thiserror::Error;

pub use camera::{CameraSource, FrameSource};
pub use collector::{collect, CollectionReport, CollectorConfig, FaceCollector, StopReason};
pub use detector::{DetectorParams, FaceDetect, FaceDetector};
pub use logger::SessionLogger;
pub use preview::{HeadlessPreview, PreviewSurface, PreviewWindow};
pub use session::Session;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Unable to open camera {0}")]
    CameraUnavailable(i32),
    #[error("Failed to load cascade classifier from {0:?}")]
    CascadeLoad(String),
    #[error("Failed to write image {0:?}: {1}")]
    ImageWrite(PathBuf, String),
    #[error("Invalid user name {0:?}")]
    InvalidUserName(String),
}
