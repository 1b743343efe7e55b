use crate::CollectorError;
use opencv::prelude::*;
use opencv::videoio;

/// Supplier of color frames for the capture loop.
pub trait FrameSource {
    /// Blocks until the next frame is available. `Ok(None)` means the source
    /// could not produce one (device gone, end of stream).
    fn read_frame(&mut self) -> anyhow::Result<Option<Mat>>;

    /// Releases the underlying device. Must be safe to call more than once.
    fn release(&mut self) -> anyhow::Result<()>;
}

/// Camera-backed frame source.
///
/// A camera that fails to open is not an error at construction time: the
/// first read reports [`CollectorError::CameraUnavailable`] and the capture
/// loop stops on it like any other read failure.
pub struct CameraSource {
    index: i32,
    capture: Option<videoio::VideoCapture>,
}

impl CameraSource {
    pub fn open(index: i32) -> Self {
        let capture = match videoio::VideoCapture::new(index, videoio::CAP_ANY) {
            Ok(capture) if videoio::VideoCapture::is_opened(&capture).unwrap_or(false) => {
                Some(capture)
            }
            Ok(_) => None,
            Err(err) => {
                log::debug!("VideoCapture::new({}) failed: {}", index, err);
                None
            }
        };
        Self { index, capture }
    }

    pub fn is_opened(&self) -> bool {
        self.capture.is_some()
    }
}

impl FrameSource for CameraSource {
    fn read_frame(&mut self) -> anyhow::Result<Option<Mat>> {
        let Some(capture) = self.capture.as_mut() else {
            return Err(CollectorError::CameraUnavailable(self.index).into());
        };
        let mut frame = Mat::default();
        let grabbed = capture.read(&mut frame)?;
        if !grabbed || frame.size()?.width == 0 {
            return Ok(None);
        }
        Ok(Some(frame))
    }

    fn release(&mut self) -> anyhow::Result<()> {
        if let Some(capture) = self.capture.as_mut() {
            capture.release()?;
        }
        Ok(())
    }
}
