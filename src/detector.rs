use crate::CollectorError;
use opencv::core::{self, Rect, Vector};
use opencv::prelude::*;
use opencv::{imgproc, objdetect};

pub const DEFAULT_CASCADE: &str = "haarcascades/haarcascade_frontalface_default.xml";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorParams {
    pub scale_factor: f64,
    pub min_neighbors: i32,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.3,
            min_neighbors: 5,
        }
    }
}

/// Finds faces in a color frame.
pub trait FaceDetect {
    /// Returns the grayscale version of `frame` and the face rectangles
    /// found in it, in classifier order.
    fn detect(&mut self, frame: &Mat) -> anyhow::Result<(Mat, Vec<Rect>)>;
}

pub struct FaceDetector {
    classifier: objdetect::CascadeClassifier,
    params: DetectorParams,
}

impl FaceDetector {
    /// Loads the default frontal face cascade shipped with OpenCV.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_params(DetectorParams::default())
    }

    pub fn with_params(params: DetectorParams) -> anyhow::Result<Self> {
        let xml = core::find_file_def(DEFAULT_CASCADE)
            .map_err(|_| CollectorError::CascadeLoad(DEFAULT_CASCADE.to_owned()))?;
        Self::from_file(&xml, params)
    }

    pub fn from_file(path: &str, params: DetectorParams) -> anyhow::Result<Self> {
        let classifier = objdetect::CascadeClassifier::new(path)
            .map_err(|_| CollectorError::CascadeLoad(path.to_owned()))?;
        if classifier.empty()? {
            return Err(CollectorError::CascadeLoad(path.to_owned()).into());
        }
        Ok(Self { classifier, params })
    }
}

impl FaceDetect for FaceDetector {
    fn detect(&mut self, frame: &Mat) -> anyhow::Result<(Mat, Vec<Rect>)> {
        let gray = convert_to_grayscale(frame)?;
        let mut faces = Vector::<Rect>::new();

        self.classifier.detect_multi_scale(
            &gray,
            &mut faces,
            self.params.scale_factor,
            self.params.min_neighbors,
            0,
            core::Size::default(),
            core::Size::default(),
        )?;
        Ok((gray, faces.to_vec()))
    }
}

pub fn convert_to_grayscale(image: &Mat) -> anyhow::Result<Mat> {
    if image.channels() == 1 {
        return Ok(image.try_clone()?);
    }
    let mut gray: Mat = Mat::default();
    imgproc::cvt_color_def(image, &mut gray, imgproc::COLOR_BGR2GRAY)?;
    Ok(gray)
}

/// Intersects `rect` with a `width` x `height` frame. `None` when nothing
/// of the detection lies inside the frame.
pub fn clamp_to_frame(rect: Rect, width: i32, height: i32) -> Option<Rect> {
    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = (rect.x + rect.width).min(width);
    let y1 = (rect.y + rect.height).min(height);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
}

/// Copies the `rect` region out of `gray` into its own buffer.
pub fn crop(gray: &Mat, rect: Rect) -> anyhow::Result<Mat> {
    let region = Mat::roi(gray, rect)?;
    Ok(region.try_clone()?)
}

/// Outlines every detection on a copy of `gray` for the preview.
pub fn draw_detections(gray: &Mat, faces: &[Rect]) -> anyhow::Result<Mat> {
    let mut debug_frame = gray.try_clone()?;
    for face in faces {
        imgproc::rectangle_def(&mut debug_frame, *face, (255, 255, 255).into())?;
    }
    Ok(debug_frame)
}
