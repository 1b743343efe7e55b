use crate::camera::{CameraSource, FrameSource};
use crate::detector::{
    clamp_to_frame, crop, draw_detections, DetectorParams, FaceDetect, FaceDetector,
};
use crate::logger::{SessionLogger, DEFAULT_LOG_DIR};
use crate::preview::{HeadlessPreview, PreviewSurface, PreviewWindow, PREVIEW_WINDOW_TITLE};
use crate::saver::save_face;
use crate::session::{Session, DEFAULT_OUTPUT_DIR};
use anyhow::Context;
use opencv::prelude::*;
use std::path::PathBuf;
use uuid::Uuid;

pub const DEFAULT_TARGET_COUNT: usize = 100;
pub const QUIT_KEY: char = 'q';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    ReadFailure,
    UserQuit,
}

#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub session_id: Uuid,
    pub output_folder: PathBuf,
    pub saved_count: usize,
    pub stop_reason: StopReason,
}

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub user_name: String,
    pub target_count: usize,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub camera_index: i32,
    /// Cascade XML to load instead of OpenCV's bundled frontal face model.
    pub cascade: Option<PathBuf>,
    pub preview: bool,
    pub detector_params: DetectorParams,
}

impl CollectorConfig {
    pub fn new(user_name: &str, target_count: usize) -> Self {
        Self {
            user_name: user_name.to_owned(),
            target_count,
            ..Default::default()
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            user_name: String::new(),
            target_count: DEFAULT_TARGET_COUNT,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            camera_index: 0,
            cascade: None,
            preview: true,
            detector_params: DetectorParams::default(),
        }
    }
}

/// Camera-backed collector with everything the capture loop needs.
pub struct FaceCollector {
    session: Session,
    logger: SessionLogger,
    source: CameraSource,
    detector: FaceDetector,
    preview: Box<dyn PreviewSurface>,
}

impl FaceCollector {
    pub fn new(config: &CollectorConfig) -> anyhow::Result<Self> {
        let session = Session::prepare(&config.output_dir, &config.user_name, config.target_count)?;
        let mut logger = SessionLogger::create(&config.log_dir, &config.user_name)?;

        let detector = match &config.cascade {
            Some(path) => {
                let path = path
                    .to_str()
                    .with_context(|| format!("Cascade path {:?} is not valid UTF-8", path))?;
                FaceDetector::from_file(path, config.detector_params)
            }
            None => FaceDetector::with_params(config.detector_params),
        };
        let detector = log_failure(&mut logger, detector)?;
        let source = CameraSource::open(config.camera_index);
        if !source.is_opened() {
            log::warn!("Camera {} did not open", config.camera_index);
        }

        let preview: Box<dyn PreviewSurface> = if config.preview {
            Box::new(PreviewWindow::new(PREVIEW_WINDOW_TITLE)?)
        } else {
            Box::new(HeadlessPreview)
        };

        Ok(Self {
            session,
            logger,
            source,
            detector,
            preview,
        })
    }

    pub fn collect(self) -> anyhow::Result<CollectionReport> {
        let Self {
            session,
            mut logger,
            mut source,
            mut detector,
            mut preview,
        } = self;
        collect(
            session,
            &mut source,
            &mut detector,
            preview.as_mut(),
            &mut logger,
        )
    }
}

fn log_failure<T>(logger: &mut SessionLogger, result: anyhow::Result<T>) -> anyhow::Result<T> {
    if let Err(err) = &result {
        logger.error(&format!("{:#}", err));
    }
    result
}

/// Holds the frame source and preview surface for the duration of a
/// collection and releases both when dropped.
pub struct CaptureGuard<'a> {
    source: &'a mut dyn FrameSource,
    preview: &'a mut dyn PreviewSurface,
}

impl<'a> CaptureGuard<'a> {
    pub fn new(source: &'a mut dyn FrameSource, preview: &'a mut dyn PreviewSurface) -> Self {
        Self { source, preview }
    }
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.source.release() {
            log::warn!("Failed to release video source: {:#}", err);
        }
        if let Err(err) = self.preview.close() {
            log::warn!("Failed to close preview: {:#}", err);
        }
    }
}

/// Runs the capture loop until the target is reached, the source stops
/// producing frames, or the quit key is pressed.
///
/// `source` and `preview` are released before this returns, on every path.
pub fn collect(
    mut session: Session,
    source: &mut dyn FrameSource,
    detector: &mut dyn FaceDetect,
    preview: &mut dyn PreviewSurface,
    logger: &mut SessionLogger,
) -> anyhow::Result<CollectionReport> {
    logger.info(&format!(
        "Starting collection for {} (UUID: {})",
        session.user_name, session.session_id
    ));

    let outcome = {
        let mut guard = CaptureGuard::new(source, preview);
        run_loop(&mut session, &mut guard, detector, logger)
    };
    let stop_reason = match outcome {
        Ok(stop_reason) => stop_reason,
        Err(err) => {
            logger.error(&format!(
                "Collection aborted after {} images: {:#}",
                session.saved_count(),
                err
            ));
            return Err(err);
        }
    };

    logger.info(&format!(
        "Collection complete. {} grayscale face images saved in {}",
        session.saved_count(),
        session.output_folder.display()
    ));
    logger.info(&format!(
        "Session ID: {}, Folder: {}",
        session.session_id,
        session.output_folder.display()
    ));

    Ok(CollectionReport {
        session_id: session.session_id,
        saved_count: session.saved_count(),
        output_folder: session.output_folder,
        stop_reason,
    })
}

fn run_loop(
    session: &mut Session,
    guard: &mut CaptureGuard<'_>,
    detector: &mut dyn FaceDetect,
    logger: &mut SessionLogger,
) -> anyhow::Result<StopReason> {
    loop {
        if session.is_complete() {
            log_target_reached(session, logger);
            return Ok(StopReason::TargetReached);
        }

        let frame = match guard.source.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                logger.error("Failed to read frame.");
                return Ok(StopReason::ReadFailure);
            }
            Err(err) => {
                logger.error(&format!("Failed to read frame: {:#}", err));
                return Ok(StopReason::ReadFailure);
            }
        };

        let (gray, faces) = detector.detect(&frame)?;
        for face in &faces {
            let Some(region) = clamp_to_frame(*face, gray.cols(), gray.rows()) else {
                logger.warn(&format!("Skipping detection outside the frame: {:?}", face));
                continue;
            };
            let face_img = crop(&gray, region)?;
            save_face(&face_img, &session.next_image_path(), logger)?;
            session.record_saved();
            if session.is_complete() {
                break;
            }
        }

        guard.preview.show(&draw_detections(&gray, &faces)?)?;

        if session.is_complete() {
            log_target_reached(session, logger);
            return Ok(StopReason::TargetReached);
        }
        if guard.preview.poll_key()? == Some(QUIT_KEY) {
            logger.info("Collection interrupted by user.");
            return Ok(StopReason::UserQuit);
        }
    }
}

fn log_target_reached(session: &Session, logger: &mut SessionLogger) {
    logger.info(&format!(
        "Target reached: {} images saved.",
        session.saved_count()
    ));
}
