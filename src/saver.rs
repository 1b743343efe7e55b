use crate::logger::SessionLogger;
use crate::CollectorError;
use opencv::core::Vector;
use opencv::imgcodecs;
use opencv::prelude::*;
use std::path::Path;

/// Writes `face` as a JPEG to `path` and records the write.
///
/// OpenCV reports some write failures as `false` rather than an error; both
/// surface as [`CollectorError::ImageWrite`].
pub fn save_face(face: &Mat, path: &Path, logger: &mut SessionLogger) -> anyhow::Result<()> {
    if let Err(reason) = write_jpeg(face, path) {
        logger.error(&format!(
            "Failed to save image: {}: {}",
            path.display(),
            reason
        ));
        return Err(CollectorError::ImageWrite(path.to_owned(), reason).into());
    }
    logger.info(&format!("Saved image: {}", path.display()));
    Ok(())
}

fn write_jpeg(face: &Mat, path: &Path) -> Result<(), String> {
    let path_str = path
        .to_str()
        .ok_or_else(|| "path is not valid UTF-8".to_owned())?;
    match imgcodecs::imwrite(path_str, face, &Vector::new()) {
        Ok(true) => Ok(()),
        Ok(false) => Err("encoder refused to write the file".to_owned()),
        Err(err) => Err(err.to_string()),
    }
}
