use crate::CollectorError;
use anyhow::Context;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DEFAULT_OUTPUT_DIR: &str = "Datasets";

/// One collection run for a single user.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_name: String,
    pub session_id: Uuid,
    pub output_folder: PathBuf,
    pub target_count: usize,
    saved_count: usize,
}

impl Session {
    /// Creates `output_dir/<user_name>_<session_id>` with a fresh id.
    pub fn prepare(
        output_dir: impl AsRef<Path>,
        user_name: &str,
        target_count: usize,
    ) -> anyhow::Result<Self> {
        validate_user_name(user_name)?;
        let session_id = Uuid::new_v4();
        let output_folder = output_dir
            .as_ref()
            .join(format!("{}_{}", user_name, session_id));
        std::fs::create_dir_all(&output_folder)
            .with_context(|| format!("Failed to create output folder {:?}", output_folder))?;

        Ok(Self {
            user_name: user_name.to_owned(),
            session_id,
            output_folder,
            target_count,
            saved_count: 0,
        })
    }

    pub fn saved_count(&self) -> usize {
        self.saved_count
    }

    pub fn remaining(&self) -> usize {
        self.target_count.saturating_sub(self.saved_count)
    }

    pub fn is_complete(&self) -> bool {
        self.saved_count >= self.target_count
    }

    /// Path the next saved image will be written to.
    pub fn next_image_path(&self) -> PathBuf {
        self.output_folder
            .join(image_file_name(&self.user_name, self.saved_count))
    }

    pub(crate) fn record_saved(&mut self) {
        debug_assert!(self.saved_count < self.target_count);
        self.saved_count += 1;
    }
}

pub fn image_file_name(user_name: &str, index: usize) -> String {
    format!("{}_{:03}.jpg", user_name, index)
}

/// User names end up in file and folder names.
pub fn validate_user_name(user_name: &str) -> Result<(), CollectorError> {
    let bad = user_name.is_empty()
        || user_name == "."
        || user_name == ".."
        || user_name.contains(['/', '\\']);
    if bad {
        return Err(CollectorError::InvalidUserName(user_name.to_owned()));
    }
    Ok(())
}
