use anyhow::Context;
use std::path::Path;

pub const DEFAULT_CACHE_DIR: &str = "model/cache";

/// Deletes every regular file directly inside `dir` except `keep`.
/// Subdirectories are left alone. Returns the number of files removed.
pub fn wipe_cache_dir(dir: impl AsRef<Path>, keep: Option<&Path>) -> anyhow::Result<usize> {
    let dir = dir.as_ref();
    let keep = keep.and_then(|path| path.canonicalize().ok());
    let mut removed = 0;

    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read {:?}", dir))? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if keep.is_some() && path.canonicalize().ok() == keep {
            continue;
        }
        std::fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
        log::debug!("Removed {:?}", path);
        removed += 1;
    }
    Ok(removed)
}
