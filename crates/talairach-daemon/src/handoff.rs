//! Moving the daemon's labels file to where the caller wants it.

use std::fs;
use std::path::{Path, PathBuf};

use talairach_types::TalError;
use tracing::{debug, info};

/// Move `from` to `to`, replacing any existing file at `to`.
///
/// Tries a rename first; when that fails (typically because the two paths
/// are on different filesystems) the file is copied and the original
/// removed.  Missing parent directories of `to` are created.
pub fn relocate(from: &Path, to: &Path) -> Result<PathBuf, TalError> {
    if let Some(parent) = to.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| TalError::io(parent, e))?;
    }

    if let Err(e) = fs::rename(from, to) {
        debug!(error = %e, "rename failed; falling back to copy");
        fs::copy(from, to).map_err(|e| {
            let culprit = if from.is_file() { to } else { from };
            TalError::io(culprit, e)
        })?;
        fs::remove_file(from).map_err(|e| TalError::io(from, e))?;
    }

    info!(from = %from.display(), to = %to.display(), "labels relocated");
    Ok(to.to_path_buf())
}
