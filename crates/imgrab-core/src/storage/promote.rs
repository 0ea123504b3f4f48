//! Moving a downloaded temp file to its ranked final name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::RANK_WIDTH;

#[derive(Debug, Error)]
#[error("move {} to {}: {source}", from.display(), to.display())]
pub struct PromoteError {
    pub from: PathBuf,
    pub to: PathBuf,
    #[source]
    pub source: io::Error,
}

/// `00001-<file_name>` for rank 1.
pub fn final_file_name(rank: u32, file_name: &str) -> String {
    format!("{:0width$}-{}", rank, file_name, width = RANK_WIDTH)
}

pub fn final_path(out_dir: &Path, rank: u32, file_name: &str) -> PathBuf {
    out_dir.join(final_file_name(rank, file_name))
}

/// Moves `temp_path` to `final_path`.
///
/// Tries a rename first; the temp area usually lives on another filesystem than the output
/// directory, so a failed rename falls back to copy + remove. A partially copied final file is
/// removed before the error is returned.
pub fn promote(temp_path: &Path, final_path: &Path) -> Result<(), PromoteError> {
    let err = |source| PromoteError {
        from: temp_path.to_path_buf(),
        to: final_path.to_path_buf(),
        source,
    };

    match fs::rename(temp_path, final_path) {
        Ok(()) => return Ok(()),
        Err(e) => tracing::debug!("rename failed ({}), copying instead", e),
    }

    if let Err(e) = fs::copy(temp_path, final_path) {
        let _ = fs::remove_file(final_path);
        return Err(err(e));
    }
    if let Err(e) = fs::remove_file(temp_path) {
        // Promoted already; the temp area removal picks this up.
        tracing::debug!("remove {} after copy: {}", temp_path.display(), e);
    }
    Ok(())
}
