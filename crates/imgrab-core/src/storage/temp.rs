//! Process-scoped ephemeral directory for in-flight downloads.

use anyhow::{Context, Result};
use std::path::Path;

const PREFIX: &str = "imgrab";

/// Owns the temporary directory; dropping or closing it removes everything left inside,
/// including downloads that were never promoted.
#[derive(Debug)]
pub struct TempArea {
    dir: tempfile::TempDir,
}

impl TempArea {
    /// Create a fresh directory under `root`, or under the system temp dir if `root` is None.
    pub fn create(root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(PREFIX);
        let dir = match root {
            Some(root) => builder
                .tempdir_in(root)
                .with_context(|| format!("failed to create temp dir in {}", root.display()))?,
            None => builder.tempdir().context("failed to create temp dir")?,
        };
        tracing::debug!("temp area at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory and its contents, reporting failures instead of ignoring them.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .with_context(|| format!("failed to remove temp dir {}", path.display()))
    }
}
