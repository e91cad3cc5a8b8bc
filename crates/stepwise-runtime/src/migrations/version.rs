use std::path::{Path, PathBuf};

use tracing::debug;

use stepwise_core::Result;

/// Persisted record of the current version.
///
/// The marker file holds the decimal version string. A missing file,
/// unreadable content, or a non-numeric value all read as version 0.
pub struct VersionStore {
    path: PathBuf,
}

impl VersionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the marker file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current version.
    pub fn current(&self) -> u32 {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => content.trim().parse().unwrap_or_else(|_| {
                debug!("Version marker {:?} is not numeric, treating as 0", self.path);
                0
            }),
            Err(e) => {
                debug!("Version marker {:?} unreadable ({}), treating as 0", self.path, e);
                0
            }
        }
    }

    /// Overwrite the marker with the given version.
    pub fn set(&self, version: u32) -> Result<()> {
        std::fs::write(&self.path, version.to_string())?;
        Ok(())
    }
}
