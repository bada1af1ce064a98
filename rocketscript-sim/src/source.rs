//! Directory-backed trajectory source

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rocketscript_core::traits::{SourceError, TrajectorySource};

/// Reads `<root>/<name>` files
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Read trajectories from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the trajectories are read from
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TrajectorySource for DirectorySource {
    fn read(&self, name: &str) -> Result<String, SourceError> {
        // Names are plain file names, never paths
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return Err(SourceError::NotFound);
        }

        let bytes = fs::read(self.root.join(name)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound,
            _ => SourceError::Io,
        })?;
        String::from_utf8(bytes).map_err(|_| SourceError::InvalidUtf8)
    }
}
