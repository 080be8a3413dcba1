//! File Sink
//!
//! Writes the rendered configuration to a path, replacing any existing file.

use crate::domain::ports::{AsyncConfigSink, ConfigSink};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::fs::Permissions;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Owner read/write, group and world read
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Sink that writes to a file on the local file system
///
/// The write is not atomic: a failure part way through can leave a
/// truncated file, which the caller is expected to remove.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    mode: u32,
}

impl FileSink {
    /// Create a sink writing to `path` with mode `0644`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_mode(path, DEFAULT_FILE_MODE)
    }

    /// Create a sink writing to `path` with the given Unix mode
    pub fn with_mode(path: impl AsRef<Path>, mode: u32) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            mode,
        }
    }

    /// Target path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unix permission bits applied after writing
    pub fn mode(&self) -> u32 {
        self.mode
    }

    fn sink_error(&self, source: std::io::Error) -> Error {
        Error::Sink {
            path: self.path.clone(),
            source,
        }
    }

    #[cfg(unix)]
    fn permissions(&self) -> Option<Permissions> {
        use std::os::unix::fs::PermissionsExt;
        Some(Permissions::from_mode(self.mode))
    }

    #[cfg(not(unix))]
    fn permissions(&self) -> Option<Permissions> {
        None
    }
}

impl ConfigSink for FileSink {
    fn write(&self, bytes: &[u8]) -> Result<()> {
        std::fs::write(&self.path, bytes).map_err(|e| self.sink_error(e))?;

        // The mode only applies on creation, so set it explicitly for
        // files that already existed
        if let Some(perms) = self.permissions() {
            std::fs::set_permissions(&self.path, perms).map_err(|e| self.sink_error(e))?;
        }

        debug!("Wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[async_trait]
impl AsyncConfigSink for FileSink {
    async fn write(&self, bytes: &[u8]) -> Result<()> {
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| self.sink_error(e))?;

        if let Some(perms) = self.permissions() {
            tokio::fs::set_permissions(&self.path, perms)
                .await
                .map_err(|e| self.sink_error(e))?;
        }

        debug!("Wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    #[test]
    fn test_write_replaces_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("r0.res");
        std::fs::write(&path, b"old contents that are longer").unwrap();

        let sink = FileSink::new(&path);
        ConfigSink::write(&sink, b"new").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_sets_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("r0.res");
        std::fs::write(&path, b"x").unwrap();
        std::fs::set_permissions(&path, Permissions::from_mode(0o600)).unwrap();

        ConfigSink::write(&FileSink::new(&path), b"resource r0 {}").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, DEFAULT_FILE_MODE);
    }

    #[test]
    fn test_write_into_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope").join("r0.res");

        let err = ConfigSink::write(&FileSink::new(&path), b"x").unwrap_err();
        assert_matches!(err, Error::Sink { path: ref p, .. } if *p == path);
    }

    #[tokio::test]
    async fn test_async_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("r0.res");

        let sink = FileSink::with_mode(&path, 0o640);
        AsyncConfigSink::write(&sink, b"resource r0 {}").await.unwrap();

        assert_eq!(
            tokio::fs::read_to_string(&path).await.unwrap(),
            "resource r0 {}"
        );
        assert_eq!(AsyncConfigSink::describe(&sink), path.display().to_string());
    }
}
