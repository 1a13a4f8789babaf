//! Unified path management for viewer files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/sekai-viewer/          # Config directory
//! ├── config.toml                  # Viewer configuration
//! ├── window-state.toml            # Last main window geometry
//! └── logs/
//!     └── sekai-desktop.log.YYYY-MM-DD
//!
//! ~/.local/share/sekai-viewer/     # Data directory
//! └── partitions/
//!     └── <partition>/             # Persistent browsing session
//! ```

use std::path::{Path, PathBuf};

use sekai_core::{Result, ViewerError};

const APP_DIR: &str = "sekai-viewer";

/// Resolves every on-disk location the viewer uses.
///
/// Built from the platform directories by default; tests pass explicit
/// roots via [`ViewerPaths::with_roots`].
#[derive(Debug, Clone)]
pub struct ViewerPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl ViewerPaths {
    /// Uses the platform config and data directories.
    pub fn from_platform() -> Result<Self> {
        let config_root = dirs::config_dir()
            .ok_or_else(|| ViewerError::config("Cannot find config directory"))?;
        let data_root =
            dirs::data_dir().ok_or_else(|| ViewerError::config("Cannot find data directory"))?;
        Ok(Self::with_roots(config_root, data_root))
    }

    pub fn with_roots(config_root: impl AsRef<Path>, data_root: impl AsRef<Path>) -> Self {
        Self {
            config_dir: config_root.as_ref().join(APP_DIR),
            data_dir: data_root.as_ref().join(APP_DIR),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn window_state_file(&self) -> PathBuf {
        self.config_dir.join("window-state.toml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }

    /// Directory backing a named persistent session.
    ///
    /// Path separators and dots in the partition name are replaced so a
    /// configured name cannot point outside `partitions/`.
    pub fn partition_dir(&self, partition: &str) -> PathBuf {
        let safe: String = partition
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.data_dir.join("partitions").join(safe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let paths = ViewerPaths::with_roots("/cfg", "/data");
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/cfg/sekai-viewer/config.toml")
        );
        assert_eq!(paths.logs_dir(), PathBuf::from("/cfg/sekai-viewer/logs"));
        assert_eq!(
            paths.partition_dir("pjsekai"),
            PathBuf::from("/data/sekai-viewer/partitions/pjsekai")
        );
    }

    #[test]
    fn test_partition_name_cannot_escape() {
        let paths = ViewerPaths::with_roots("/cfg", "/data");
        let dir = paths.partition_dir("../../etc");
        assert!(dir.starts_with("/data/sekai-viewer/partitions"));
        assert_eq!(dir.file_name().unwrap(), "______etc");
    }
}
