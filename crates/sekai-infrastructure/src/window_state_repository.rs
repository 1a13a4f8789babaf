//! Main window geometry persisted across runs.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use sekai_core::{Result, WindowGeometry, WindowStateRepository};
use serde::{Deserialize, Serialize};

use crate::storage::AtomicTomlFile;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct WindowStateFile {
    saved_at: DateTime<Utc>,
    geometry: WindowGeometry,
}

/// Stores [`WindowGeometry`] in `window-state.toml`.
pub struct TomlWindowStateRepository {
    file: AtomicTomlFile<WindowStateFile>,
}

impl TomlWindowStateRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }
}

impl WindowStateRepository for TomlWindowStateRepository {
    fn load(&self) -> Result<Option<WindowGeometry>> {
        let Some(state) = self.file.load()? else {
            return Ok(None);
        };

        let geometry = state.geometry;
        // A degenerate size would produce an unusable window.
        if geometry.width < 100.0 || geometry.height < 100.0 {
            tracing::debug!("[WindowState] Discarding degenerate geometry {:?}", geometry);
            return Ok(None);
        }
        Ok(Some(geometry))
    }

    fn save(&self, geometry: &WindowGeometry) -> Result<()> {
        self.file.save(&WindowStateFile {
            saved_at: Utc::now(),
            geometry: geometry.clone(),
        })
    }
}
