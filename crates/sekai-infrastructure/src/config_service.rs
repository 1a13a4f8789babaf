//! Loading of `config.toml`.

use std::path::PathBuf;

use sekai_core::{Result, ViewerConfig};

use crate::storage::AtomicTomlFile;

pub struct ConfigService {
    file: AtomicTomlFile<ViewerConfig>,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    /// Loads the configuration, falling back to defaults.
    ///
    /// The viewer must always start, so a missing, malformed or invalid file
    /// is logged and replaced by [`ViewerConfig::default`]. A missing file is
    /// written out with the defaults so it can be edited.
    pub fn load_or_default(&self) -> ViewerConfig {
        match self.file.load() {
            Ok(Some(config)) => match config.validate() {
                Ok(()) => {
                    tracing::info!("[Config] Loaded {:?}", self.file.path());
                    config
                }
                Err(e) => {
                    tracing::warn!("[Config] Invalid {:?}, using defaults: {}", self.file.path(), e);
                    ViewerConfig::default()
                }
            },
            Ok(None) => {
                let config = ViewerConfig::default();
                if let Err(e) = self.file.save(&config) {
                    tracing::warn!("[Config] Could not write default config: {}", e);
                }
                config
            }
            Err(e) => {
                tracing::warn!("[Config] Unreadable {:?}, using defaults: {}", self.file.path(), e);
                ViewerConfig::default()
            }
        }
    }

    pub fn save(&self, config: &ViewerConfig) -> Result<()> {
        config.validate()?;
        self.file.save(config)
    }
}
