//! Viewer configuration model.
//!
//! Every field has a default so a missing or partial `config.toml` still
//! yields a usable configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, ViewerError};
use crate::origin::TrustedOrigin;

pub const DEFAULT_TRUSTED_ORIGIN: &str = "https://pjsekai.world";
pub const DEFAULT_REPOSITORY_URL: &str = "https://github.com/yunfie-twitter/pjsekai-viewer";
pub const DEFAULT_PARTITION: &str = "pjsekai";
pub const DEFAULT_CACHE_CLEAR_INTERVAL_MINUTES: u64 = 30;
/// One week.
pub const MAX_CACHE_CLEAR_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub trusted_origin: String,
    pub about_path: String,
    pub repository_url: String,
    pub user_agent: String,
    pub partition: String,
    pub cache_clear_interval_minutes: u64,
    /// Hosts that may be navigated to in place (login redirects etc.).
    pub extra_in_app_hosts: Vec<String>,
    pub smooth_scroll: bool,
    pub devtools: bool,
    pub window: WindowConfig,
    pub zoom: ZoomConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            trusted_origin: DEFAULT_TRUSTED_ORIGIN.to_string(),
            about_path: "/about".to_string(),
            repository_url: DEFAULT_REPOSITORY_URL.to_string(),
            user_agent: default_user_agent(),
            partition: DEFAULT_PARTITION.to_string(),
            cache_clear_interval_minutes: DEFAULT_CACHE_CLEAR_INTERVAL_MINUTES,
            extra_in_app_hosts: Vec::new(),
            smooth_scroll: true,
            devtools: true,
            window: WindowConfig::default(),
            zoom: ZoomConfig::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "PJSEKAI Viewer".to_string(),
            width: 1280.0,
            height: 800.0,
            min_width: 480.0,
            min_height: 360.0,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ZoomConfig {
    pub step: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            step: 0.1,
            min: 0.25,
            max: 5.0,
        }
    }
}

fn default_user_agent() -> String {
    format!(
        "Mozilla/5.0 (compatible) AppleWebKit/537.36 (KHTML, like Gecko) PJSEKAIViewer/{}",
        env!("CARGO_PKG_VERSION")
    )
}

impl ViewerConfig {
    /// Checks the values that would otherwise fail late at window creation.
    pub fn validate(&self) -> Result<()> {
        TrustedOrigin::parse(&self.trusted_origin)?;
        if self.cache_clear_interval_minutes == 0 {
            return Err(ViewerError::config(
                "cache_clear_interval_minutes must be greater than zero",
            ));
        }
        if self.cache_clear_interval_minutes > MAX_CACHE_CLEAR_INTERVAL_MINUTES {
            return Err(ViewerError::config(format!(
                "cache_clear_interval_minutes must be at most {}",
                MAX_CACHE_CLEAR_INTERVAL_MINUTES
            )));
        }
        if self.partition.trim().is_empty() {
            return Err(ViewerError::config("partition must not be empty"));
        }
        if !(self.zoom.min > 0.0 && self.zoom.min <= 1.0 && self.zoom.max >= 1.0) {
            return Err(ViewerError::config(format!(
                "zoom range {}..{} must contain 1.0",
                self.zoom.min, self.zoom.max
            )));
        }
        Ok(())
    }

    pub fn trusted_origin(&self) -> Result<TrustedOrigin> {
        TrustedOrigin::parse(&self.trusted_origin)
    }

    pub fn about_url(&self) -> Result<Url> {
        self.trusted_origin()?.join(&self.about_path)
    }

    pub fn repository_url(&self) -> Result<Url> {
        Url::parse(&self.repository_url)
            .map_err(|e| ViewerError::invalid_url(&self.repository_url, e.to_string()))
    }

    pub fn cache_clear_interval(&self) -> Duration {
        Duration::from_secs(self.cache_clear_interval_minutes.saturating_mul(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.cache_clear_interval(), Duration::from_secs(30 * 60));
        assert_eq!(
            config.about_url().unwrap().as_str(),
            "https://pjsekai.world/about"
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ViewerConfig = toml::from_str(
            r#"
            cache_clear_interval_minutes = 5

            [window]
            width = 1600.0
            "#,
        )
        .unwrap();

        assert_eq!(config.cache_clear_interval_minutes, 5);
        assert_eq!(config.window.width, 1600.0);
        assert_eq!(config.window.height, 800.0);
        assert_eq!(config.trusted_origin, DEFAULT_TRUSTED_ORIGIN);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = ViewerConfig {
            cache_clear_interval_minutes: 0,
            ..ViewerConfig::default()
        };
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_validate_rejects_oversized_interval() {
        let week = ViewerConfig {
            cache_clear_interval_minutes: MAX_CACHE_CLEAR_INTERVAL_MINUTES,
            ..ViewerConfig::default()
        };
        week.validate().unwrap();

        let config = ViewerConfig {
            cache_clear_interval_minutes: u64::MAX,
            ..ViewerConfig::default()
        };
        assert!(config.validate().unwrap_err().is_config());
        assert_eq!(config.cache_clear_interval(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_validate_rejects_file_origin() {
        let config = ViewerConfig {
            trusted_origin: "file:///home".to_string(),
            ..ViewerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
