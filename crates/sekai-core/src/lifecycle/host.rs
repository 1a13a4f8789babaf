use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ViewerConfig;
use crate::error::Result;
use crate::policy::SessionConfig;

/// Native window surface driven by [`WindowLifecycle`](super::WindowLifecycle).
///
/// Implementations forward to the windowing toolkit. They must not call back
/// into the lifecycle synchronously; toolkit events are delivered later via
/// `WindowLifecycle::dispatch`.
pub trait WindowHost: Send + Sync {
    /// Creates the main window hidden and starts loading `spec.url`.
    fn create_main(&self, spec: &MainWindowSpec) -> Result<()>;
    fn show_main(&self) -> Result<()>;
    fn reload_main(&self) -> Result<()>;
    fn navigate_main(&self, url: &Url) -> Result<()>;
    fn go_back(&self) -> Result<()>;
    fn go_forward(&self) -> Result<()>;
    fn set_zoom(&self, factor: f64) -> Result<()>;
    /// Flips fullscreen and returns the new state.
    fn toggle_fullscreen(&self) -> Result<bool>;
    /// Current geometry of the main window, if it still exists.
    fn main_geometry(&self) -> Option<WindowGeometry>;

    fn open_inspector(&self) -> Result<()>;
    fn focus_inspector(&self) -> Result<()>;
    fn close_inspector(&self) -> Result<()>;
    /// Whether the inspector surface still exists on the native side.
    fn inspector_alive(&self) -> bool;
}

/// Position and size of the main window, persisted across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub maximized: bool,
}

/// Storage for [`WindowGeometry`].
pub trait WindowStateRepository: Send + Sync {
    fn load(&self) -> Result<Option<WindowGeometry>>;
    fn save(&self, geometry: &WindowGeometry) -> Result<()>;
}

/// Everything the host needs to build the main window.
#[derive(Debug, Clone, PartialEq)]
pub struct MainWindowSpec {
    pub url: Url,
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub session: SessionConfig,
    pub devtools: bool,
    pub geometry: Option<WindowGeometry>,
}

impl MainWindowSpec {
    pub fn from_config(config: &ViewerConfig, session: SessionConfig) -> Result<Self> {
        Ok(Self {
            url: config.trusted_origin()?.url().clone(),
            title: config.window.title.clone(),
            width: config.window.width,
            height: config.window.height,
            min_width: config.window.min_width,
            min_height: config.window.min_height,
            session,
            devtools: config.devtools,
            geometry: None,
        })
    }
}
