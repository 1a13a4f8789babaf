use sekai_core::{ExternalOpener, Result, ViewerError};
use tauri::AppHandle;
use tauri_plugin_opener::OpenerExt;
use url::Url;

/// Hands URLs to the system default browser.
pub struct SystemBrowserOpener {
    app: AppHandle,
}

impl SystemBrowserOpener {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl ExternalOpener for SystemBrowserOpener {
    fn open_external(&self, url: &Url) -> Result<()> {
        self.app
            .opener()
            .open_url(url.as_str(), None::<&str>)
            .map_err(|e| ViewerError::host(format!("open {} externally: {}", url, e)))
    }
}
