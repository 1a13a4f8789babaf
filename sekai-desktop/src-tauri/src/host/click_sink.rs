use sekai_core::{ClickSink, NotificationId};
use tauri::AppHandle;

use super::main_window;
use crate::bridge::click_script;

/// Delivers notification clicks to the page and raises the main window.
pub struct WebviewClickSink {
    app: AppHandle,
}

impl WebviewClickSink {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl ClickSink for WebviewClickSink {
    fn dispatch_click(&self, id: NotificationId) {
        let Ok(window) = main_window(&self.app) else {
            tracing::debug!("[Notification] Click {} after main window closed", id);
            return;
        };
        if let Err(e) = window.eval(&click_script(id)) {
            tracing::warn!("[Notification] Failed to deliver click {}: {}", id, e);
        }
        let _ = window.unminimize();
        let _ = window.set_focus();
    }
}
