//! Tauri-backed implementations of the core host traits.

mod click_sink;
mod completion;
mod notifier;
mod opener;
mod prompt;
mod session_store;
#[cfg(target_os = "linux")]
mod webkit;
#[cfg(windows)]
mod webview2;
mod window;
#[cfg(target_os = "macos")]
mod wkwebview;

#[cfg(target_os = "linux")]
use webkit as engine;
#[cfg(windows)]
use webview2 as engine;
#[cfg(target_os = "macos")]
use wkwebview as engine;

#[cfg(not(any(target_os = "linux", windows, target_os = "macos")))]
mod engine {
    use sekai_core::{Result, ViewerError};
    use tauri::WebviewWindow;

    use super::session_store::ClearScope;

    pub async fn clear_website_data(_window: &WebviewWindow, scope: ClearScope) -> Result<()> {
        Err(ViewerError::storage(format!(
            "clearing {:?} is not supported on this platform",
            scope
        )))
    }
}

pub use click_sink::WebviewClickSink;
pub use notifier::NotifyRustNotifier;
pub use opener::SystemBrowserOpener;
pub use prompt::DialogConfirmPrompt;
pub use session_store::WebviewSessionStore;
pub use window::TauriWindowHost;

use sekai_core::{LifecycleEvent, ViewerError};
use tauri::{AppHandle, Manager, WebviewWindow};

use crate::app::AppState;

/// Label of the single main window.
pub const MAIN_WINDOW_LABEL: &str = "main";

pub(crate) fn main_window(app: &AppHandle) -> sekai_core::Result<WebviewWindow> {
    app.get_webview_window(MAIN_WINDOW_LABEL)
        .ok_or(ViewerError::NoMainWindow)
}

pub(crate) fn host_error(action: &str, e: tauri::Error) -> ViewerError {
    ViewerError::host(format!("{} failed: {}", action, e))
}

/// Routes a toolkit signal into the lifecycle, if the app is set up.
pub(crate) fn dispatch(app: &AppHandle, event: LifecycleEvent) {
    match app.try_state::<AppState>() {
        Some(state) => state.lifecycle.dispatch(event),
        None => tracing::debug!("[Host] Dropping {:?} before setup finished", event),
    }
}
