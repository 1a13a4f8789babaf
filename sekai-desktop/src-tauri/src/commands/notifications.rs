use sekai_core::{NotificationId, NotificationRequest};
use tauri::{State, WebviewWindow};

use crate::app::AppState;

/// Shows a page notification natively.
///
/// The origin is taken from the calling webview, never from the page's
/// arguments. Returns the id used to route a later click back to the page,
/// or `None` when nothing was shown.
#[tauri::command]
pub fn show_native_notification(
    request: NotificationRequest,
    webview: WebviewWindow,
    state: State<'_, AppState>,
) -> Option<NotificationId> {
    let origin = match webview.url() {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::warn!("[Notification] Cannot resolve caller origin: {}", e);
            return None;
        }
    };
    state.notifications.deliver(&origin, request)
}
