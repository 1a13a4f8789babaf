use async_trait::async_trait;
use sekai_core::ConfirmPrompt;
use tauri::AppHandle;
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tokio::sync::oneshot;

use super::MAIN_WINDOW_LABEL;

const CONFIRM_TITLE: &str = "Clear all data";
const CONFIRM_MESSAGE: &str =
    "This removes cookies, local storage and the cache, signing you out of pjsekai.world. Continue?";

/// Asks the user through a native message dialog.
pub struct DialogConfirmPrompt {
    app: AppHandle,
}

impl DialogConfirmPrompt {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

#[async_trait]
impl ConfirmPrompt for DialogConfirmPrompt {
    async fn confirm_full_clear(&self) -> bool {
        let (tx, rx) = oneshot::channel();

        let mut dialog = self
            .app
            .dialog()
            .message(CONFIRM_MESSAGE)
            .title(CONFIRM_TITLE)
            .kind(MessageDialogKind::Warning)
            .buttons(MessageDialogButtons::OkCancelCustom(
                "Clear".to_string(),
                "Cancel".to_string(),
            ));
        if let Some(window) = tauri::Manager::get_webview_window(&self.app, MAIN_WINDOW_LABEL) {
            dialog = dialog.parent(&window);
        }
        dialog.show(move |confirmed| {
            let _ = tx.send(confirmed);
        });

        // A dismissed dialog counts as a refusal.
        rx.await.unwrap_or(false)
    }
}
