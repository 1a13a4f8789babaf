//! Native notifications through `notify-rust`.
//!
//! Click reporting needs a notification server that supports actions, so
//! clicks are only delivered on Linux. Elsewhere the notification is shown
//! and the click callback is dropped.

use sekai_core::{ClickCallback, NativeNotifier, NotificationRequest, Result, ViewerError};

pub struct NotifyRustNotifier {
    app_name: String,
}

impl NotifyRustNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    fn build(&self, request: &NotificationRequest) -> notify_rust::Notification {
        let mut notification = notify_rust::Notification::new();
        notification.appname(&self.app_name).summary(&request.title);
        if let Some(body) = request.body.as_deref() {
            notification.body(body);
        }
        // Only local icon names or paths are understood natively.
        if let Some(icon) = request.icon.as_deref().filter(|icon| is_local_icon(icon)) {
            notification.icon(icon);
        }

        #[cfg(all(unix, not(target_os = "macos")))]
        if request.silent {
            notification.hint(notify_rust::Hint::SuppressSound(true));
        }
        #[cfg(target_os = "macos")]
        if !request.silent {
            notification.sound_name("default");
        }

        notification
    }
}

fn is_local_icon(icon: &str) -> bool {
    !icon.contains("://") && !icon.starts_with("data:")
}

impl NativeNotifier for NotifyRustNotifier {
    fn is_supported(&self) -> bool {
        true
    }

    fn show(&self, request: &NotificationRequest, on_click: ClickCallback) -> Result<()> {
        let mut notification = self.build(request);

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            notification.action("default", "Open");
            let handle = notification
                .show()
                .map_err(|e| ViewerError::notification(e.to_string()))?;
            std::thread::Builder::new()
                .name("notification-click".to_string())
                .spawn(move || {
                    handle.wait_for_action(|action| {
                        if action == "default" {
                            on_click();
                        }
                    })
                })
                .map_err(|e| ViewerError::notification(e.to_string()))?;
            Ok(())
        }

        #[cfg(not(all(unix, not(target_os = "macos"))))]
        {
            drop(on_click);
            notification
                .show()
                .map(|_| ())
                .map_err(|e| ViewerError::notification(e.to_string()))
        }
    }
}
