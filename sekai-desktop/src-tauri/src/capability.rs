//! Runtime IPC capability for the trusted remote origin.
//!
//! Remote pages may only call the commands listed in the app manifest
//! (`build.rs`). This capability grants the notification command to the
//! main window while it shows the configured origin.

use sekai_core::TrustedOrigin;
use tauri::ipc::CapabilityBuilder;
use tauri::{AppHandle, Manager};

use crate::host::MAIN_WINDOW_LABEL;

const IDENTIFIER: &str = "remote-bridge";
const NOTIFICATION_PERMISSION: &str = "allow-show-native-notification";

/// URL pattern covering every page under `origin`.
pub fn remote_bridge_pattern(origin: &TrustedOrigin) -> String {
    format!("{}/*", origin.url().as_str().trim_end_matches('/'))
}

/// Grants the notification command to pages under `origin`.
pub fn install(app: &AppHandle, origin: &TrustedOrigin) -> tauri::Result<()> {
    let pattern = remote_bridge_pattern(origin);
    app.add_capability(
        CapabilityBuilder::new(IDENTIFIER)
            .remote(pattern.clone())
            .window(MAIN_WINDOW_LABEL)
            .permission(NOTIFICATION_PERMISSION),
    )?;
    tracing::info!("[Capability] Notification bridge enabled for {}", pattern);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(origin: &str) -> String {
        remote_bridge_pattern(&TrustedOrigin::parse(origin).unwrap())
    }

    #[test]
    fn test_pattern_follows_configured_origin() {
        assert_eq!(pattern("https://pjsekai.world"), "https://pjsekai.world/*");
        assert_eq!(pattern("https://pjsekai.world/"), "https://pjsekai.world/*");
        assert_eq!(pattern("http://localhost:8080"), "http://localhost:8080/*");
        assert_eq!(pattern("https://example.com/viewer/"), "https://example.com/viewer/*");
    }
}
