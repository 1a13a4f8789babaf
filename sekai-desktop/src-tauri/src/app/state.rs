use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sekai_core::{NotificationBridge, SessionPolicy, ViewerConfig, WindowLifecycle};
use sekai_infrastructure::ViewerPaths;

/// Application state shared across Tauri commands and event handlers.
pub struct AppState {
    pub config: ViewerConfig,
    pub paths: ViewerPaths,
    pub policy: Arc<SessionPolicy>,
    pub lifecycle: Arc<WindowLifecycle>,
    pub notifications: Arc<NotificationBridge>,
    quitting: AtomicBool,
}

impl AppState {
    pub fn new(
        config: ViewerConfig,
        paths: ViewerPaths,
        policy: Arc<SessionPolicy>,
        lifecycle: Arc<WindowLifecycle>,
        notifications: Arc<NotificationBridge>,
    ) -> Self {
        Self {
            config,
            paths,
            policy,
            lifecycle,
            notifications,
            quitting: AtomicBool::new(false),
        }
    }

    /// Marks an explicit quit, which overrides the stay-resident behavior
    /// on macOS.
    pub fn begin_quit(&self) {
        self.quitting.store(true, Ordering::SeqCst);
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting.load(Ordering::SeqCst)
    }
}
