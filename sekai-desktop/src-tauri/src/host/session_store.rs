use async_trait::async_trait;
use sekai_core::{Result, SessionStore};
use tauri::AppHandle;

use super::{engine, main_window};

/// Which website data an engine clear removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    /// HTTP disk and memory caches. Cookies and storage survive.
    Cache,
    /// Every kind of persisted website data.
    Everything,
}

/// [`SessionStore`] over the main window's persistent browsing session.
///
/// Both operations go to the engine's website data store and resolve only
/// when the engine reports the clear as finished.
pub struct WebviewSessionStore {
    app: AppHandle,
}

impl WebviewSessionStore {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }

    async fn clear(&self, scope: ClearScope) -> Result<()> {
        let window = main_window(&self.app)?;
        tracing::debug!("[SessionStore] Clearing {:?}", scope);
        engine::clear_website_data(&window, scope).await
    }
}

#[async_trait]
impl SessionStore for WebviewSessionStore {
    async fn clear_cache(&self) -> Result<()> {
        self.clear(ClearScope::Cache).await
    }

    async fn clear_storage(&self) -> Result<()> {
        self.clear(ClearScope::Everything).await
    }
}
