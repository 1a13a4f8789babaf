//! Main/inspector window lifecycle.
//!
//! `WindowLifecycle` owns every piece of mutable window state (the main
//! window's state machine, the inspector handle, zoom) so no other component
//! keeps its own reference to a window.

mod events;
mod host;

pub use events::{LifecycleEvent, MainWindowState};
pub use host::{MainWindowSpec, WindowGeometry, WindowHost, WindowStateRepository};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use url::Url;

use crate::error::{Result, ViewerError};
use crate::janitor::{CacheJanitor, ConfirmPrompt};
use crate::navigation::{CrashResponse, NavigationGuard, NewWindowAction, RendererExitReason};
use crate::zoom::ZoomLevel;

/// Result of the user-invoked full clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullClearOutcome {
    /// The user declined; nothing was touched.
    Cancelled,
    /// Cache and storage were cleared (or attempted) and the page reloaded.
    Cleared,
}

struct LifecycleState {
    main: MainWindowState,
    visible: bool,
    inspector_open: bool,
    zoom: ZoomLevel,
}

pub struct WindowLifecycle {
    host: Arc<dyn WindowHost>,
    guard: Arc<NavigationGuard>,
    janitor: CacheJanitor,
    template: MainWindowSpec,
    about_url: Url,
    window_state: Option<Arc<dyn WindowStateRepository>>,
    state: Mutex<LifecycleState>,
}

impl WindowLifecycle {
    pub fn new(
        host: Arc<dyn WindowHost>,
        guard: Arc<NavigationGuard>,
        janitor: CacheJanitor,
        template: MainWindowSpec,
        about_url: Url,
        zoom: ZoomLevel,
    ) -> Self {
        Self {
            host,
            guard,
            janitor,
            template,
            about_url,
            window_state: None,
            state: Mutex::new(LifecycleState {
                main: MainWindowState::Uninitialized,
                visible: false,
                inspector_open: false,
                zoom,
            }),
        }
    }

    /// Persists and restores main window geometry through `repository`.
    pub fn with_window_state(mut self, repository: Arc<dyn WindowStateRepository>) -> Self {
        self.window_state = Some(repository);
        self
    }

    fn lock(&self) -> MutexGuard<'_, LifecycleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ============================================================================
    // Queries
    // ============================================================================

    pub fn main_state(&self) -> MainWindowState {
        self.lock().main
    }

    pub fn is_main_visible(&self) -> bool {
        self.lock().visible
    }

    pub fn is_inspector_open(&self) -> bool {
        self.lock().inspector_open
    }

    pub fn zoom_factor(&self) -> f64 {
        self.lock().zoom.factor()
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn janitor(&self) -> &CacheJanitor {
        &self.janitor
    }

    pub fn home_url(&self) -> &Url {
        &self.template.url
    }

    // ============================================================================
    // Window creation
    // ============================================================================

    /// Creates the main window unless one is already alive.
    ///
    /// Returns `Ok(true)` if a window was created. The window stays hidden
    /// until the first `PageReady`.
    pub fn create_main_window(&self) -> Result<bool> {
        {
            let mut state = self.lock();
            if state.main.is_alive() {
                tracing::debug!("[Lifecycle] Main window already exists");
                return Ok(false);
            }
            state.main = MainWindowState::Loading;
            state.visible = false;
            state.inspector_open = false;
        }

        let mut spec = self.template.clone();
        spec.geometry = self.load_geometry();

        tracing::info!("[Lifecycle] Creating main window for {}", spec.url);
        if let Err(e) = self.host.create_main(&spec) {
            tracing::error!("[Lifecycle] Failed to create main window: {}", e);
            self.lock().main = MainWindowState::Closed;
            return Err(e);
        }

        let zoom = self.lock().zoom.factor();
        if zoom != 1.0 {
            self.log_host_error("restore zoom", self.host.set_zoom(zoom));
        }

        Ok(true)
    }

    /// Opens the inspector for the main window, or focuses it if it is
    /// already open.
    pub fn open_inspector_window(&self) -> Result<()> {
        let focus_existing = {
            let mut state = self.lock();
            if !state.main.is_alive() {
                return Err(ViewerError::NoMainWindow);
            }
            if state.inspector_open && !self.host.inspector_alive() {
                tracing::debug!("[Lifecycle] Inspector went away without notice, clearing");
                state.inspector_open = false;
            }
            let existing = state.inspector_open;
            state.inspector_open = true;
            existing
        };

        if focus_existing {
            return self.host.focus_inspector();
        }

        tracing::info!("[Lifecycle] Opening inspector");
        let opened = self.host.open_inspector();
        if opened.is_err() {
            self.lock().inspector_open = false;
        }
        opened
    }

    // ============================================================================
    // Event dispatch
    // ============================================================================

    pub fn dispatch(&self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::PageReady => self.on_page_ready(),
            LifecycleEvent::LoadFailed { url, reason } => self.guard.on_load_failed(&url, &reason),
            LifecycleEvent::RendererExited(reason) => self.on_renderer_exited(&reason),
            LifecycleEvent::MainCloseRequested => self.on_main_close_requested(),
            LifecycleEvent::MainClosed => self.on_main_closed(),
            LifecycleEvent::InspectorClosed => self.lock().inspector_open = false,
            LifecycleEvent::Activate { open_windows } => self.on_activate(open_windows),
        }
    }

    fn on_page_ready(&self) {
        let first_show = {
            let mut state = self.lock();
            if state.main != MainWindowState::Loading {
                return;
            }
            state.main = MainWindowState::Ready;
            let first = !state.visible;
            state.visible = true;
            first
        };

        tracing::debug!("[Lifecycle] Main window ready");
        if first_show {
            self.log_host_error("show main window", self.host.show_main());
        }
        if self.janitor.start() {
            tracing::info!(
                "[Lifecycle] Cache janitor running every {}s",
                self.janitor.period().as_secs()
            );
        }
    }

    fn on_renderer_exited(&self, reason: &RendererExitReason) {
        if !self.lock().main.is_alive() {
            return;
        }
        if self.guard.on_renderer_exit(reason) == CrashResponse::Reload {
            self.lock().main = MainWindowState::Loading;
            self.log_host_error("reload after renderer exit", self.host.reload_main());
            return;
        }

        // A clean exit ends the page for good; unknown reasons are only logged.
        if *reason == RendererExitReason::CleanExit {
            self.enter_closed("renderer exited cleanly");
        }
    }

    fn on_main_close_requested(&self) {
        self.save_geometry();

        // The inspector hangs off the main webview, so close it while that
        // still exists.
        let inspector_open = std::mem::replace(&mut self.lock().inspector_open, false);
        if inspector_open {
            self.log_host_error("close inspector", self.host.close_inspector());
        }
    }

    fn on_main_closed(&self) {
        self.enter_closed("main window closed");
    }

    /// Moves an alive main window to `Closed`. Later calls are no-ops.
    fn enter_closed(&self, why: &str) {
        let inspector_open = {
            let mut state = self.lock();
            if !state.main.is_alive() {
                return;
            }
            state.main = MainWindowState::Closed;
            state.visible = false;
            std::mem::replace(&mut state.inspector_open, false)
        };

        if self.janitor.cancel() {
            tracing::info!("[Lifecycle] Cache janitor cancelled");
        }
        if inspector_open {
            match self.host.close_inspector() {
                Err(ViewerError::NoMainWindow) => {
                    tracing::debug!("[Lifecycle] Inspector already gone with the main window");
                }
                other => self.log_host_error("close inspector", other),
            }
        }
        tracing::info!("[Lifecycle] Main window state closed: {}", why);
    }

    fn on_activate(&self, open_windows: usize) {
        if open_windows > 0 {
            return;
        }
        if let Err(e) = self.create_main_window() {
            tracing::error!("[Lifecycle] Failed to recreate main window: {}", e);
        }
    }

    // ============================================================================
    // Navigation
    // ============================================================================

    /// Handles a new-window request from the page. Never creates a window.
    pub fn handle_new_window(&self, url: &Url) -> NewWindowAction {
        let action = self.guard.on_new_window(url);
        if let NewWindowAction::NavigateInPlace(target) = &action {
            self.log_host_error("navigate in place", self.navigate(target));
        }
        action
    }

    /// Whether a main-frame navigation may proceed.
    pub fn allow_navigation(&self, url: &Url) -> bool {
        self.guard.on_navigation(url)
    }

    pub fn reload(&self) -> Result<()> {
        self.require_main()?;
        self.host.reload_main()
    }

    pub fn go_home(&self) -> Result<()> {
        let home = self.template.url.clone();
        self.navigate(&home)
    }

    pub fn open_about(&self) -> Result<()> {
        let about = self.about_url.clone();
        self.navigate(&about)
    }

    pub fn go_back(&self) -> Result<()> {
        self.require_main()?;
        self.host.go_back()
    }

    pub fn go_forward(&self) -> Result<()> {
        self.require_main()?;
        self.host.go_forward()
    }

    fn navigate(&self, url: &Url) -> Result<()> {
        self.require_main()?;
        self.host.navigate_main(url)
    }

    // ============================================================================
    // View
    // ============================================================================

    pub fn zoom_in(&self) -> Result<f64> {
        self.apply_zoom(ZoomLevel::zoom_in)
    }

    pub fn zoom_out(&self) -> Result<f64> {
        self.apply_zoom(ZoomLevel::zoom_out)
    }

    pub fn zoom_reset(&self) -> Result<f64> {
        self.apply_zoom(ZoomLevel::reset)
    }

    fn apply_zoom(&self, change: fn(&mut ZoomLevel) -> f64) -> Result<f64> {
        let factor = {
            let mut state = self.lock();
            if !state.main.is_alive() {
                return Err(ViewerError::NoMainWindow);
            }
            change(&mut state.zoom)
        };
        self.host.set_zoom(factor)?;
        Ok(factor)
    }

    pub fn toggle_fullscreen(&self) -> Result<bool> {
        self.require_main()?;
        self.host.toggle_fullscreen()
    }

    // ============================================================================
    // Cache
    // ============================================================================

    /// Evicts the resource cache, waits for it, then reloads once.
    pub async fn clear_cache_and_reload(&self) -> Result<()> {
        self.require_main()?;
        if let Err(e) = self.janitor.evict_now().await {
            tracing::warn!("[Lifecycle] Cache eviction failed: {}", e);
        }
        self.reload()
    }

    /// Destroys cache and storage after the user confirms, then reloads once.
    ///
    /// The reload is only issued after both clears have completed.
    pub async fn full_clear(&self, prompt: &dyn ConfirmPrompt) -> Result<FullClearOutcome> {
        if !prompt.confirm_full_clear().await {
            tracing::info!("[Lifecycle] Full clear cancelled by user");
            return Ok(FullClearOutcome::Cancelled);
        }

        tracing::warn!("[Lifecycle] Clearing all session data");
        if let Err(e) = self.janitor.clear_everything().await {
            tracing::error!("[Lifecycle] Full clear incomplete: {}", e);
        }

        if self.lock().main.is_alive() {
            self.host.reload_main()?;
        }
        Ok(FullClearOutcome::Cleared)
    }

    // ============================================================================
    // Shutdown
    // ============================================================================

    /// Called on process exit. Stops background work; session data is kept.
    pub fn shutdown(&self) {
        self.janitor.cancel();
        tracing::info!("[Lifecycle] Shutdown, session data preserved");
    }

    // ============================================================================
    // Helpers
    // ============================================================================

    fn require_main(&self) -> Result<()> {
        if self.lock().main.is_alive() {
            Ok(())
        } else {
            Err(ViewerError::NoMainWindow)
        }
    }

    fn load_geometry(&self) -> Option<WindowGeometry> {
        let repository = self.window_state.as_ref()?;
        match repository.load() {
            Ok(geometry) => geometry,
            Err(e) => {
                tracing::warn!("[Lifecycle] Ignoring unreadable window state: {}", e);
                None
            }
        }
    }

    fn save_geometry(&self) {
        let Some(repository) = self.window_state.as_ref() else {
            return;
        };
        let Some(geometry) = self.host.main_geometry() else {
            return;
        };
        if let Err(e) = repository.save(&geometry) {
            tracing::warn!("[Lifecycle] Failed to save window state: {}", e);
        }
    }

    fn log_host_error(&self, action: &str, result: Result<()>) {
        if let Err(e) = result {
            tracing::error!("[Lifecycle] Failed to {}: {}", action, e);
        }
    }
}
