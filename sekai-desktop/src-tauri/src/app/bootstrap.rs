use std::sync::Arc;

use anyhow::{Result, anyhow};
use sekai_core::{
    CacheJanitor, MainWindowSpec, NavigationGuard, NotificationBridge, SessionPolicy,
    ViewerConfig, WindowLifecycle, ZoomLevel,
};
use sekai_infrastructure::{ConfigService, TomlWindowStateRepository, ViewerPaths};
use tauri::AppHandle;

use crate::app::AppState;
use crate::bridge;
use crate::host::{
    NotifyRustNotifier, SystemBrowserOpener, TauriWindowHost, WebviewClickSink,
    WebviewSessionStore,
};

/// Composition root: wires the core components to their Tauri adapters.
pub struct AppBootstrap {
    pub app_state: AppState,
}

impl AppBootstrap {
    /// Resolves paths and loads the configuration.
    ///
    /// Runs before the Tauri app exists so logging can start first.
    pub fn load_config() -> Result<(ViewerPaths, ViewerConfig)> {
        let paths = ViewerPaths::from_platform()
            .map_err(|e| anyhow!("Failed to resolve viewer directories: {}", e))?;
        let config = ConfigService::new(paths.config_file()).load_or_default();
        Ok((paths, config))
    }

    pub fn build(app: &AppHandle, paths: ViewerPaths, config: ViewerConfig) -> Result<Self> {
        let policy = Arc::new(
            SessionPolicy::from_config(&config)
                .map_err(|e| anyhow!("Invalid trusted origin: {}", e))?,
        );
        let session = policy.configure(&config.partition);
        tracing::info!(
            "[Bootstrap] Session partition '{}' for {}",
            session.partition,
            policy.trusted_origin().url()
        );

        let opener = Arc::new(SystemBrowserOpener::new(app.clone()));
        let guard = Arc::new(
            NavigationGuard::new(policy.clone(), opener)
                .with_extra_in_app_hosts(config.extra_in_app_hosts.clone()),
        );

        let store = Arc::new(WebviewSessionStore::new(app.clone()));
        let janitor = CacheJanitor::new(
            store,
            config.cache_clear_interval(),
            tauri::async_runtime::handle().inner().clone(),
        );
        tracing::info!(
            "[Bootstrap] Cache eviction every {} min",
            config.cache_clear_interval().as_secs() / 60
        );

        let host = Arc::new(TauriWindowHost::new(
            app.clone(),
            paths.clone(),
            bridge::initialization_script(&config),
        ));
        let template = MainWindowSpec::from_config(&config, session)
            .map_err(|e| anyhow!("Invalid window configuration: {}", e))?;
        let about_url = config
            .about_url()
            .map_err(|e| anyhow!("Invalid about path: {}", e))?;
        let window_state = Arc::new(TomlWindowStateRepository::new(paths.window_state_file()));

        let lifecycle = Arc::new(
            WindowLifecycle::new(
                host,
                guard,
                janitor,
                template,
                about_url,
                ZoomLevel::new(config.zoom.clone()),
            )
            .with_window_state(window_state),
        );

        let notifications = Arc::new(NotificationBridge::new(
            Arc::new(NotifyRustNotifier::new(config.window.title.clone())),
            Arc::new(WebviewClickSink::new(app.clone())),
            policy.clone(),
        ));

        Ok(Self {
            app_state: AppState::new(config, paths, policy, lifecycle, notifications),
        })
    }
}
