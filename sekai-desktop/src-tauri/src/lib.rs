//! PJSEKAI Viewer desktop shell.
//!
//! Hosts pjsekai.world in a single persistent-session webview window and
//! wires the `sekai-core` components to Tauri.

mod app;
mod bridge;
mod capability;
mod commands;
mod host;
mod logging;
mod menu;

use sekai_core::LifecycleEvent;
use tauri::{Manager, RunEvent, WindowEvent};

use crate::app::{AppBootstrap, AppState};
use crate::host::MAIN_WINDOW_LABEL;

pub fn run() {
    let (paths, config) = match AppBootstrap::load_config() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to start PJSEKAI Viewer: {}", e);
            std::process::exit(1);
        }
    };
    let mut log_guard = logging::init_logging(&paths.logs_dir());
    tracing::info!(
        "[Startup] {} v{}",
        config.window.title,
        env!("CARGO_PKG_VERSION")
    );

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .invoke_handler(commands::handlers())
        .setup(move |app| {
            let bootstrap = AppBootstrap::build(app.handle(), paths, config)?;
            app.manage(bootstrap.app_state);

            let state = app.state::<AppState>();
            capability::install(app.handle(), state.policy.trusted_origin())?;

            let menu = menu::build_menu(app.handle())?;
            app.set_menu(menu)?;
            app.on_menu_event(menu::handle_menu_event);

            state.lifecycle.create_main_window()?;
            tracing::info!("[Startup] Data directory {:?}", state.paths.data_dir());
            Ok(())
        })
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }
            let lifecycle_event = match event {
                WindowEvent::CloseRequested { .. } => LifecycleEvent::MainCloseRequested,
                WindowEvent::Destroyed => LifecycleEvent::MainClosed,
                _ => return,
            };
            host::dispatch(window.app_handle(), lifecycle_event);
        })
        .build(tauri::generate_context!());

    let app = match app {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("[Startup] Failed to build application: {}", e);
            std::process::exit(1);
        }
    };

    app.run(move |app, event| match event {
        RunEvent::ExitRequested { code, api, .. } => {
            let quitting = app
                .try_state::<AppState>()
                .map(|state| state.is_quitting())
                .unwrap_or(true);
            // Closing the last window keeps the app resident on macOS.
            if cfg!(target_os = "macos") && code.is_none() && !quitting {
                tracing::debug!("[Lifecycle] Staying resident after last window closed");
                api.prevent_exit();
            }
        }
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => {
            host::dispatch(
                app,
                LifecycleEvent::Activate {
                    open_windows: app.webview_windows().len(),
                },
            );
        }
        RunEvent::Exit => {
            if let Some(state) = app.try_state::<AppState>() {
                state.lifecycle.shutdown();
            }
            tracing::info!("[Lifecycle] Exit");
            drop(log_guard.take());
        }
        _ => {}
    });
}
