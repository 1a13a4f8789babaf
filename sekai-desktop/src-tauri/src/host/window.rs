use sekai_core::{
    LifecycleEvent, MainWindowSpec, NewWindowAction, Result, WindowGeometry, WindowHost,
};
use sekai_infrastructure::ViewerPaths;
use tauri::webview::{NewWindowResponse, PageLoadEvent};
use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};

use super::{MAIN_WINDOW_LABEL, dispatch, host_error, main_window};
use crate::app::AppState;

/// [`WindowHost`] over a Tauri webview window.
///
/// Navigation, popup and page-load hooks are attached at build time and
/// resolve the lifecycle through managed state, so the host holds no
/// reference back to it.
pub struct TauriWindowHost {
    app: AppHandle,
    paths: ViewerPaths,
    init_script: String,
}

impl TauriWindowHost {
    pub fn new(app: AppHandle, paths: ViewerPaths, init_script: String) -> Self {
        Self {
            app,
            paths,
            init_script,
        }
    }

    fn eval_main(&self, action: &str, script: &str) -> Result<()> {
        main_window(&self.app)?
            .eval(script)
            .map_err(|e| host_error(action, e))
    }
}

impl WindowHost for TauriWindowHost {
    fn create_main(&self, spec: &MainWindowSpec) -> Result<()> {
        let nav_app = self.app.clone();
        let popup_app = self.app.clone();
        let load_app = self.app.clone();

        let mut builder = WebviewWindowBuilder::new(
            &self.app,
            MAIN_WINDOW_LABEL,
            WebviewUrl::External(spec.url.clone()),
        )
        .title(&spec.title)
        .min_inner_size(spec.min_width, spec.min_height)
        .visible(false)
        .data_directory(self.paths.partition_dir(&spec.session.partition))
        .devtools(spec.devtools)
        .initialization_script(&self.init_script)
        .on_navigation(move |url| {
            nav_app
                .try_state::<AppState>()
                .map(|state| state.lifecycle.allow_navigation(url))
                .unwrap_or(false)
        })
        .on_new_window(move |url, _features| {
            let app = popup_app.clone();
            // Applied after the callback returns.
            tauri::async_runtime::spawn(async move {
                if let Some(state) = app.try_state::<AppState>() {
                    match state.lifecycle.handle_new_window(&url) {
                        NewWindowAction::NavigateInPlace(target) => {
                            tracing::debug!("[Window] Popup loaded in place: {}", target)
                        }
                        NewWindowAction::HandedOff | NewWindowAction::Dropped => {}
                    }
                }
            });
            NewWindowResponse::Deny
        })
        .on_page_load(move |_window, payload| {
            if matches!(payload.event(), PageLoadEvent::Finished) {
                dispatch(&load_app, LifecycleEvent::PageReady);
            }
        });

        if !spec.session.user_agent.is_empty() {
            builder = builder.user_agent(&spec.session.user_agent);
        }
        builder = match &spec.geometry {
            Some(geometry) => {
                let mut restored = builder
                    .inner_size(geometry.width, geometry.height)
                    .maximized(geometry.maximized);
                if let (Some(x), Some(y)) = (geometry.x, geometry.y) {
                    restored = restored.position(x, y);
                }
                restored
            }
            None => builder.inner_size(spec.width, spec.height).center(),
        };

        let window = builder
            .build()
            .map_err(|e| host_error("create main window", e))?;

        #[cfg(any(target_os = "linux", windows))]
        super::engine::attach(&window, self.app.clone());
        #[cfg(not(any(target_os = "linux", windows)))]
        let _ = window;

        tracing::info!("[Window] Main window created for {}", spec.url);
        Ok(())
    }

    fn show_main(&self) -> Result<()> {
        let window = main_window(&self.app)?;
        window.show().map_err(|e| host_error("show", e))?;
        window.set_focus().map_err(|e| host_error("focus", e))
    }

    fn reload_main(&self) -> Result<()> {
        main_window(&self.app)?
            .reload()
            .map_err(|e| host_error("reload", e))
    }

    fn navigate_main(&self, url: &url::Url) -> Result<()> {
        main_window(&self.app)?
            .navigate(url.clone())
            .map_err(|e| host_error("navigate", e))
    }

    fn go_back(&self) -> Result<()> {
        self.eval_main("history back", "history.back();")
    }

    fn go_forward(&self) -> Result<()> {
        self.eval_main("history forward", "history.forward();")
    }

    fn set_zoom(&self, factor: f64) -> Result<()> {
        main_window(&self.app)?
            .set_zoom(factor)
            .map_err(|e| host_error("set zoom", e))
    }

    fn toggle_fullscreen(&self) -> Result<bool> {
        let window = main_window(&self.app)?;
        let fullscreen = !window
            .is_fullscreen()
            .map_err(|e| host_error("query fullscreen", e))?;
        window
            .set_fullscreen(fullscreen)
            .map_err(|e| host_error("set fullscreen", e))?;
        Ok(fullscreen)
    }

    fn main_geometry(&self) -> Option<WindowGeometry> {
        let window = main_window(&self.app).ok()?;
        let scale = window.scale_factor().ok()?;
        let size = window.inner_size().ok()?.to_logical::<f64>(scale);
        let position = window
            .outer_position()
            .ok()
            .map(|p| p.to_logical::<f64>(scale));
        Some(WindowGeometry {
            width: size.width,
            height: size.height,
            x: position.map(|p| p.x),
            y: position.map(|p| p.y),
            maximized: window.is_maximized().unwrap_or(false),
        })
    }

    fn open_inspector(&self) -> Result<()> {
        main_window(&self.app)?.open_devtools();
        Ok(())
    }

    fn focus_inspector(&self) -> Result<()> {
        // Re-opening an open inspector raises it.
        main_window(&self.app)?.open_devtools();
        Ok(())
    }

    fn close_inspector(&self) -> Result<()> {
        main_window(&self.app)?.close_devtools();
        Ok(())
    }

    fn inspector_alive(&self) -> bool {
        main_window(&self.app)
            .map(|window| window.is_devtools_open())
            .unwrap_or(false)
    }
}
