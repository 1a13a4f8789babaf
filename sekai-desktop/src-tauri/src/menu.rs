//! Application menu and its dispatch.

use sekai_core::{ExternalOpener, FullClearOutcome, Result};
use tauri::menu::{Menu, MenuBuilder, MenuEvent, MenuItemBuilder, SubmenuBuilder};
use tauri::{AppHandle, Manager, Wry};

use crate::app::AppState;
use crate::host::{DialogConfirmPrompt, SystemBrowserOpener};
use crate::logging::spawn_logged;

/// Every custom menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Reload,
    Home,
    Back,
    Forward,
    ClearCache,
    FullClear,
    Quit,
    ToggleFullscreen,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    Inspector,
    About,
    Repository,
}

impl MenuAction {
    pub const ALL: [MenuAction; 14] = [
        Self::Reload,
        Self::Home,
        Self::Back,
        Self::Forward,
        Self::ClearCache,
        Self::FullClear,
        Self::Quit,
        Self::ToggleFullscreen,
        Self::ZoomIn,
        Self::ZoomOut,
        Self::ZoomReset,
        Self::Inspector,
        Self::About,
        Self::Repository,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Reload => "reload",
            Self::Home => "home",
            Self::Back => "back",
            Self::Forward => "forward",
            Self::ClearCache => "clear-cache",
            Self::FullClear => "full-clear",
            Self::Quit => "quit",
            Self::ToggleFullscreen => "fullscreen",
            Self::ZoomIn => "zoom-in",
            Self::ZoomOut => "zoom-out",
            Self::ZoomReset => "zoom-reset",
            Self::Inspector => "inspector",
            Self::About => "about",
            Self::Repository => "repository",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == id)
    }

    fn label(self) -> &'static str {
        match self {
            Self::Reload => "Reload",
            Self::Home => "Home",
            Self::Back => "Back",
            Self::Forward => "Forward",
            Self::ClearCache => "Clear Cache and Reload",
            Self::FullClear => "Clear All Data…",
            Self::Quit => "Quit",
            Self::ToggleFullscreen => "Toggle Fullscreen",
            Self::ZoomIn => "Zoom In",
            Self::ZoomOut => "Zoom Out",
            Self::ZoomReset => "Actual Size",
            Self::Inspector => "Developer Tools",
            Self::About => "About pjsekai.world",
            Self::Repository => "Source Repository",
        }
    }

    fn accelerator(self) -> Option<&'static str> {
        match self {
            Self::Reload => Some("CmdOrCtrl+R"),
            Self::Home => Some("Alt+Home"),
            Self::Back => Some("Alt+Left"),
            Self::Forward => Some("Alt+Right"),
            Self::ClearCache => Some("CmdOrCtrl+Shift+R"),
            Self::Quit => Some("CmdOrCtrl+Q"),
            Self::ToggleFullscreen => Some("F11"),
            Self::ZoomIn => Some("CmdOrCtrl+="),
            Self::ZoomOut => Some("CmdOrCtrl+-"),
            Self::ZoomReset => Some("CmdOrCtrl+0"),
            Self::Inspector => Some("F12"),
            Self::FullClear | Self::About | Self::Repository => None,
        }
    }
}

pub fn build_menu(app: &AppHandle) -> tauri::Result<Menu<Wry>> {
    let item = |action: MenuAction| {
        let mut builder = MenuItemBuilder::with_id(action.id(), action.label());
        if let Some(accelerator) = action.accelerator() {
            builder = builder.accelerator(accelerator);
        }
        builder.build(app)
    };

    let file_menu = SubmenuBuilder::new(app, "File")
        .item(&item(MenuAction::Reload)?)
        .item(&item(MenuAction::ClearCache)?)
        .item(&item(MenuAction::FullClear)?)
        .separator()
        .item(&item(MenuAction::Quit)?)
        .build()?;

    let edit_menu = SubmenuBuilder::new(app, "Edit")
        .undo()
        .redo()
        .separator()
        .cut()
        .copy()
        .paste()
        .select_all()
        .build()?;

    let view_menu = SubmenuBuilder::new(app, "View")
        .item(&item(MenuAction::ToggleFullscreen)?)
        .separator()
        .item(&item(MenuAction::ZoomIn)?)
        .item(&item(MenuAction::ZoomOut)?)
        .item(&item(MenuAction::ZoomReset)?)
        .separator()
        .item(&item(MenuAction::Inspector)?)
        .build()?;

    let go_menu = SubmenuBuilder::new(app, "Go")
        .item(&item(MenuAction::Back)?)
        .item(&item(MenuAction::Forward)?)
        .item(&item(MenuAction::Home)?)
        .build()?;

    let help_menu = SubmenuBuilder::new(app, "Help")
        .item(&item(MenuAction::About)?)
        .item(&item(MenuAction::Repository)?)
        .build()?;

    MenuBuilder::new(app)
        .items(&[&file_menu, &edit_menu, &view_menu, &go_menu, &help_menu])
        .build()
}

pub fn handle_menu_event(app: &AppHandle, event: MenuEvent) {
    let Some(action) = MenuAction::from_id(event.id().as_ref()) else {
        return;
    };
    let Some(state) = app.try_state::<AppState>() else {
        return;
    };
    tracing::debug!("[Menu] {:?}", action);

    let lifecycle = state.lifecycle.clone();
    let result: Result<()> = match action {
        MenuAction::Reload => lifecycle.reload(),
        MenuAction::Home => lifecycle.go_home(),
        MenuAction::Back => lifecycle.go_back(),
        MenuAction::Forward => lifecycle.go_forward(),
        MenuAction::ClearCache => {
            spawn_logged("Menu", async move { lifecycle.clear_cache_and_reload().await });
            Ok(())
        }
        MenuAction::FullClear => {
            let prompt = DialogConfirmPrompt::new(app.clone());
            spawn_logged("Menu", async move {
                if lifecycle.full_clear(&prompt).await? == FullClearOutcome::Cleared {
                    tracing::info!("[Menu] All session data cleared");
                }
                Ok(())
            });
            Ok(())
        }
        MenuAction::Quit => {
            state.begin_quit();
            app.exit(0);
            Ok(())
        }
        MenuAction::ToggleFullscreen => lifecycle.toggle_fullscreen().map(|_| ()),
        MenuAction::ZoomIn => lifecycle.zoom_in().map(|_| ()),
        MenuAction::ZoomOut => lifecycle.zoom_out().map(|_| ()),
        MenuAction::ZoomReset => lifecycle.zoom_reset().map(|_| ()),
        MenuAction::Inspector => lifecycle.open_inspector_window(),
        MenuAction::About => lifecycle.open_about(),
        MenuAction::Repository => state
            .config
            .repository_url()
            .and_then(|url| SystemBrowserOpener::new(app.clone()).open_external(&url)),
    };

    match result {
        Ok(()) => {}
        Err(e) if e.is_no_main_window() => {
            tracing::debug!("[Menu] {:?} ignored, no main window", action)
        }
        Err(e) => tracing::warn!("[Menu] {:?} failed: {}", action, e),
    }
}
