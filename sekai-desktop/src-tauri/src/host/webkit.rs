//! WebKitGTK signals that Tauri does not surface itself.
//!
//! Renderer exits, load failures, permission requests and fullscreen
//! requests are forwarded into the lifecycle and the session policy.
//! Website data clears go through the view's data manager.

use sekai_core::{Capability, LifecycleEvent, RendererExitReason, Result};
use tauri::{AppHandle, Manager, WebviewWindow};
use webkit2gtk::glib::prelude::*;
use webkit2gtk::{
    NotificationPermissionRequest, PermissionRequestExt, UserMediaPermissionRequest,
    WebProcessTerminationReason, WebViewExt, WebsiteDataManagerExt, WebsiteDataTypes,
};

use super::completion::completion;
use super::dispatch;
use super::session_store::ClearScope;
use crate::app::AppState;

/// Connects the engine signals of `window` to the app.
pub fn attach(window: &WebviewWindow, app: AppHandle) {
    let attached = window.with_webview(move |platform| {
        let view = platform.inner();

        let exit_app = app.clone();
        view.connect_web_process_terminated(move |_view, reason| {
            let raw = match reason {
                WebProcessTerminationReason::Crashed => "crashed",
                WebProcessTerminationReason::ExceededMemoryLimit => "oom",
                WebProcessTerminationReason::TerminatedByApi => "clean-exit",
                _ => "unknown",
            };
            dispatch(
                &exit_app,
                LifecycleEvent::RendererExited(RendererExitReason::classify(raw)),
            );
        });

        let failure_app = app.clone();
        view.connect_load_failed(move |_view, _event, uri, error| {
            dispatch(
                &failure_app,
                LifecycleEvent::LoadFailed {
                    url: uri.to_string(),
                    reason: error.to_string(),
                },
            );
            false
        });

        let permission_app = app.clone();
        view.connect_permission_request(move |view, request| {
            let capability = if request.is::<NotificationPermissionRequest>() {
                Capability::Notifications
            } else if request.is::<UserMediaPermissionRequest>() {
                Capability::Media
            } else {
                Capability::Other(request.type_().name().to_string())
            };
            let origin = view.uri().map(|uri| uri.to_string()).unwrap_or_default();

            let allowed = permission_app
                .try_state::<AppState>()
                .map(|state| state.policy.check_permission(&origin, &capability).is_allowed())
                .unwrap_or(false);
            if allowed {
                request.allow();
            } else {
                request.deny();
            }
            true
        });

        let fullscreen_app = app;
        view.connect_enter_fullscreen(move |view| {
            let origin = view.uri().map(|uri| uri.to_string()).unwrap_or_default();
            let allowed = fullscreen_app
                .try_state::<AppState>()
                .map(|state| {
                    state
                        .policy
                        .check_permission(&origin, &Capability::Fullscreen)
                        .is_allowed()
                })
                .unwrap_or(false);
            // Returning true stops the request.
            !allowed
        });
    });

    if let Err(e) = attached {
        tracing::warn!("[WebKit] Could not attach engine signals: {}", e);
    }
}

fn website_data_types(scope: ClearScope) -> WebsiteDataTypes {
    match scope {
        ClearScope::Cache => WebsiteDataTypes::DISK_CACHE | WebsiteDataTypes::MEMORY_CACHE,
        ClearScope::Everything => WebsiteDataTypes::ALL,
    }
}

/// Clears the website data selected by `scope` through the view's data
/// manager and waits for WebKit to report completion.
pub async fn clear_website_data(window: &WebviewWindow, scope: ClearScope) -> Result<()> {
    let (done, pending) = completion("website data clear");

    window
        .with_webview(move |platform| {
            let view = platform.inner();
            let Some(manager) = view.website_data_manager() else {
                done.fail("no website data manager");
                return;
            };
            manager.clear(
                website_data_types(scope),
                webkit2gtk::glib::TimeSpan::from_seconds(0),
                None::<&webkit2gtk::gio::Cancellable>,
                move |result| done.finish(result),
            );
        })
        .map_err(|e| super::host_error("website data clear", e))?;

    pending.wait().await
}
