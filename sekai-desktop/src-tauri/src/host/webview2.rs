//! WebView2 events that Tauri does not surface itself.
//!
//! Mirrors the WebKitGTK wiring: process failures, failed navigations and
//! permission requests reach the lifecycle and the session policy, and
//! website data clears go through the profile.

use sekai_core::{Capability, LifecycleEvent, RendererExitReason, Result};
use tauri::{AppHandle, Manager, WebviewWindow};
use webview2_com::Microsoft::Web::WebView2::Win32::{
    COREWEBVIEW2_BROWSING_DATA_KINDS_DISK_CACHE, COREWEBVIEW2_PERMISSION_KIND,
    COREWEBVIEW2_PERMISSION_KIND_CAMERA, COREWEBVIEW2_PERMISSION_KIND_MICROPHONE,
    COREWEBVIEW2_PERMISSION_KIND_NOTIFICATIONS, COREWEBVIEW2_PERMISSION_STATE_ALLOW,
    COREWEBVIEW2_PERMISSION_STATE_DENY, COREWEBVIEW2_PROCESS_FAILED_KIND,
    COREWEBVIEW2_PROCESS_FAILED_KIND_RENDER_PROCESS_EXITED, COREWEBVIEW2_PROCESS_FAILED_REASON,
    COREWEBVIEW2_PROCESS_FAILED_REASON_CRASHED, COREWEBVIEW2_PROCESS_FAILED_REASON_LAUNCH_FAILED,
    COREWEBVIEW2_PROCESS_FAILED_REASON_OUT_OF_MEMORY,
    COREWEBVIEW2_PROCESS_FAILED_REASON_TERMINATED, COREWEBVIEW2_PROCESS_FAILED_REASON_UNEXPECTED,
    COREWEBVIEW2_WEB_ERROR_STATUS, ICoreWebView2, ICoreWebView2_13,
    ICoreWebView2ProcessFailedEventArgs2, ICoreWebView2Profile2,
};
use webview2_com::{
    ClearBrowsingDataCompletedHandler, NavigationCompletedEventHandler,
    PermissionRequestedEventHandler, ProcessFailedEventHandler, take_pwstr,
};
use windows::core::{BOOL, Interface, PWSTR};

use super::completion::completion;
use super::dispatch;
use super::session_store::ClearScope;
use crate::app::AppState;

/// Maps a process failure to a renderer exit reason. Failures of other
/// processes (GPU, utility, subframes) are not renderer exits of the page.
fn exit_reason(
    kind: COREWEBVIEW2_PROCESS_FAILED_KIND,
    reason: COREWEBVIEW2_PROCESS_FAILED_REASON,
) -> Option<RendererExitReason> {
    if kind != COREWEBVIEW2_PROCESS_FAILED_KIND_RENDER_PROCESS_EXITED {
        return None;
    }
    let raw = match reason {
        COREWEBVIEW2_PROCESS_FAILED_REASON_CRASHED
        | COREWEBVIEW2_PROCESS_FAILED_REASON_UNEXPECTED => "crashed",
        COREWEBVIEW2_PROCESS_FAILED_REASON_OUT_OF_MEMORY => "oom",
        COREWEBVIEW2_PROCESS_FAILED_REASON_LAUNCH_FAILED => "launch-failed",
        COREWEBVIEW2_PROCESS_FAILED_REASON_TERMINATED => "killed",
        other => return Some(RendererExitReason::Other(format!("reason-{}", other.0))),
    };
    Some(RendererExitReason::classify(raw))
}

fn capability(kind: COREWEBVIEW2_PERMISSION_KIND) -> Capability {
    match kind {
        COREWEBVIEW2_PERMISSION_KIND_NOTIFICATIONS => Capability::Notifications,
        COREWEBVIEW2_PERMISSION_KIND_CAMERA | COREWEBVIEW2_PERMISSION_KIND_MICROPHONE => {
            Capability::Media
        }
        other => Capability::Other(format!("webview2-kind-{}", other.0)),
    }
}

/// Connects the engine events of `window` to the app.
pub fn attach(window: &WebviewWindow, app: AppHandle) {
    let attached = window.with_webview(move |platform| {
        let webview = match unsafe { platform.controller().CoreWebView2() } {
            Ok(webview) => webview,
            Err(e) => {
                tracing::warn!("[WebView2] No core webview: {}", e);
                return;
            }
        };
        if let Err(e) = register(&webview, app) {
            tracing::warn!("[WebView2] Could not register event handlers: {}", e);
        }
    });

    if let Err(e) = attached {
        tracing::warn!("[WebView2] Could not attach engine events: {}", e);
    }
}

fn register(webview: &ICoreWebView2, app: AppHandle) -> windows::core::Result<()> {
    let mut token = 0;

    let exit_app = app.clone();
    unsafe {
        webview.add_ProcessFailed(
            &ProcessFailedEventHandler::create(Box::new(move |_sender, args| {
                let Some(args) = args else {
                    return Ok(());
                };
                let mut kind = COREWEBVIEW2_PROCESS_FAILED_KIND::default();
                args.ProcessFailedKind(&mut kind)?;
                let mut reason = COREWEBVIEW2_PROCESS_FAILED_REASON::default();
                if let Ok(args) = args.cast::<ICoreWebView2ProcessFailedEventArgs2>() {
                    args.Reason(&mut reason)?;
                }

                match exit_reason(kind, reason) {
                    Some(reason) => {
                        dispatch(&exit_app, LifecycleEvent::RendererExited(reason));
                    }
                    None => tracing::warn!("[WebView2] Process failure kind {}", kind.0),
                }
                Ok(())
            })),
            &mut token,
        )?;
    }

    let failure_app = app.clone();
    unsafe {
        webview.add_NavigationCompleted(
            &NavigationCompletedEventHandler::create(Box::new(move |sender, args| {
                let (Some(sender), Some(args)) = (sender, args) else {
                    return Ok(());
                };
                let mut success = BOOL::default();
                args.IsSuccess(&mut success)?;
                if success.as_bool() {
                    return Ok(());
                }

                let mut status = COREWEBVIEW2_WEB_ERROR_STATUS::default();
                args.WebErrorStatus(&mut status)?;
                let mut uri = PWSTR::null();
                sender.Source(&mut uri)?;

                dispatch(
                    &failure_app,
                    LifecycleEvent::LoadFailed {
                        url: take_pwstr(uri),
                        reason: format!("web error status {}", status.0),
                    },
                );
                Ok(())
            })),
            &mut token,
        )?;
    }

    let permission_app = app;
    unsafe {
        webview.add_PermissionRequested(
            &PermissionRequestedEventHandler::create(Box::new(move |_sender, args| {
                let Some(args) = args else {
                    return Ok(());
                };
                let mut kind = COREWEBVIEW2_PERMISSION_KIND::default();
                args.PermissionKind(&mut kind)?;
                let mut uri = PWSTR::null();
                args.Uri(&mut uri)?;
                let origin = take_pwstr(uri);

                let allowed = permission_app
                    .try_state::<AppState>()
                    .map(|state| {
                        state
                            .policy
                            .check_permission(&origin, &capability(kind))
                            .is_allowed()
                    })
                    .unwrap_or(false);
                args.SetState(if allowed {
                    COREWEBVIEW2_PERMISSION_STATE_ALLOW
                } else {
                    COREWEBVIEW2_PERMISSION_STATE_DENY
                })
            })),
            &mut token,
        )?;
    }

    Ok(())
}

/// Clears the website data selected by `scope` through the webview profile
/// and waits for WebView2 to report completion.
pub async fn clear_website_data(window: &WebviewWindow, scope: ClearScope) -> Result<()> {
    let (done, pending) = completion("website data clear");

    window
        .with_webview(move |platform| {
            let profile = unsafe {
                platform
                    .controller()
                    .CoreWebView2()
                    .and_then(|webview| webview.cast::<ICoreWebView2_13>())
                    .and_then(|webview| webview.Profile())
                    .and_then(|profile| profile.cast::<ICoreWebView2Profile2>())
            };
            let profile = match profile {
                Ok(profile) => profile,
                Err(e) => {
                    done.fail(e.to_string());
                    return;
                }
            };

            let mut done = Some(done);
            let handler = ClearBrowsingDataCompletedHandler::create(Box::new(move |result| {
                if let Some(done) = done.take() {
                    done.finish(result);
                }
                Ok(())
            }));
            let started = unsafe {
                match scope {
                    ClearScope::Cache => profile
                        .ClearBrowsingData(COREWEBVIEW2_BROWSING_DATA_KINDS_DISK_CACHE, &handler),
                    ClearScope::Everything => profile.ClearBrowsingDataAll(&handler),
                }
            };
            // On failure the handler is dropped unanswered and the caller
            // sees the clear as abandoned.
            if let Err(e) = started {
                tracing::warn!("[WebView2] Could not start data clear: {}", e);
            }
        })
        .map_err(|e| super::host_error("website data clear", e))?;

    pending.wait().await
}
