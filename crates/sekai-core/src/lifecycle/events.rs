use serde::{Deserialize, Serialize};

use crate::navigation::RendererExitReason;

/// Lifecycle of the main window.
///
/// ```text
/// Uninitialized -> Loading -> Ready -> Closed
///                     ^         |
///                     +---------+  fatal renderer exit
/// ```
///
/// A clean renderer exit or the native window closing moves an alive window
/// to `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MainWindowState {
    Uninitialized,
    Loading,
    Ready,
    Closed,
}

impl MainWindowState {
    /// The native window exists.
    pub fn is_alive(self) -> bool {
        matches!(self, Self::Loading | Self::Ready)
    }
}

/// Toolkit signals routed into the lifecycle.
///
/// Firing semantics:
/// - `PageReady` repeats on every finished load; only the first one after
///   a (re)load changes state.
/// - `LoadFailed` repeats; logged only.
/// - `RendererExited` repeats; every fatal exit produces exactly one reload.
/// - `MainCloseRequested` may repeat; each one snapshots geometry and closes
///   an open inspector.
/// - `MainClosed` is single-firing per window; repeats are ignored.
/// - `InspectorClosed` repeats harmlessly.
/// - `Activate` repeats; recreates the main window only when none is open.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    PageReady,
    LoadFailed { url: String, reason: String },
    RendererExited(RendererExitReason),
    MainCloseRequested,
    MainClosed,
    InspectorClosed,
    Activate { open_windows: usize },
}
