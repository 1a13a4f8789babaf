//! Toolkit-independent core of the PJSEKAI Viewer desktop shell.
//!
//! The windowing toolkit, browser engine and OS notification service are
//! reached only through the traits re-exported here; the desktop crate
//! provides the real implementations.

pub mod config;
pub mod error;
pub mod janitor;
pub mod lifecycle;
pub mod navigation;
pub mod notification;
pub mod origin;
pub mod policy;
pub mod zoom;

pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
pub use janitor::{CacheJanitor, ConfirmPrompt, SessionStore};
pub use lifecycle::{
    FullClearOutcome, LifecycleEvent, MainWindowSpec, MainWindowState, WindowGeometry, WindowHost,
    WindowLifecycle, WindowStateRepository,
};
pub use navigation::{
    CrashResponse, ExternalOpener, NavigationDecision, NavigationGuard, NewWindowAction,
    RendererExitReason,
};
pub use notification::{
    ClickCallback, ClickSink, NativeNotifier, NotificationBridge, NotificationId,
    NotificationRequest,
};
pub use origin::TrustedOrigin;
pub use policy::{Capability, PermissionDecision, SessionConfig, SessionPolicy};
pub use zoom::ZoomLevel;
