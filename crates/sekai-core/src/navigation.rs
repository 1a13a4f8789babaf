//! Navigation and renderer-crash interception.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;
use crate::policy::SessionPolicy;

/// Schemes the operating system is asked to handle when the page opens them.
const EXTERNAL_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Hands a URL to the operating system's default handler.
pub trait ExternalOpener: Send + Sync {
    fn open_external(&self, url: &Url) -> Result<()>;
}

/// Where a navigation target should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Load inside the main window.
    InPlace,
    /// Hand off to the user's browser.
    External,
    /// Refused by the session policy.
    Blocked,
}

/// Outcome of a request to open a new top-level window.
///
/// A new in-app window is never created; the caller suppresses the engine's
/// default behaviour in both cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewWindowAction {
    NavigateInPlace(Url),
    HandedOff,
    Dropped,
}

/// Why the content-rendering process went away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RendererExitReason {
    CleanExit,
    Crashed,
    OutOfMemory,
    LaunchFailed,
    Other(String),
}

impl RendererExitReason {
    /// Maps an engine-reported reason string.
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "clean-exit" => Self::CleanExit,
            "crashed" => Self::Crashed,
            "oom" => Self::OutOfMemory,
            "launch-failed" => Self::LaunchFailed,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Crashed | Self::OutOfMemory | Self::LaunchFailed)
    }
}

impl fmt::Display for RendererExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CleanExit => write!(f, "clean-exit"),
            Self::Crashed => write!(f, "crashed"),
            Self::OutOfMemory => write!(f, "oom"),
            Self::LaunchFailed => write!(f, "launch-failed"),
            Self::Other(raw) => write!(f, "other({raw})"),
        }
    }
}

/// What to do after a renderer exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashResponse {
    Reload,
    Ignore,
}

/// Decides in-window versus external handling for every navigation the
/// loaded page attempts.
pub struct NavigationGuard {
    policy: Arc<SessionPolicy>,
    extra_in_app_hosts: Vec<String>,
    opener: Arc<dyn ExternalOpener>,
}

impl NavigationGuard {
    pub fn new(policy: Arc<SessionPolicy>, opener: Arc<dyn ExternalOpener>) -> Self {
        Self {
            policy,
            extra_in_app_hosts: Vec::new(),
            opener,
        }
    }

    /// Hosts that may be loaded in the main frame without leaving the app,
    /// typically sign-in redirects. They never gain permissions.
    pub fn with_extra_in_app_hosts(mut self, hosts: Vec<String>) -> Self {
        self.extra_in_app_hosts = hosts
            .into_iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        self
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Classifies a target for a new-window request (link with a target,
    /// `window.open`). Only the trusted origin stays in the app; web, mail
    /// and phone links go to the system handler.
    pub fn classify_new_window(&self, url: &Url) -> NavigationDecision {
        if self.policy.trusted_origin().matches_url(url) {
            NavigationDecision::InPlace
        } else if is_external_scheme(url) {
            NavigationDecision::External
        } else {
            NavigationDecision::Blocked
        }
    }

    /// Classifies a main-frame navigation inside the window.
    pub fn classify_navigation(&self, url: &Url) -> NavigationDecision {
        if self.policy.trusted_origin().matches_url(url) || self.is_extra_host(url) {
            return NavigationDecision::InPlace;
        }
        if is_external_scheme(url) {
            return NavigationDecision::External;
        }
        if self.policy.check_load(url).is_err() {
            return NavigationDecision::Blocked;
        }
        // about:, data:, blob: stay with the page that produced them
        NavigationDecision::InPlace
    }

    /// Handles a new-window request. External targets are forwarded to the
    /// opener exactly once.
    pub fn on_new_window(&self, url: &Url) -> NewWindowAction {
        match self.classify_new_window(url) {
            NavigationDecision::InPlace => {
                tracing::debug!("[NavigationGuard] Opening {} in place", url);
                NewWindowAction::NavigateInPlace(url.clone())
            }
            NavigationDecision::External => {
                self.hand_off(url);
                NewWindowAction::HandedOff
            }
            NavigationDecision::Blocked => {
                tracing::warn!("[NavigationGuard] Dropped new-window request for {}", url);
                NewWindowAction::Dropped
            }
        }
    }

    /// Handles a main-frame navigation. Returns whether the engine may
    /// proceed with it.
    pub fn on_navigation(&self, url: &Url) -> bool {
        match self.classify_navigation(url) {
            NavigationDecision::InPlace => true,
            NavigationDecision::External => {
                self.hand_off(url);
                false
            }
            NavigationDecision::Blocked => {
                tracing::warn!("[NavigationGuard] Blocked navigation to {}", url);
                false
            }
        }
    }

    /// Decides whether a renderer exit warrants an automatic reload.
    pub fn on_renderer_exit(&self, reason: &RendererExitReason) -> CrashResponse {
        if reason.is_fatal() {
            tracing::error!("[NavigationGuard] Renderer exited ({}), reloading", reason);
            CrashResponse::Reload
        } else {
            tracing::info!("[NavigationGuard] Renderer exited ({}), no reload", reason);
            CrashResponse::Ignore
        }
    }

    /// Ordinary load failures (DNS, timeout, HTTP) are only logged.
    pub fn on_load_failed(&self, url: &str, reason: &str) {
        tracing::warn!("[NavigationGuard] Load failed for {}: {}", url, reason);
    }

    fn hand_off(&self, url: &Url) {
        tracing::info!("[NavigationGuard] Handing {} to the system browser", url);
        if let Err(e) = self.opener.open_external(url) {
            tracing::error!("[NavigationGuard] Failed to open {} externally: {}", url, e);
        }
    }

    fn is_extra_host(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        url.host_str()
            .map(|host| {
                let host = host.to_ascii_lowercase();
                self.extra_in_app_hosts.iter().any(|h| *h == host)
            })
            .unwrap_or(false)
    }
}

fn is_external_scheme(url: &Url) -> bool {
    EXTERNAL_SCHEMES.contains(&url.scheme())
}
