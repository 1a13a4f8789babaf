//! Bridging of in-page notifications to native OS notifications.
//!
//! The page keeps its own permission model; this side only decides how an
//! already-permitted notification is rendered. Every failure degrades to
//! "nothing shown" and never reaches page script as an error.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::policy::{Capability, SessionPolicy};

/// Identifies a bridged notification so clicks can be routed back.
pub type NotificationId = u64;

/// Invoked at most once when the user clicks the native notification.
pub type ClickCallback = Box<dyn FnOnce() + Send + 'static>;

/// What the page asked to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub silent: bool,
}

/// OS notification backend.
pub trait NativeNotifier: Send + Sync {
    fn is_supported(&self) -> bool;

    fn show(&self, request: &NotificationRequest, on_click: ClickCallback) -> Result<()>;
}

/// Delivers a native click back to the page-side notification object.
pub trait ClickSink: Send + Sync {
    fn dispatch_click(&self, id: NotificationId);
}

pub struct NotificationBridge {
    notifier: Arc<dyn NativeNotifier>,
    sink: Arc<dyn ClickSink>,
    policy: Arc<SessionPolicy>,
    next_id: AtomicU64,
}

impl NotificationBridge {
    pub fn new(
        notifier: Arc<dyn NativeNotifier>,
        sink: Arc<dyn ClickSink>,
        policy: Arc<SessionPolicy>,
    ) -> Self {
        Self {
            notifier,
            sink,
            policy,
            next_id: AtomicU64::new(1),
        }
    }

    /// Shows `request` natively on behalf of a page at `origin`.
    ///
    /// Returns the id used for click routing, or `None` when nothing was
    /// shown (origin not permitted, backend unavailable or failing).
    pub fn deliver(&self, origin: &str, request: NotificationRequest) -> Option<NotificationId> {
        if !self
            .policy
            .check_permission(origin, &Capability::Notifications)
            .is_allowed()
        {
            tracing::warn!("[Notification] Ignoring request from untrusted origin {}", origin);
            return None;
        }

        if !self.notifier.is_supported() {
            tracing::debug!("[Notification] Native notifications unavailable");
            return None;
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let sink = Arc::clone(&self.sink);
        let on_click: ClickCallback = Box::new(move || sink.dispatch_click(id));

        let shown = catch_unwind(AssertUnwindSafe(|| self.notifier.show(&request, on_click)));
        match shown {
            Ok(Ok(())) => {
                tracing::debug!("[Notification] Shown #{} '{}'", id, request.title);
                Some(id)
            }
            Ok(Err(e)) => {
                tracing::warn!("[Notification] Native notification failed: {}", e);
                None
            }
            Err(_) => {
                tracing::error!("[Notification] Native backend panicked, notification dropped");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewerError;
    use crate::origin::TrustedOrigin;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeNotifier {
        unsupported: bool,
        fail: bool,
        shown: Mutex<Vec<NotificationRequest>>,
        clicks: Mutex<Vec<ClickCallback>>,
    }

    impl NativeNotifier for FakeNotifier {
        fn is_supported(&self) -> bool {
            !self.unsupported
        }

        fn show(&self, request: &NotificationRequest, on_click: ClickCallback) -> Result<()> {
            if self.fail {
                return Err(ViewerError::notification("no notification daemon"));
            }
            self.shown.lock().unwrap().push(request.clone());
            self.clicks.lock().unwrap().push(on_click);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        clicked: Mutex<Vec<NotificationId>>,
    }

    impl ClickSink for RecordingSink {
        fn dispatch_click(&self, id: NotificationId) {
            self.clicked.lock().unwrap().push(id);
        }
    }

    struct PanickingNotifier;

    impl NativeNotifier for PanickingNotifier {
        fn is_supported(&self) -> bool {
            true
        }

        fn show(&self, _: &NotificationRequest, _: ClickCallback) -> Result<()> {
            panic!("backend exploded");
        }
    }

    fn policy() -> Arc<SessionPolicy> {
        Arc::new(SessionPolicy::new(
            TrustedOrigin::parse("https://pjsekai.world").unwrap(),
            "TestAgent",
        ))
    }

    fn request() -> NotificationRequest {
        NotificationRequest {
            title: "Live show starts".to_string(),
            body: Some("Virtual live in 5 minutes".to_string()),
            icon: None,
            silent: true,
        }
    }

    #[test]
    fn test_request_is_mapped_one_to_one() {
        let notifier = Arc::new(FakeNotifier::default());
        let sink = Arc::new(RecordingSink::default());
        let bridge = NotificationBridge::new(notifier.clone(), sink, policy());

        let id = bridge.deliver("https://pjsekai.world", request());
        assert_eq!(id, Some(1));
        assert_eq!(notifier.shown.lock().unwrap().as_slice(), &[request()]);
    }

    #[test]
    fn test_click_routes_back_with_id() {
        let notifier = Arc::new(FakeNotifier::default());
        let sink = Arc::new(RecordingSink::default());
        let bridge = NotificationBridge::new(notifier.clone(), sink.clone(), policy());

        let first = bridge.deliver("https://pjsekai.world", request()).unwrap();
        let second = bridge.deliver("https://pjsekai.world/news", request()).unwrap();
        assert_ne!(first, second);

        let callback = notifier.clicks.lock().unwrap().remove(1);
        callback();
        assert_eq!(sink.clicked.lock().unwrap().as_slice(), &[second]);
    }

    #[test]
    fn test_failures_degrade_silently() {
        let sink = Arc::new(RecordingSink::default());

        let unsupported = Arc::new(FakeNotifier {
            unsupported: true,
            ..FakeNotifier::default()
        });
        let bridge = NotificationBridge::new(unsupported, sink.clone(), policy());
        assert_eq!(bridge.deliver("https://pjsekai.world", request()), None);

        let failing = Arc::new(FakeNotifier {
            fail: true,
            ..FakeNotifier::default()
        });
        let bridge = NotificationBridge::new(failing, sink.clone(), policy());
        assert_eq!(bridge.deliver("https://pjsekai.world", request()), None);

        let bridge = NotificationBridge::new(Arc::new(PanickingNotifier), sink, policy());
        assert_eq!(bridge.deliver("https://pjsekai.world", request()), None);
    }

    #[test]
    fn test_untrusted_origin_shows_nothing() {
        let notifier = Arc::new(FakeNotifier::default());
        let bridge =
            NotificationBridge::new(notifier.clone(), Arc::new(RecordingSink::default()), policy());
        assert_eq!(bridge.deliver("https://ads.example", request()), None);
        assert!(notifier.shown.lock().unwrap().is_empty());
    }

    #[test]
    fn test_request_deserializes_page_payload() {
        let parsed: NotificationRequest =
            serde_json::from_str(r#"{"title":"Hi","body":"there","silent":true}"#).unwrap();
        assert_eq!(parsed.title, "Hi");
        assert_eq!(parsed.body.as_deref(), Some("there"));
        assert!(parsed.silent);
        assert_eq!(parsed.icon, None);
    }
}
