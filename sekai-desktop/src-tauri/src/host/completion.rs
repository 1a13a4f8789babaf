//! Turns engine completion callbacks into awaitable results.
//!
//! Every engine reports the end of a data clear through a native callback.
//! The callback side gets a [`Completion`], the caller awaits the matching
//! [`Pending`].

use sekai_core::{Result, ViewerError};
use tokio::sync::oneshot;

/// Sending half, handed to the engine callback.
pub struct Completion {
    tx: oneshot::Sender<std::result::Result<(), String>>,
}

impl Completion {
    pub fn succeed(self) {
        let _ = self.tx.send(Ok(()));
    }

    pub fn fail(self, reason: impl Into<String>) {
        let _ = self.tx.send(Err(reason.into()));
    }

    pub fn finish<E: std::fmt::Display>(self, result: std::result::Result<(), E>) {
        match result {
            Ok(()) => self.succeed(),
            Err(e) => self.fail(e.to_string()),
        }
    }
}

/// Receiving half. Resolves once the engine has called back.
pub struct Pending {
    action: &'static str,
    rx: oneshot::Receiver<std::result::Result<(), String>>,
}

impl Pending {
    pub async fn wait(self) -> Result<()> {
        match self.rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(reason)) => Err(ViewerError::storage(format!(
                "{} failed: {}",
                self.action, reason
            ))),
            Err(_) => Err(ViewerError::storage(format!(
                "{} was abandoned by the engine",
                self.action
            ))),
        }
    }
}

pub fn completion(action: &'static str) -> (Completion, Pending) {
    let (tx, rx) = oneshot::channel();
    (Completion { tx }, Pending { action, rx })
}
