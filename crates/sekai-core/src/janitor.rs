//! Periodic cache eviction for the running session.
//!
//! The routine cycle only evicts the resource cache. Cookies, local storage
//! and login state are only touched by [`CacheJanitor::clear_everything`],
//! which callers must gate behind a user confirmation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use crate::config::MAX_CACHE_CLEAR_INTERVAL_MINUTES;
use crate::error::Result;

const MIN_PERIOD: Duration = Duration::from_secs(1);
const MAX_PERIOD: Duration = Duration::from_secs(MAX_CACHE_CLEAR_INTERVAL_MINUTES * 60);

/// Cache and storage operations of the embedded browsing session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Evicts cached resources only.
    async fn clear_cache(&self) -> Result<()>;

    /// Clears cookies, local storage and every other persisted site datum.
    async fn clear_storage(&self) -> Result<()>;
}

/// Blocking yes/no question shown before destroying session data.
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    async fn confirm_full_clear(&self) -> bool;
}

/// Background task that evicts the session cache on a fixed period.
pub struct CacheJanitor {
    store: Arc<dyn SessionStore>,
    period: Duration,
    runtime: Handle,
    token: Mutex<Option<CancellationToken>>,
    cycles: Arc<AtomicU64>,
}

impl CacheJanitor {
    /// The period is clamped to between one second and one week.
    pub fn new(store: Arc<dyn SessionStore>, period: Duration, runtime: Handle) -> Self {
        Self {
            store,
            period: period.clamp(MIN_PERIOD, MAX_PERIOD),
            runtime,
            token: Mutex::new(None),
            cycles: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of eviction cycles that have run so far.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Starts the timer. The first eviction happens one full period after
    /// the call. Returns `false` if the timer was already running.
    pub fn start(&self) -> bool {
        let mut slot = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return false;
        }

        let token = CancellationToken::new();
        *slot = Some(token.clone());
        drop(slot);

        let store = Arc::clone(&self.store);
        let cycles = Arc::clone(&self.cycles);
        let period = self.period;

        self.runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(target: "cache_janitor", "Started ({}s period)", period.as_secs());

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                if token.is_cancelled() {
                    break;
                }

                let cycle = cycles.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::debug!(target: "cache_janitor", "Cycle {} - evicting cache", cycle);
                if let Err(e) = store.clear_cache().await {
                    tracing::warn!(target: "cache_janitor", "Cycle {} eviction failed: {}", cycle, e);
                }
            }

            tracing::info!(target: "cache_janitor", "Stopped");
        });

        true
    }

    /// Stops the timer. Safe to call any number of times; only the first
    /// call after a `start` has an effect, and it returns `true`.
    pub fn cancel(&self) -> bool {
        let token = self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match token {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Evicts the cache right away and waits for completion.
    pub async fn evict_now(&self) -> Result<()> {
        self.store.clear_cache().await
    }

    /// Clears cache and storage, waiting for both. Both are attempted even
    /// if the first one fails; the first error is returned.
    pub async fn clear_everything(&self) -> Result<()> {
        let cache = self.store.clear_cache().await;
        let storage = self.store.clear_storage().await;
        cache.and(storage)
    }
}

impl Drop for CacheJanitor {
    fn drop(&mut self) {
        self.cancel();
    }
}
