#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sekai_core::{
    CacheJanitor, ConfirmPrompt, ExternalOpener, MainWindowSpec, NavigationGuard, Result,
    SessionPolicy, SessionStore, TrustedOrigin, ViewerConfig, ViewerError, WindowGeometry,
    WindowHost, WindowLifecycle, WindowStateRepository, ZoomLevel,
};
use url::Url;

pub const PERIOD: Duration = Duration::from_secs(30 * 60);

/// Ordered record of every side effect, shared by all fakes so tests can
/// assert on ordering across components.
#[derive(Default, Clone)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == entry).count()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.0.lock().unwrap().iter().position(|e| e == entry)
    }
}

pub struct FakeHost {
    pub journal: Journal,
    pub inspector_alive: AtomicBool,
    pub fullscreen: AtomicBool,
    pub geometry: Mutex<Option<WindowGeometry>>,
    pub created_specs: Mutex<Vec<MainWindowSpec>>,
    /// The native main window is gone; window-bound calls fail.
    pub main_destroyed: AtomicBool,
}

impl FakeHost {
    fn new(journal: Journal) -> Self {
        Self {
            journal,
            inspector_alive: AtomicBool::new(false),
            fullscreen: AtomicBool::new(false),
            geometry: Mutex::new(None),
            created_specs: Mutex::new(Vec::new()),
            main_destroyed: AtomicBool::new(false),
        }
    }
}

impl WindowHost for FakeHost {
    fn create_main(&self, spec: &MainWindowSpec) -> Result<()> {
        self.created_specs.lock().unwrap().push(spec.clone());
        self.journal.push("create_main");
        Ok(())
    }

    fn show_main(&self) -> Result<()> {
        self.journal.push("show_main");
        Ok(())
    }

    fn reload_main(&self) -> Result<()> {
        self.journal.push("reload");
        Ok(())
    }

    fn navigate_main(&self, url: &Url) -> Result<()> {
        self.journal.push(format!("navigate {url}"));
        Ok(())
    }

    fn go_back(&self) -> Result<()> {
        self.journal.push("back");
        Ok(())
    }

    fn go_forward(&self) -> Result<()> {
        self.journal.push("forward");
        Ok(())
    }

    fn set_zoom(&self, factor: f64) -> Result<()> {
        self.journal.push(format!("zoom {factor}"));
        Ok(())
    }

    fn toggle_fullscreen(&self) -> Result<bool> {
        let next = !self.fullscreen.load(Ordering::SeqCst);
        self.fullscreen.store(next, Ordering::SeqCst);
        Ok(next)
    }

    fn main_geometry(&self) -> Option<WindowGeometry> {
        self.geometry.lock().unwrap().clone()
    }

    fn open_inspector(&self) -> Result<()> {
        self.inspector_alive.store(true, Ordering::SeqCst);
        self.journal.push("open_inspector");
        Ok(())
    }

    fn focus_inspector(&self) -> Result<()> {
        self.journal.push("focus_inspector");
        Ok(())
    }

    fn close_inspector(&self) -> Result<()> {
        if self.main_destroyed.load(Ordering::SeqCst) {
            return Err(ViewerError::NoMainWindow);
        }
        self.inspector_alive.store(false, Ordering::SeqCst);
        self.journal.push("close_inspector");
        Ok(())
    }

    fn inspector_alive(&self) -> bool {
        self.inspector_alive.load(Ordering::SeqCst)
    }
}

pub struct FakeStore {
    pub journal: Journal,
    pub fail_cache: AtomicBool,
    /// How long each clear takes before it reports completion.
    pub latency: Mutex<Duration>,
}

impl FakeStore {
    async fn settle(&self) {
        let latency = *self.latency.lock().unwrap();
        if latency.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl SessionStore for FakeStore {
    async fn clear_cache(&self) -> Result<()> {
        self.settle().await;
        self.journal.push("clear_cache");
        if self.fail_cache.load(Ordering::SeqCst) {
            return Err(ViewerError::storage("cache locked"));
        }
        Ok(())
    }

    async fn clear_storage(&self) -> Result<()> {
        self.settle().await;
        self.journal.push("clear_storage");
        Ok(())
    }
}

pub struct FakeOpener {
    pub journal: Journal,
}

impl ExternalOpener for FakeOpener {
    fn open_external(&self, url: &Url) -> Result<()> {
        self.journal.push(format!("external {url}"));
        Ok(())
    }
}

pub struct ScriptedPrompt {
    pub answer: bool,
    pub journal: Journal,
}

#[async_trait]
impl ConfirmPrompt for ScriptedPrompt {
    async fn confirm_full_clear(&self) -> bool {
        self.journal.push("prompt");
        self.answer
    }
}

#[derive(Default)]
pub struct MemoryWindowState {
    pub saved: Mutex<Option<WindowGeometry>>,
}

impl WindowStateRepository for MemoryWindowState {
    fn load(&self) -> Result<Option<WindowGeometry>> {
        Ok(self.saved.lock().unwrap().clone())
    }

    fn save(&self, geometry: &WindowGeometry) -> Result<()> {
        *self.saved.lock().unwrap() = Some(geometry.clone());
        Ok(())
    }
}

pub struct Fixture {
    pub journal: Journal,
    pub host: Arc<FakeHost>,
    pub store: Arc<FakeStore>,
    pub window_state: Arc<MemoryWindowState>,
    pub lifecycle: WindowLifecycle,
}

impl Fixture {
    /// Must be called from within a tokio runtime.
    pub fn new() -> Self {
        let config = ViewerConfig::default();
        let journal = Journal::default();

        let policy = Arc::new(SessionPolicy::new(
            TrustedOrigin::parse(&config.trusted_origin).unwrap(),
            "TestAgent/1.0",
        ));
        let opener = Arc::new(FakeOpener {
            journal: journal.clone(),
        });
        let guard = Arc::new(NavigationGuard::new(policy.clone(), opener));

        let host = Arc::new(FakeHost::new(journal.clone()));
        let store = Arc::new(FakeStore {
            journal: journal.clone(),
            fail_cache: AtomicBool::new(false),
            latency: Mutex::new(Duration::ZERO),
        });
        let janitor = CacheJanitor::new(store.clone(), PERIOD, tokio::runtime::Handle::current());

        let spec = MainWindowSpec::from_config(&config, policy.configure(&config.partition))
            .unwrap();
        let window_state = Arc::new(MemoryWindowState::default());

        let lifecycle = WindowLifecycle::new(
            host.clone(),
            guard,
            janitor,
            spec,
            config.about_url().unwrap(),
            ZoomLevel::new(config.zoom.clone()),
        )
        .with_window_state(window_state.clone());

        Self {
            journal,
            host,
            store,
            window_state,
            lifecycle,
        }
    }

    pub fn prompt(&self, answer: bool) -> ScriptedPrompt {
        ScriptedPrompt {
            answer,
            journal: self.journal.clone(),
        }
    }
}
