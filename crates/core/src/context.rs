//! Scenario context and its store.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::backend::Backend;
use crate::driver::{ContextBinding, UiDriver};
use crate::mocks::MockApi;
use crate::router::Router;
use crate::types::AuthSession;

/// Maps a backend to the driver serving it.
pub type DriverSelector = Arc<dyn Fn(Backend) -> Arc<dyn UiDriver> + Send + Sync>;

/// How a store builds contexts: backend choice plus driver wiring.
#[derive(Clone)]
pub struct ContextConfig {
    backend: Option<Backend>,
    selector: DriverSelector,
}

impl ContextConfig {
    /// Config that detects the backend from the environment at create time.
    pub fn new(selector: DriverSelector) -> ContextConfig {
        ContextConfig {
            backend: None,
            selector,
        }
    }

    /// Pin the backend instead of detecting it.
    pub fn with_backend(mut self, backend: Backend) -> ContextConfig {
        self.backend = Some(backend);
        self
    }

    /// Replace the driver wiring, keeping the backend choice.
    pub fn with_selector(mut self, selector: DriverSelector) -> ContextConfig {
        self.selector = selector;
        self
    }

    /// Serve every backend with one pre-built driver.
    pub fn with_driver(self, driver: Arc<dyn UiDriver>) -> ContextConfig {
        ContextConfig {
            backend: self.backend,
            selector: Arc::new(move |_| driver.clone()),
        }
    }
}

/// Live state for one scenario run.
///
/// Cheap to clone; all clones observe the same state.
#[derive(Clone)]
pub struct ScenarioContext {
    inner: Arc<ContextState>,
}

struct ContextState {
    backend: Backend,
    driver: Arc<dyn UiDriver>,
    router: Router,
    mocks: MockApi,
    auth: Mutex<Option<AuthSession>>,
}

impl ScenarioContext {
    fn new(backend: Backend, driver: Arc<dyn UiDriver>) -> ScenarioContext {
        let router = Router::new();
        let mocks = MockApi::new();
        driver.bind(ContextBinding {
            router: router.clone(),
            mocks: mocks.clone(),
        });
        ScenarioContext {
            inner: Arc::new(ContextState {
                backend,
                driver,
                router,
                mocks,
                auth: Mutex::new(None),
            }),
        }
    }

    /// Backend this context was created for. Fixed for its lifetime.
    pub fn backend(&self) -> Backend {
        self.inner.backend
    }

    /// The capability driver serving this context.
    pub fn driver(&self) -> Arc<dyn UiDriver> {
        self.inner.driver.clone()
    }

    pub fn router(&self) -> &Router {
        &self.inner.router
    }

    pub fn mocks(&self) -> &MockApi {
        &self.inner.mocks
    }

    /// Current simulated pathname.
    pub fn pathname(&self) -> String {
        self.inner.router.pathname()
    }

    /// Snapshot of the auth state, if a user is signed in.
    pub fn auth(&self) -> Option<AuthSession> {
        self.inner.auth.lock().clone()
    }

    /// Record a signed-in session.
    pub fn set_auth(&self, session: AuthSession) {
        *self.inner.auth.lock() = Some(session);
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.auth.lock().is_some()
    }
}

/// Scenario-scoped owner of the active context.
///
/// Each scenario run builds its own store, so two runs never share state.
/// `current` creates lazily, `reset` drops, and the next access after a
/// reset builds a fresh context.
#[derive(Clone)]
pub struct ContextStore {
    inner: Arc<StoreState>,
}

struct StoreState {
    config: ContextConfig,
    slot: Mutex<Option<ScenarioContext>>,
}

impl ContextStore {
    pub fn new(config: ContextConfig) -> ContextStore {
        ContextStore {
            inner: Arc::new(StoreState {
                config,
                slot: Mutex::new(None),
            }),
        }
    }

    fn build(&self) -> ScenarioContext {
        let backend = self
            .inner
            .config
            .backend
            .unwrap_or_else(Backend::detect);
        let driver = (self.inner.config.selector)(backend);
        debug!("creating context for {} backend", backend);
        ScenarioContext::new(backend, driver)
    }

    /// Build a fresh context, replacing whatever was active.
    pub fn create(&self) -> ScenarioContext {
        let context = self.build();
        *self.inner.slot.lock() = Some(context.clone());
        context
    }

    /// The active context, created on first use.
    pub fn current(&self) -> ScenarioContext {
        let mut slot = self.inner.slot.lock();
        if let Some(context) = slot.as_ref() {
            return context.clone();
        }
        let context = self.build();
        *slot = Some(context.clone());
        context
    }

    /// Drop the active context. Safe to call when none is active.
    pub fn reset(&self) {
        if self.inner.slot.lock().take().is_some() {
            debug!("context reset");
        }
    }

    /// Whether a context is currently active.
    pub fn is_active(&self) -> bool {
        self.inner.slot.lock().is_some()
    }
}
