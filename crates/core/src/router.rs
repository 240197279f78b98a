//! Simulated location shared between the context and its driver.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

/// Cloneable handle to the simulated browser location.
///
/// The render backend navigates by mutating this. The browser backend
/// mirrors the real URL into it after navigation-changing calls, so both
/// back ends expose the same pathname to scenario code.
#[derive(Clone)]
pub struct Router {
    pathname: Arc<Mutex<String>>,
}

impl Router {
    /// Fresh router at the root path.
    pub fn new() -> Router {
        Router {
            pathname: Arc::new(Mutex::new("/".to_string())),
        }
    }

    /// Current simulated pathname.
    pub fn pathname(&self) -> String {
        self.pathname.lock().clone()
    }

    /// Record a navigation.
    pub fn navigate(&self, path: &str) {
        debug!("router navigate -> {}", path);
        *self.pathname.lock() = path.to_string();
    }
}

impl Default for Router {
    fn default() -> Router {
        Router::new()
    }
}
