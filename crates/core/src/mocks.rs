//! Endpoint mock registry seeded by given-steps and consulted by both back ends.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::types::MockHandler;

/// Cloneable handle to the scenario's endpoint mocks.
///
/// Registration is last-write-wins per pattern. Lookups prefer an exact
/// pattern over `*` globs; among matching globs the most recently
/// registered one wins. A version counter ticks on every registration so
/// adapters can cheaply notice new handlers.
#[derive(Clone)]
pub struct MockApi {
    inner: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    handlers: Mutex<Vec<(String, MockHandler)>>,
    version: AtomicU64,
}

impl MockApi {
    pub fn new() -> MockApi {
        MockApi {
            inner: Arc::new(MockState::default()),
        }
    }

    /// Register (or replace) the handler for an endpoint pattern.
    pub fn register(&self, pattern: &str, handler: MockHandler) {
        debug!("mock endpoint {} -> {}", pattern, handler.status);
        let mut handlers = self.inner.handlers.lock();
        handlers.retain(|(existing, _)| existing != pattern);
        handlers.push((pattern.to_string(), handler));
        self.inner.version.fetch_add(1, Ordering::SeqCst);
    }

    /// Handler for a concrete request path, if any pattern matches.
    pub fn handler_for(&self, path: &str) -> Option<MockHandler> {
        let handlers = self.inner.handlers.lock();
        if let Some((_, handler)) = handlers.iter().find(|(pattern, _)| pattern == path) {
            return Some(handler.clone());
        }
        handlers
            .iter()
            .rev()
            .find(|(pattern, _)| glob_matches(pattern, path))
            .map(|(_, handler)| handler.clone())
    }

    /// Monotonic registration counter.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::SeqCst)
    }

    /// Current pattern/handler pairs in registration order.
    pub fn snapshot(&self) -> Vec<(String, MockHandler)> {
        self.inner.handlers.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.handlers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.handlers.lock().is_empty()
    }
}

impl Default for MockApi {
    fn default() -> MockApi {
        MockApi::new()
    }
}

/// `*` matches any run of characters, including none.
fn glob_matches(pattern: &str, path: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == path;
    }
    let mut fragments = pattern.split('*');
    let head = fragments.next().unwrap_or("");
    if !path.starts_with(head) {
        return false;
    }
    let mut rest = &path[head.len()..];
    let fragments: Vec<&str> = fragments.collect();
    for (position, fragment) in fragments.iter().enumerate() {
        if position == fragments.len() - 1 {
            return fragment.is_empty() || rest.ends_with(fragment);
        }
        match rest.find(fragment) {
            Some(index) => rest = &rest[index + fragment.len()..],
            None => return false,
        }
    }
    true
}
