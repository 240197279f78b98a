//! Test-only driver stand-ins.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::backend::Backend;
use crate::driver::{ContextBinding, UiDriver};
use crate::error::Result;
use crate::locator::{Locator, UrlMatch};

/// Driver that records capability calls and always succeeds.
pub struct RecordingDriver {
    backend: Backend,
    binding: Mutex<Option<ContextBinding>>,
    calls: Mutex<Vec<String>>,
}

impl RecordingDriver {
    pub fn new(backend: Backend) -> Arc<RecordingDriver> {
        Arc::new(RecordingDriver {
            backend,
            binding: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl UiDriver for RecordingDriver {
    fn backend(&self) -> Backend {
        self.backend
    }

    fn bind(&self, binding: ContextBinding) {
        *self.binding.lock() = Some(binding);
    }

    async fn visit(&self, path: &str) -> Result<()> {
        self.record(format!("visit {path}"));
        if let Some(binding) = self.binding.lock().as_ref() {
            binding.router.navigate(path);
        }
        Ok(())
    }

    async fn fill(&self, target: &Locator, value: &str) -> Result<()> {
        self.record(format!("fill {target} {value}"));
        Ok(())
    }

    async fn click(&self, target: &Locator) -> Result<()> {
        self.record(format!("click {target}"));
        Ok(())
    }

    async fn expect_present(&self, target: &Locator) -> Result<()> {
        self.record(format!("expect_present {target}"));
        Ok(())
    }

    async fn expect_absent(&self, target: &Locator) -> Result<()> {
        self.record(format!("expect_absent {target}"));
        Ok(())
    }

    async fn expect_text(&self, target: &Locator, needle: &str) -> Result<()> {
        self.record(format!("expect_text {target} {needle}"));
        Ok(())
    }

    async fn expect_url(&self, matcher: &UrlMatch) -> Result<()> {
        self.record(format!("expect_url {matcher}"));
        Ok(())
    }

    async fn current_path(&self) -> Result<String> {
        let path = self
            .binding
            .lock()
            .as_ref()
            .map(|binding| binding.router.pathname())
            .unwrap_or_else(|| "/".to_string());
        Ok(path)
    }

    async fn wait_until(
        &self,
        what: &str,
        _probe: &(dyn Fn() -> bool + Send + Sync),
    ) -> Result<()> {
        self.record(format!("wait_until {what}"));
        Ok(())
    }
}
