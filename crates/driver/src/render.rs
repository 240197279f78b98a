//! Render backend: polls an in-process surface with an auto-wait policy.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

use understudy_core::backend::Backend;
use understudy_core::driver::{ContextBinding, UiDriver};
use understudy_core::error::{Error, Result};
use understudy_core::locator::{Locator, UrlMatch};
use understudy_core::router::Router;

use crate::surface::RenderSurface;

/// Poll interval matching common rendering-library waitFor defaults.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Give-up threshold for waits against the rendered tree.
pub const WAIT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Driver over an in-process [`RenderSurface`].
///
/// Every query retries on the polling policy, so assertions tolerate
/// state that settles asynchronously. Navigation acts on the bound
/// router; the surface follows it.
pub struct RenderDriver {
    surface: Arc<dyn RenderSurface>,
    binding: Mutex<Option<ContextBinding>>,
    interval: Duration,
    timeout: Duration,
}

impl RenderDriver {
    pub fn new(surface: Arc<dyn RenderSurface>) -> RenderDriver {
        RenderDriver {
            surface,
            binding: Mutex::new(None),
            interval: POLL_INTERVAL,
            timeout: WAIT_TIMEOUT,
        }
    }

    /// Override the waiting policy.
    pub fn with_waits(mut self, interval: Duration, timeout: Duration) -> RenderDriver {
        self.interval = interval;
        self.timeout = timeout;
        self
    }

    fn router(&self) -> Result<Router> {
        self.binding
            .lock()
            .as_ref()
            .map(|binding| binding.router.clone())
            .ok_or_else(|| Error::Driver("render driver is not bound to a context".to_string()))
    }

    /// Poll `probe` until it yields a value or the policy gives up.
    async fn poll<T>(&self, probe: impl Fn() -> Option<T>) -> Option<T> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(value) = probe() {
                return Some(value);
            }
            if Instant::now() >= deadline {
                return None;
            }
            sleep(self.interval).await;
        }
    }
}

#[async_trait]
impl UiDriver for RenderDriver {
    fn backend(&self) -> Backend {
        Backend::Render
    }

    fn bind(&self, binding: ContextBinding) {
        self.surface.attach(binding.clone());
        *self.binding.lock() = Some(binding);
    }

    async fn visit(&self, path: &str) -> Result<()> {
        debug!("render visit {}", path);
        self.router()?.navigate(path);
        Ok(())
    }

    async fn fill(&self, target: &Locator, value: &str) -> Result<()> {
        let filled = self
            .poll(|| self.surface.fill(target, value).then_some(()))
            .await;
        match filled {
            Some(()) => Ok(()),
            None => Err(Error::Driver(format!("no form control matching {target}"))),
        }
    }

    async fn click(&self, target: &Locator) -> Result<()> {
        debug!("render click {}", target);
        let clicked = self.poll(|| self.surface.click(target).then_some(())).await;
        match clicked {
            Some(()) => Ok(()),
            None => Err(Error::Driver(format!("no element matching {target} to click"))),
        }
    }

    async fn expect_present(&self, target: &Locator) -> Result<()> {
        match self.poll(|| self.surface.query(target)).await {
            Some(_) => Ok(()),
            None => Err(Error::AssertionFailed(format!(
                "expected an element matching {target}"
            ))),
        }
    }

    async fn expect_absent(&self, target: &Locator) -> Result<()> {
        let gone = self
            .poll(|| self.surface.query(target).is_none().then_some(()))
            .await;
        match gone {
            Some(()) => Ok(()),
            None => Err(Error::AssertionFailed(format!(
                "expected no element matching {target}, but one is present"
            ))),
        }
    }

    async fn expect_text(&self, target: &Locator, needle: &str) -> Result<()> {
        let wanted = needle.to_lowercase();
        let found = self
            .poll(|| {
                self.surface
                    .query(target)
                    .filter(|node| node.text.to_lowercase().contains(&wanted))
            })
            .await;
        match found {
            Some(_) => Ok(()),
            None => {
                let message = match self.surface.query(target) {
                    Some(node) => format!(
                        "expected {target} to contain \"{needle}\", got \"{}\"",
                        node.text
                    ),
                    None => format!("expected {target} to contain \"{needle}\", but no element matched"),
                };
                Err(Error::AssertionFailed(message))
            }
        }
    }

    async fn expect_url(&self, matcher: &UrlMatch) -> Result<()> {
        let router = self.router()?;
        let observed = router.clone();
        let satisfied = self
            .poll(|| matcher.matches(&observed.pathname()).then_some(()))
            .await;
        match satisfied {
            Some(()) => Ok(()),
            None => Err(Error::AssertionFailed(format!(
                "expected {matcher}, pathname is '{}'",
                router.pathname()
            ))),
        }
    }

    async fn current_path(&self) -> Result<String> {
        Ok(self.router()?.pathname())
    }

    async fn wait_until(
        &self,
        what: &str,
        probe: &(dyn Fn() -> bool + Send + Sync),
    ) -> Result<()> {
        match self.poll(|| probe().then_some(())).await {
            Some(()) => Ok(()),
            None => Err(Error::WaitTimeout {
                what: what.to_string(),
                waited_ms: self.timeout.as_millis() as u64,
            }),
        }
    }
}
