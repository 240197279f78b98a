//! The capability interface both back ends implement.

use async_trait::async_trait;

use crate::backend::Backend;
use crate::error::Result;
use crate::locator::{Locator, UrlMatch};
use crate::mocks::MockApi;
use crate::router::Router;

/// Shared context state handed to a driver for the life of a scenario.
#[derive(Clone)]
pub struct ContextBinding {
    pub router: Router,
    pub mocks: MockApi,
}

/// UI capability surface a scenario context dispatches through.
///
/// One implementation drives a real browser over a bridge process, the
/// other queries an in-process render surface. Procedure bodies only ever
/// see this trait, which is what keeps a scenario description portable.
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// Which backend this driver serves.
    fn backend(&self) -> Backend;

    /// Attach the scenario's shared state. Called once at context creation.
    fn bind(&self, binding: ContextBinding);

    /// Navigate to an application path.
    async fn visit(&self, path: &str) -> Result<()>;

    /// Type into the form control named by `target`.
    async fn fill(&self, target: &Locator, value: &str) -> Result<()>;

    /// Activate the element named by `target`.
    async fn click(&self, target: &Locator) -> Result<()>;

    /// Wait until an element matching `target` is present.
    async fn expect_present(&self, target: &Locator) -> Result<()>;

    /// Wait until no element matches `target`.
    async fn expect_absent(&self, target: &Locator) -> Result<()>;

    /// Wait until the element named by `target` contains `needle`.
    async fn expect_text(&self, target: &Locator, needle: &str) -> Result<()>;

    /// Wait until the current URL satisfies `matcher`.
    async fn expect_url(&self, matcher: &UrlMatch) -> Result<()>;

    /// Pathname portion of the current URL.
    async fn current_path(&self) -> Result<String>;

    /// Wait until `probe` reports true.
    async fn wait_until(&self, what: &str, probe: &(dyn Fn() -> bool + Send + Sync))
        -> Result<()>;
}
