//! Scenario harness: context lifecycle around a given/when/then body.
//!
//! Every run owns a private [`ContextStore`], creates a fresh context
//! before the body starts, and resets it when the body finishes, whether
//! it passes, fails, or panics. Concurrent scenarios therefore never
//! share state.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use understudy_core::backend::Backend;
use understudy_core::context::{ContextConfig, ContextStore};
use understudy_core::driver::UiDriver;
use understudy_core::error::{Error, Result};

use understudy_driver::surface::RenderSurface;
use understudy_driver::{default_selector, selector_with_surface};

use crate::actor::UserActor;
use crate::given::Given;

/// The authoring surface handed to a scenario body.
pub struct Dsl {
    pub given: Given,
    pub when: When,
    pub then: Then,
}

/// Actions the user takes.
pub struct When {
    pub user: UserActor,
}

/// Expectations about what the user observes.
pub struct Then {
    pub user: UserActor,
}

impl Dsl {
    /// Bind the full authoring surface to one scenario's store.
    pub fn bind(store: &ContextStore) -> Dsl {
        Dsl {
            given: Given::bind(store),
            when: When {
                user: UserActor::bind(store),
            },
            then: Then {
                user: UserActor::bind(store),
            },
        }
    }
}

/// Configuration for a scenario run.
#[derive(Clone)]
pub struct HarnessConfig {
    context: ContextConfig,
}

impl Default for HarnessConfig {
    fn default() -> HarnessConfig {
        HarnessConfig {
            context: ContextConfig::new(default_selector()),
        }
    }
}

impl HarnessConfig {
    pub fn new(context: ContextConfig) -> HarnessConfig {
        HarnessConfig { context }
    }

    /// Pin the backend instead of detecting it from the environment.
    pub fn with_backend(self, backend: Backend) -> HarnessConfig {
        HarnessConfig {
            context: self.context.with_backend(backend),
        }
    }

    /// Serve the render backend from `surface`.
    pub fn with_surface(self, surface: Arc<dyn RenderSurface>) -> HarnessConfig {
        HarnessConfig {
            context: self.context.with_selector(selector_with_surface(surface)),
        }
    }

    /// Serve every backend with one pre-built driver.
    pub fn with_driver(self, driver: Arc<dyn UiDriver>) -> HarnessConfig {
        HarnessConfig {
            context: self.context.with_driver(driver),
        }
    }
}

/// Run `body` as a named scenario on the caller's async runtime.
pub async fn scenario<F, Fut>(name: &str, body: F) -> Result<()>
where
    F: FnOnce(Dsl) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    scenario_with(HarnessConfig::default(), name, body).await
}

/// [`scenario`] with explicit harness configuration.
pub async fn scenario_with<F, Fut>(config: HarnessConfig, name: &str, body: F) -> Result<()>
where
    F: FnOnce(Dsl) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let store = ContextStore::new(config.context);
    store.create();
    let _reset = ResetGuard {
        store: store.clone(),
    };

    let started = Instant::now();
    let outcome = body(Dsl::bind(&store)).await;
    match &outcome {
        Ok(()) => info!("✓ {} ({} ms)", name, started.elapsed().as_millis()),
        Err(err) => error!("✗ {} - {}", name, err),
    }
    outcome
}

/// Run a scenario without a host async runtime.
///
/// Meant for plain `#[test]` functions and scripts. Builds a private
/// current-thread runtime after warning that no async harness was
/// detected. Calling it from inside a runtime is refused; await
/// [`scenario`] there instead.
pub fn scenario_blocking<F, Fut>(name: &str, body: F) -> Result<()>
where
    F: FnOnce(Dsl) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(Error::Harness(format!(
            "scenario '{}' called through scenario_blocking inside an async runtime; await scenario() instead",
            name
        )));
    }
    warn!("no async test harness detected; running '{}' on a private runtime", name);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(scenario(name, body))
}

/// Install the diagnostic subscriber, honoring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs.
pub fn init_diagnostics() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// Resets the store even when the scenario body panics.
struct ResetGuard {
    store: ContextStore,
}

impl Drop for ResetGuard {
    fn drop(&mut self) {
        self.store.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_config() -> HarnessConfig {
        HarnessConfig::default().with_backend(Backend::Render)
    }

    #[tokio::test]
    async fn scenario_runs_the_body_against_a_fresh_context() {
        let result = scenario_with(render_config(), "navigates somewhere", |dsl| async move {
            dsl.given.user.is_on_login_page();
            dsl.when.user.navigates_to("/dashboard").await?;
            Ok(())
        })
        .await;
        result.unwrap();
    }

    #[tokio::test]
    async fn scenario_returns_the_body_failure() {
        let result = scenario_with(render_config(), "fails on purpose", |_dsl| async move {
            Err(Error::AssertionFailed("expected dashboard".to_string()))
        })
        .await;
        assert!(matches!(result, Err(Error::AssertionFailed(_))));
    }

    #[test]
    fn reset_guard_survives_panics() {
        let store = ContextStore::new(
            ContextConfig::new(default_selector()).with_backend(Backend::Render),
        );
        store.current();

        let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = ResetGuard {
                store: store.clone(),
            };
            panic!("scenario body exploded");
        }));

        assert!(caught.is_err());
        assert!(!store.is_active());
    }

    #[test]
    fn blocking_entry_runs_without_a_runtime() {
        let result = scenario_blocking("blocking navigation", |dsl| async move {
            dsl.when.user.navigates_to("/settings").await
        });
        result.unwrap();
    }

    #[tokio::test]
    async fn blocking_entry_refuses_a_nested_runtime() {
        let result = scenario_blocking("nested misuse", |_dsl| async move { Ok(()) });
        match result {
            Err(Error::Harness(message)) => assert!(message.contains("scenario_blocking")),
            other => panic!("expected a harness error, got {other:?}"),
        }
    }
}
