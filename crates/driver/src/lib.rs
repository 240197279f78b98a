//! Understudy Driver Library
//!
//! The capability providers behind the `UiDriver` seam: a browser bridge
//! for end-to-end runs, a polling adapter over an in-process render
//! surface, and the simulated surface used for hermetic tests.

pub mod browser;
pub mod render;
pub mod sim;
pub mod surface;

// Re-export commonly used types
pub use browser::{BrowserConfig, BrowserDriver, BASE_URL_ENV, BRIDGE_CMD_ENV};
pub use render::{RenderDriver, POLL_INTERVAL, WAIT_TIMEOUT};
pub use sim::{SimFlow, SimSurface, SimSurfaceBuilder};
pub use surface::{RenderSurface, SurfaceNode};

use std::sync::Arc;

use understudy_core::backend::Backend;
use understudy_core::context::DriverSelector;
use understudy_core::driver::UiDriver;

/// Selector wiring each backend to its standard provider.
///
/// The render backend starts on an empty simulated surface; inject a
/// populated one with [`selector_with_surface`] or render against a real
/// component bridge by registering your own selector.
pub fn default_selector() -> DriverSelector {
    selector_with_surface(SimSurface::builder().build())
}

/// Selector serving the render backend from the given surface.
pub fn selector_with_surface(surface: Arc<dyn RenderSurface>) -> DriverSelector {
    Arc::new(move |backend| match backend {
        Backend::Browser => {
            Arc::new(BrowserDriver::new(BrowserConfig::default())) as Arc<dyn UiDriver>
        }
        Backend::Render => Arc::new(RenderDriver::new(surface.clone())) as Arc<dyn UiDriver>,
    })
}
