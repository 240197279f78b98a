//! Understudy Core Library
//!
//! Scenario-scoped context store, backend selection, and the dispatch
//! machinery that lets one scenario description run against either UI
//! back end.

pub mod action;
pub mod backend;
pub mod context;
pub mod driver;
pub mod error;
pub mod locator;
pub mod mocks;
pub mod router;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export commonly used types
pub use action::{define_action, define_assertion, proc, Action, ActionDefinition, Proc};
pub use backend::Backend;
pub use context::{ContextConfig, ContextStore, DriverSelector, ScenarioContext};
pub use driver::{ContextBinding, UiDriver};
pub use error::{Error, Result};
pub use locator::{Locator, TextMatch, UrlMatch};
pub use mocks::MockApi;
pub use router::Router;
pub use types::*;

/// Understudy version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
