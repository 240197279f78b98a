//! Understudy DSL
//!
//! Given/when/then scenario authoring over the adapter-dispatch core:
//! a fixed actor catalog, synchronous seeding helpers, and a harness
//! that owns the context lifecycle. One scenario body runs unmodified
//! against either backend; the harness decides which at context
//! creation.

mod actions;
mod assertions;

pub mod actor;
pub mod given;
pub mod harness;

pub use actor::{DoesNotSee, Sees, UserActor};
pub use given::{Given, GivenApi, GivenUser};
pub use harness::{
    init_diagnostics, scenario, scenario_blocking, scenario_with, Dsl, HarnessConfig, Then, When,
};

// The vocabulary scenario bodies reach for.
pub use understudy_core::backend::Backend;
pub use understudy_core::error::{Error, Result};
pub use understudy_core::types::{Credentials, NotificationKind, User};

/// Understudy version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
