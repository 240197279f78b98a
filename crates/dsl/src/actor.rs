//! Actor composition: the fixed catalog bound to one scenario's store.

use understudy_core::context::ContextStore;
use understudy_core::error::Result;
use understudy_core::types::{Credentials, NotificationKind};

use crate::actions;
use crate::assertions;

/// The acting user. Every method dispatches through the store's active
/// context, so the same call runs the browser or render procedure
/// depending on which backend the scenario was created for.
#[derive(Clone)]
pub struct UserActor {
    store: ContextStore,
    /// Positive assertions.
    pub sees: Sees,
    /// Absence assertions.
    pub does_not_see: DoesNotSee,
}

impl UserActor {
    /// Bind the catalog to a scenario's store.
    pub fn bind(store: &ContextStore) -> UserActor {
        UserActor {
            store: store.clone(),
            sees: Sees {
                store: store.clone(),
            },
            does_not_see: DoesNotSee {
                store: store.clone(),
            },
        }
    }

    /// Sign in with `credentials` and wait for the post-login redirect.
    pub async fn authenticates(&self, credentials: Credentials) -> Result<()> {
        actions::AUTHENTICATES.invoke(&self.store, credentials).await
    }

    /// Navigate straight to `path`.
    pub async fn navigates_to(&self, path: impl Into<String>) -> Result<()> {
        actions::NAVIGATES_TO.invoke(&self.store, path.into()).await
    }
}

/// Assertions that something is visible.
#[derive(Clone)]
pub struct Sees {
    store: ContextStore,
}

impl Sees {
    /// The dashboard URL and heading are both present.
    pub async fn dashboard(&self) -> Result<()> {
        assertions::sees::DASHBOARD.invoke(&self.store, ()).await
    }

    /// An alert shows `text`.
    pub async fn error_message(&self, text: impl Into<String>) -> Result<()> {
        assertions::sees::ERROR_MESSAGE
            .invoke(&self.store, text.into())
            .await
    }

    /// A notification of `kind` is showing, with `message` text when given.
    pub async fn notification(
        &self,
        kind: NotificationKind,
        message: Option<&str>,
    ) -> Result<()> {
        assertions::sees::NOTIFICATION
            .invoke(&self.store, (kind, message.map(str::to_string)))
            .await
    }

    /// A loading indicator is showing.
    pub async fn loading(&self) -> Result<()> {
        assertions::sees::LOADING.invoke(&self.store, ()).await
    }

    /// Some element shows `text`.
    pub async fn text(&self, text: impl Into<String>) -> Result<()> {
        assertions::sees::TEXT.invoke(&self.store, text.into()).await
    }
}

/// Assertions that something is absent.
#[derive(Clone)]
pub struct DoesNotSee {
    store: ContextStore,
}

impl DoesNotSee {
    /// No alert is showing.
    pub async fn error_message(&self) -> Result<()> {
        assertions::does_not_see::ERROR_MESSAGE
            .invoke(&self.store, ())
            .await
    }

    /// No loading indicator is showing.
    pub async fn loading(&self) -> Result<()> {
        assertions::does_not_see::LOADING.invoke(&self.store, ()).await
    }

    /// No element shows `text`.
    pub async fn text(&self, text: impl Into<String>) -> Result<()> {
        assertions::does_not_see::TEXT
            .invoke(&self.store, text.into())
            .await
    }
}
