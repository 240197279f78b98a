//! Action registry and backend dispatch.
//!
//! A logical action carries at most one procedure per backend. Invoking
//! it reads the active context's backend and runs that procedure; a
//! backend with no registered procedure is a dispatch fault, never a
//! silent no-op.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::debug;

use crate::backend::Backend;
use crate::context::{ContextStore, ScenarioContext};
use crate::error::{Error, Result};

/// Boxed per-backend procedure.
pub type Proc<A> = Arc<dyn Fn(ScenarioContext, A) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Box an async closure into a dispatch-table slot.
pub fn proc<A, F, Fut>(body: F) -> Option<Proc<A>>
where
    A: Send + 'static,
    F: Fn(ScenarioContext, A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Some(Arc::new(move |context, args| Box::pin(body(context, args))))
}

/// One logical action: a name plus its per-backend procedures.
pub struct ActionDefinition<A> {
    pub name: &'static str,
    pub browser: Option<Proc<A>>,
    pub render: Option<Proc<A>>,
}

/// Build an action from its per-backend procedures.
pub fn define_action<A: Send + 'static>(definition: ActionDefinition<A>) -> Action<A> {
    let ActionDefinition {
        name,
        browser,
        render,
    } = definition;
    let mut table: [Option<Proc<A>>; 2] = [None, None];
    table[Backend::Browser.index()] = browser;
    table[Backend::Render.index()] = render;
    Action { name, table }
}

/// Assertions dispatch exactly like actions; the distinction is naming.
pub fn define_assertion<A: Send + 'static>(definition: ActionDefinition<A>) -> Action<A> {
    define_action(definition)
}

/// A registered action, dispatching on the active context's backend.
pub struct Action<A> {
    name: &'static str,
    table: [Option<Proc<A>>; 2],
}

impl<A: Send + 'static> Action<A> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the procedure registered for the store's active backend.
    ///
    /// Fails with `Error::DispatchFault` when no procedure covers that
    /// backend.
    pub async fn invoke(&self, store: &ContextStore, args: A) -> Result<()> {
        let context = store.current();
        let backend = context.backend();
        let Some(procedure) = self.table[backend.index()].as_ref() else {
            return Err(Error::DispatchFault {
                action: self.name.to_string(),
                backend,
            });
        };
        debug!("dispatching '{}' on {} backend", self.name, backend);
        procedure(context, args).await
    }
}
