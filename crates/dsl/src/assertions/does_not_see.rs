//! Negative assertions, reached through `then.user.does_not_see`.

use once_cell::sync::Lazy;

use understudy_core::action::{define_assertion, proc, Action, ActionDefinition};
use understudy_core::locator::{Locator, TextMatch};

use super::{alert, progressbar};

/// No alert is showing.
pub(crate) static ERROR_MESSAGE: Lazy<Action<()>> = Lazy::new(|| {
    define_assertion(ActionDefinition {
        name: "does_not_see.error_message",
        browser: proc(|ctx, _args: ()| async move {
            ctx.driver().expect_absent(&alert()).await
        }),
        render: proc(|ctx, _args: ()| async move {
            ctx.driver().expect_absent(&alert()).await
        }),
    })
});

/// No loading indicator is showing.
pub(crate) static LOADING: Lazy<Action<()>> = Lazy::new(|| {
    define_assertion(ActionDefinition {
        name: "does_not_see.loading",
        browser: proc(|ctx, _args: ()| async move {
            ctx.driver().expect_absent(&progressbar()).await
        }),
        render: proc(|ctx, _args: ()| async move {
            ctx.driver().expect_absent(&progressbar()).await
        }),
    })
});

/// No element shows the given text.
pub(crate) static TEXT: Lazy<Action<String>> = Lazy::new(|| {
    define_assertion(ActionDefinition {
        name: "does_not_see.text",
        browser: proc(|ctx, text: String| async move {
            ctx.driver()
                .expect_absent(&Locator::text(TextMatch::contains(text)))
                .await
        }),
        render: proc(|ctx, text: String| async move {
            ctx.driver()
                .expect_absent(&Locator::text(TextMatch::contains(text)))
                .await
        }),
    })
});
