//! Positive assertions, reached through `then.user.sees`.

use once_cell::sync::Lazy;

use understudy_core::action::{define_assertion, proc, Action, ActionDefinition};
use understudy_core::locator::{Locator, TextMatch, UrlMatch};
use understudy_core::types::NotificationKind;

use super::{alert, progressbar};

fn dashboard_heading() -> Locator {
    Locator::role_named("heading", TextMatch::contains("dashboard"))
}

/// The user landed on the dashboard: URL and heading both agree.
pub(crate) static DASHBOARD: Lazy<Action<()>> = Lazy::new(|| {
    define_assertion(ActionDefinition {
        name: "sees.dashboard",
        browser: proc(|ctx, _args: ()| async move {
            let driver = ctx.driver();
            driver.expect_url(&UrlMatch::contains("/dashboard")).await?;
            driver.expect_present(&dashboard_heading()).await
        }),
        render: proc(|ctx, _args: ()| async move {
            let driver = ctx.driver();
            driver.expect_url(&UrlMatch::contains("/dashboard")).await?;
            driver.expect_present(&dashboard_heading()).await
        }),
    })
});

/// An alert is showing the given text.
pub(crate) static ERROR_MESSAGE: Lazy<Action<String>> = Lazy::new(|| {
    define_assertion(ActionDefinition {
        name: "sees.error_message",
        browser: proc(|ctx, text: String| async move {
            ctx.driver().expect_text(&alert(), &text).await
        }),
        render: proc(|ctx, text: String| async move {
            ctx.driver().expect_text(&alert(), &text).await
        }),
    })
});

/// A notification of the given kind is showing; with `Some(message)`,
/// its text must contain the message too.
pub(crate) static NOTIFICATION: Lazy<Action<(NotificationKind, Option<String>)>> =
    Lazy::new(|| {
        define_assertion(ActionDefinition {
            name: "sees.notification",
            browser: proc(
                |ctx, (kind, message): (NotificationKind, Option<String>)| async move {
                    let target = Locator::test_id(kind.test_id());
                    match message {
                        Some(message) => ctx.driver().expect_text(&target, &message).await,
                        None => ctx.driver().expect_present(&target).await,
                    }
                },
            ),
            render: proc(
                |ctx, (kind, message): (NotificationKind, Option<String>)| async move {
                    let target = Locator::test_id(kind.test_id());
                    match message {
                        Some(message) => ctx.driver().expect_text(&target, &message).await,
                        None => ctx.driver().expect_present(&target).await,
                    }
                },
            ),
        })
    });

/// A loading indicator is showing.
pub(crate) static LOADING: Lazy<Action<()>> = Lazy::new(|| {
    define_assertion(ActionDefinition {
        name: "sees.loading",
        browser: proc(|ctx, _args: ()| async move {
            ctx.driver().expect_present(&progressbar()).await
        }),
        render: proc(|ctx, _args: ()| async move {
            ctx.driver().expect_present(&progressbar()).await
        }),
    })
});

/// Some element shows the given text.
pub(crate) static TEXT: Lazy<Action<String>> = Lazy::new(|| {
    define_assertion(ActionDefinition {
        name: "sees.text",
        browser: proc(|ctx, text: String| async move {
            ctx.driver()
                .expect_present(&Locator::text(TextMatch::contains(text)))
                .await
        }),
        render: proc(|ctx, text: String| async move {
            ctx.driver()
                .expect_present(&Locator::text(TextMatch::contains(text)))
                .await
        }),
    })
});
