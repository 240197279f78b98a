//! The action catalog.
//!
//! One lazy static per logical action, each carrying its two procedure
//! bodies. Browser procedures drive the real page through the bridge;
//! render procedures rely on the surface tracking the bound router.

use once_cell::sync::Lazy;

use understudy_core::action::{define_action, proc, Action, ActionDefinition};
use understudy_core::locator::{Locator, TextMatch, UrlMatch};
use understudy_core::types::Credentials;

fn email_field() -> Locator {
    Locator::label(TextMatch::contains("email"))
}

fn password_field() -> Locator {
    Locator::label(TextMatch::contains("password"))
}

fn submit_button() -> Locator {
    Locator::role_named("button", TextMatch::any_of(["sign in", "log in", "submit"]))
}

/// Sign in through the login form and wait for the post-login redirect.
///
/// Starts by navigating to `/login` unless the scenario is already
/// there, so `authenticates` works as a first step on its own.
pub(crate) static AUTHENTICATES: Lazy<Action<Credentials>> = Lazy::new(|| {
    define_action(ActionDefinition {
        name: "authenticates",
        browser: proc(|ctx, credentials: Credentials| async move {
            let driver = ctx.driver();
            if ctx.pathname() != "/login" {
                driver.visit("/login").await?;
            }
            driver.fill(&email_field(), &credentials.email).await?;
            driver.fill(&password_field(), &credentials.password).await?;
            driver.click(&submit_button()).await?;
            driver.expect_url(&UrlMatch::not_contains("/login")).await?;
            // The redirect happened in the real page; mirror where it landed.
            let landed = driver.current_path().await?;
            ctx.router().navigate(&landed);
            Ok(())
        }),
        render: proc(|ctx, credentials: Credentials| async move {
            let driver = ctx.driver();
            driver.fill(&email_field(), &credentials.email).await?;
            driver.fill(&password_field(), &credentials.password).await?;
            driver.click(&submit_button()).await?;
            let router = ctx.router().clone();
            let probe = move || router.pathname() != "/login";
            driver
                .wait_until("navigation away from /login", &probe)
                .await
        }),
    })
});

/// Go straight to an application path.
pub(crate) static NAVIGATES_TO: Lazy<Action<String>> = Lazy::new(|| {
    define_action(ActionDefinition {
        name: "navigates_to",
        browser: proc(|ctx, path: String| async move { ctx.driver().visit(&path).await }),
        render: proc(|ctx, path: String| async move { ctx.driver().visit(&path).await }),
    })
});
