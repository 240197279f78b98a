//! Backend identity and environment detection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Set by browser tooling while a driver session is live.
pub const BROWSER_SESSION_ENV: &str = "UNDERSTUDY_BROWSER_SESSION";

/// Forces a backend regardless of session markers.
pub const BACKEND_ENV: &str = "UNDERSTUDY_BACKEND";

/// The two execution back ends a scenario can run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Real browser automated through an external bridge process.
    Browser,
    /// In-process component rendering behind a `RenderSurface`.
    Render,
}

impl Backend {
    /// All backends, in dispatch-table order.
    pub const ALL: [Backend; 2] = [Backend::Browser, Backend::Render];

    /// Detect the backend from the process environment.
    ///
    /// A live browser session marker wins over everything, the explicit
    /// `UNDERSTUDY_BACKEND=browser` override comes next, and in-process
    /// rendering is the default.
    pub fn detect() -> Backend {
        Self::detect_from(|name| std::env::var(name).ok())
    }

    /// Detection against an arbitrary environment lookup.
    pub fn detect_from(lookup: impl Fn(&str) -> Option<String>) -> Backend {
        if lookup(BROWSER_SESSION_ENV).is_some_and(|v| !v.is_empty()) {
            return Backend::Browser;
        }
        if lookup(BACKEND_ENV).as_deref() == Some("browser") {
            return Backend::Browser;
        }
        Backend::Render
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Browser => "browser",
            Backend::Render => "render",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Backend::Browser => 0,
            Backend::Render => 1,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn defaults_to_render() {
        assert_eq!(Backend::detect_from(env(&[])), Backend::Render);
    }

    #[test]
    fn session_marker_selects_browser() {
        let lookup = env(&[(BROWSER_SESSION_ENV, "1")]);
        assert_eq!(Backend::detect_from(lookup), Backend::Browser);
    }

    #[test]
    fn empty_session_marker_is_ignored() {
        let lookup = env(&[(BROWSER_SESSION_ENV, "")]);
        assert_eq!(Backend::detect_from(lookup), Backend::Render);
    }

    #[test]
    fn backend_override_selects_browser() {
        let lookup = env(&[(BACKEND_ENV, "browser")]);
        assert_eq!(Backend::detect_from(lookup), Backend::Browser);
    }

    #[test]
    fn unknown_override_falls_back_to_render() {
        let lookup = env(&[(BACKEND_ENV, "selenium")]);
        assert_eq!(Backend::detect_from(lookup), Backend::Render);
    }

    #[test]
    fn session_marker_wins_over_override() {
        let lookup = env(&[(BROWSER_SESSION_ENV, "1"), (BACKEND_ENV, "render")]);
        assert_eq!(Backend::detect_from(lookup), Backend::Browser);
    }

    #[test]
    fn all_lists_backends_in_dispatch_table_order() {
        for (slot, backend) in Backend::ALL.into_iter().enumerate() {
            assert_eq!(backend.index(), slot);
        }
    }
}
