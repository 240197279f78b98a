//! Element locators shared by both back ends.
//!
//! A locator names an element the way an accessibility-first testing
//! library would: by ARIA role, form label, visible text, or test id.
//! The serde tagging keeps the wire form readable in bridge traffic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How to find an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum Locator {
    /// ARIA role, optionally narrowed by accessible name.
    Role {
        role: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<TextMatch>,
    },
    /// Form control labelled with matching text.
    Label { text: TextMatch },
    /// Element whose visible text matches.
    Text { text: TextMatch },
    /// Element stamped with a test id.
    TestId { id: String },
}

impl Locator {
    pub fn role(role: impl Into<String>) -> Locator {
        Locator::Role {
            role: role.into(),
            name: None,
        }
    }

    pub fn role_named(role: impl Into<String>, name: TextMatch) -> Locator {
        Locator::Role {
            role: role.into(),
            name: Some(name),
        }
    }

    pub fn label(text: TextMatch) -> Locator {
        Locator::Label { text }
    }

    pub fn text(text: TextMatch) -> Locator {
        Locator::Text { text }
    }

    pub fn test_id(id: impl Into<String>) -> Locator {
        Locator::TestId { id: id.into() }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Role { role, name: None } => write!(f, "role={}", role),
            Locator::Role {
                role,
                name: Some(name),
            } => write!(f, "role={} name{}", role, name),
            Locator::Label { text } => write!(f, "label{}", text),
            Locator::Text { text } => write!(f, "text{}", text),
            Locator::TestId { id } => write!(f, "testid={}", id),
        }
    }
}

/// Text comparison mode for locator names, labels, and contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TextMatch {
    /// Case-sensitive exact equality.
    Exact { value: String },
    /// Case-insensitive substring.
    Contains { value: String },
    /// Case-insensitive substring against any of the alternatives.
    AnyOf { values: Vec<String> },
}

impl TextMatch {
    pub fn exact(value: impl Into<String>) -> TextMatch {
        TextMatch::Exact {
            value: value.into(),
        }
    }

    pub fn contains(value: impl Into<String>) -> TextMatch {
        TextMatch::Contains {
            value: value.into(),
        }
    }

    pub fn any_of<I, S>(values: I) -> TextMatch
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TextMatch::AnyOf {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `candidate` satisfies this matcher.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            TextMatch::Exact { value } => candidate == value,
            TextMatch::Contains { value } => {
                candidate.to_lowercase().contains(&value.to_lowercase())
            }
            TextMatch::AnyOf { values } => {
                let haystack = candidate.to_lowercase();
                values
                    .iter()
                    .any(|value| haystack.contains(&value.to_lowercase()))
            }
        }
    }
}

impl fmt::Display for TextMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextMatch::Exact { value } => write!(f, "=\"{}\"", value),
            TextMatch::Contains { value } => write!(f, "~\"{}\"", value),
            TextMatch::AnyOf { values } => write!(f, "~({})", values.join("|")),
        }
    }
}

/// URL expectation evaluated by `UiDriver::expect_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "expect", rename_all = "snake_case")]
pub enum UrlMatch {
    Contains { fragment: String },
    NotContains { fragment: String },
}

impl UrlMatch {
    pub fn contains(fragment: impl Into<String>) -> UrlMatch {
        UrlMatch::Contains {
            fragment: fragment.into(),
        }
    }

    pub fn not_contains(fragment: impl Into<String>) -> UrlMatch {
        UrlMatch::NotContains {
            fragment: fragment.into(),
        }
    }

    pub fn matches(&self, url: &str) -> bool {
        match self {
            UrlMatch::Contains { fragment } => url.contains(fragment.as_str()),
            UrlMatch::NotContains { fragment } => !url.contains(fragment.as_str()),
        }
    }
}

impl fmt::Display for UrlMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlMatch::Contains { fragment } => write!(f, "url containing '{}'", fragment),
            UrlMatch::NotContains { fragment } => write!(f, "url not containing '{}'", fragment),
        }
    }
}
