//! The seam between the render driver and an in-process rendering library.

use understudy_core::driver::ContextBinding;
use understudy_core::locator::Locator;
use understudy_core::types::NotificationKind;

/// One element in the rendered accessibility tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceNode {
    /// ARIA role ("button", "alert", "progressbar", ...).
    pub role: String,
    /// Accessible name.
    pub name: String,
    /// Visible text content.
    pub text: String,
    /// Label of the form control, for inputs.
    pub label: Option<String>,
    /// Test id stamped on the element.
    pub test_id: Option<String>,
    /// Current input value.
    pub value: String,
}

impl SurfaceNode {
    /// Labelled text input.
    pub fn input(label: impl Into<String>) -> SurfaceNode {
        SurfaceNode {
            role: "textbox".to_string(),
            label: Some(label.into()),
            ..SurfaceNode::default()
        }
    }

    pub fn button(name: impl Into<String>) -> SurfaceNode {
        let name = name.into();
        SurfaceNode {
            role: "button".to_string(),
            text: name.clone(),
            name,
            ..SurfaceNode::default()
        }
    }

    pub fn heading(text: impl Into<String>) -> SurfaceNode {
        let text = text.into();
        SurfaceNode {
            role: "heading".to_string(),
            name: text.clone(),
            text,
            ..SurfaceNode::default()
        }
    }

    /// Plain text content with no interesting role.
    pub fn text(text: impl Into<String>) -> SurfaceNode {
        SurfaceNode {
            text: text.into(),
            ..SurfaceNode::default()
        }
    }

    pub fn alert(text: impl Into<String>) -> SurfaceNode {
        SurfaceNode {
            role: "alert".to_string(),
            text: text.into(),
            ..SurfaceNode::default()
        }
    }

    pub fn progressbar() -> SurfaceNode {
        SurfaceNode {
            role: "progressbar".to_string(),
            ..SurfaceNode::default()
        }
    }

    /// Notification toast carrying the `notification-{kind}` test id.
    pub fn notification(kind: NotificationKind, message: impl Into<String>) -> SurfaceNode {
        SurfaceNode {
            role: "status".to_string(),
            text: message.into(),
            test_id: Some(kind.test_id()),
            ..SurfaceNode::default()
        }
    }

    /// Whether this node satisfies `locator`.
    pub fn matches(&self, locator: &Locator) -> bool {
        match locator {
            Locator::Role { role, name } => {
                self.role == *role
                    && name
                        .as_ref()
                        .map_or(true, |matcher| matcher.matches(&self.name))
            }
            Locator::Label { text } => self
                .label
                .as_deref()
                .map_or(false, |label| text.matches(label)),
            Locator::Text { text } => !self.text.is_empty() && text.matches(&self.text),
            Locator::TestId { id } => self.test_id.as_deref() == Some(id.as_str()),
        }
    }
}

/// In-process rendering capability the render driver polls.
///
/// Implemented by a bridge into a real component renderer, or by
/// [`SimSurface`](crate::sim::SimSurface) for hermetic runs. All methods
/// are synchronous; the driver supplies the waiting policy.
pub trait RenderSurface: Send + Sync {
    /// Attach shared scenario state. Called when the driver is bound.
    fn attach(&self, binding: ContextBinding);

    /// First node matching `target`, if any.
    fn query(&self, target: &Locator) -> Option<SurfaceNode>;

    /// Type into the control matching `target`. False when none matches.
    fn fill(&self, target: &Locator, value: &str) -> bool;

    /// Activate the element matching `target`. False when none matches.
    fn click(&self, target: &Locator) -> bool;
}
