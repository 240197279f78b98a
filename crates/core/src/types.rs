//! State types carried by a scenario context.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token paired with the default test identity.
pub const MOCK_TOKEN: &str = "mock-token";

/// Signed-in user identity seeded into a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> User {
        User {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            role: None,
        }
    }

    /// Stock identity used when a scenario says "a user" without details.
    pub fn test_default() -> User {
        User {
            id: "1".to_string(),
            email: "test@example.com".to_string(),
            name: "Test User".to_string(),
            role: None,
        }
    }
}

/// Credentials fed to the sign-in flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Credentials {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Authentication state stored on the context once a user is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

impl AuthSession {
    pub fn new(user: User, token: impl Into<String>) -> AuthSession {
        AuthSession {
            user,
            token: token.into(),
        }
    }

    /// Session for the default test identity.
    pub fn test_default() -> AuthSession {
        AuthSession::new(User::test_default(), MOCK_TOKEN)
    }
}

/// Canned response a mocked endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockHandler {
    pub status: u16,
    pub body: Value,
}

impl MockHandler {
    pub fn new(status: u16, body: Value) -> MockHandler {
        MockHandler { status, body }
    }

    /// 200 response with the given body.
    pub fn ok(body: Value) -> MockHandler {
        MockHandler::new(200, body)
    }

    /// Whether intercepting layers should treat this as a success.
    pub fn is_success(&self) -> bool {
        self.status < 400
    }
}

/// Notification severity, surfaced via `notification-{kind}` test ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        }
    }

    /// Test id the rendering layer stamps on the notification element.
    pub fn test_id(self) -> String {
        format!("notification-{}", self.as_str())
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_identity_matches_fixture_conventions() {
        let user = User::test_default();
        assert_eq!(user.id, "1");
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.name, "Test User");
    }

    #[test]
    fn default_session_pairs_the_stock_user_with_the_mock_token() {
        let session = AuthSession::test_default();
        assert_eq!(session.user, User::test_default());
        assert_eq!(session.token, MOCK_TOKEN);
    }

    #[test]
    fn user_role_is_omitted_from_the_wire_when_absent() {
        let wire = serde_json::to_value(User::test_default()).unwrap();
        assert_eq!(
            wire,
            json!({ "id": "1", "email": "test@example.com", "name": "Test User" })
        );
    }

    #[test]
    fn handler_success_boundary_is_400() {
        assert!(MockHandler::new(399, json!({})).is_success());
        assert!(!MockHandler::new(400, json!({})).is_success());
        assert!(!MockHandler::new(401, json!({"error": "Invalid credentials"})).is_success());
    }

    #[test]
    fn notification_test_ids() {
        assert_eq!(NotificationKind::Success.test_id(), "notification-success");
        assert_eq!(NotificationKind::Error.test_id(), "notification-error");
    }
}
