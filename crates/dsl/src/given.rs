//! Scenario seeding. These write straight into the context with no
//! backend dispatch, so they are synchronous and cannot fail.

use serde_json::{json, Value};

use understudy_core::context::ContextStore;
use understudy_core::types::{AuthSession, MockHandler, User, MOCK_TOKEN};

/// The `given` half of a scenario.
#[derive(Clone)]
pub struct Given {
    /// Seeds about the user.
    pub user: GivenUser,
    /// Seeds about the mocked API.
    pub api: GivenApi,
}

impl Given {
    pub fn bind(store: &ContextStore) -> Given {
        Given {
            user: GivenUser {
                store: store.clone(),
            },
            api: GivenApi {
                store: store.clone(),
            },
        }
    }
}

#[derive(Clone)]
pub struct GivenUser {
    store: ContextStore,
}

impl GivenUser {
    /// Start the scenario on the login page.
    pub fn is_on_login_page(&self) {
        self.store.current().router().navigate("/login");
    }

    /// Start the scenario on an arbitrary page.
    pub fn is_on_page(&self, path: &str) {
        self.store.current().router().navigate(path);
    }

    /// Seed a signed-in session. `None` signs in the default test identity.
    pub fn is_authenticated(&self, user: Option<User>) {
        let session = AuthSession::new(user.unwrap_or_else(User::test_default), MOCK_TOKEN);
        self.store.current().set_auth(session);
    }
}

#[derive(Clone)]
pub struct GivenApi {
    store: ContextStore,
}

impl GivenApi {
    /// The sign-in endpoint will answer 401 with "Invalid credentials".
    pub fn will_reject_authentication(&self) {
        self.store.current().mocks().register(
            "/auth/login",
            MockHandler::new(401, json!({ "error": "Invalid credentials" })),
        );
    }

    /// `endpoint` will answer 200 with `response`.
    pub fn will_succeed(&self, endpoint: &str, response: Value) {
        self.store
            .current()
            .mocks()
            .register(endpoint, MockHandler::ok(response));
    }

    /// `endpoint` will answer `status`. `None` uses a stock error body.
    pub fn will_fail(&self, endpoint: &str, status: u16, error: Option<Value>) {
        let body = error.unwrap_or_else(|| json!({ "error": "Request failed" }));
        self.store
            .current()
            .mocks()
            .register(endpoint, MockHandler::new(status, body));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use understudy_core::backend::Backend;
    use understudy_core::context::ContextConfig;
    use understudy_core::driver::UiDriver;
    use understudy_driver::{RenderDriver, SimSurface};

    use super::*;

    fn store() -> ContextStore {
        let surface = SimSurface::builder().build();
        let config = ContextConfig::new(Arc::new(move |_| {
            Arc::new(RenderDriver::new(surface.clone())) as Arc<dyn UiDriver>
        }))
        .with_backend(Backend::Render);
        ContextStore::new(config)
    }

    #[test]
    fn login_page_seed_moves_the_router() {
        let store = store();
        let given = Given::bind(&store);
        given.user.is_on_login_page();
        assert_eq!(store.current().pathname(), "/login");
    }

    #[test]
    fn authenticated_seed_defaults_the_identity() {
        let store = store();
        Given::bind(&store).user.is_authenticated(None);

        let session = store.current().auth().unwrap();
        assert_eq!(session.user.email, "test@example.com");
        assert_eq!(session.token, MOCK_TOKEN);
    }

    #[test]
    fn authenticated_seed_keeps_a_custom_identity() {
        let store = store();
        let user = User::new("u-42", "admin@example.com", "Admin");
        Given::bind(&store).user.is_authenticated(Some(user));

        let session = store.current().auth().unwrap();
        assert_eq!(session.user.id, "u-42");
        assert_eq!(session.user.email, "admin@example.com");
    }

    #[test]
    fn rejection_seed_registers_a_401() {
        let store = store();
        Given::bind(&store).api.will_reject_authentication();

        let handler = store.current().mocks().handler_for("/auth/login").unwrap();
        assert_eq!(handler.status, 401);
        assert_eq!(handler.body, json!({ "error": "Invalid credentials" }));
    }

    #[test]
    fn failure_seed_defaults_the_body() {
        let store = store();
        let api = Given::bind(&store).api;
        api.will_fail("/api/projects", 500, None);
        api.will_fail("/api/users", 422, Some(json!({ "error": "Bad email" })));

        let context = store.current();
        let projects = context.mocks().handler_for("/api/projects").unwrap();
        assert_eq!(projects.status, 500);
        assert_eq!(projects.body, json!({ "error": "Request failed" }));
        let users = context.mocks().handler_for("/api/users").unwrap();
        assert_eq!(users.body, json!({ "error": "Bad email" }));
    }

    #[test]
    fn success_seed_registers_a_200() {
        let store = store();
        Given::bind(&store)
            .api
            .will_succeed("/api/projects", json!([{ "id": 1 }]));

        let handler = store.current().mocks().handler_for("/api/projects").unwrap();
        assert_eq!(handler.status, 200);
        assert!(handler.is_success());
    }
}
