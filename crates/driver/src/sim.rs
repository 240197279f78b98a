//! Simulated render surface: route-keyed screens plus declarative flows.
//!
//! A hermetic stand-in for a real component renderer. Screens are node
//! sets keyed by pathname and swapped in whenever the bound router moves.
//! Flows model submit handlers: clicking a flow's trigger consults the
//! scenario's endpoint mocks, then either navigates or raises an alert
//! carrying the response's error text.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use understudy_core::driver::ContextBinding;
use understudy_core::locator::Locator;
use understudy_core::types::MockHandler;

use crate::surface::{RenderSurface, SurfaceNode};

/// Submit behavior wired to a trigger element.
#[derive(Clone)]
pub struct SimFlow {
    /// Element whose click runs this flow.
    pub trigger: Locator,
    /// Endpoint looked up in the scenario's mocks.
    pub endpoint: String,
    /// Where a successful response navigates, if anywhere.
    pub on_success: Option<String>,
}

impl SimFlow {
    pub fn new(trigger: Locator, endpoint: impl Into<String>) -> SimFlow {
        SimFlow {
            trigger,
            endpoint: endpoint.into(),
            on_success: None,
        }
    }

    pub fn then_navigate(mut self, route: impl Into<String>) -> SimFlow {
        self.on_success = Some(route.into());
        self
    }
}

/// In-memory render surface.
pub struct SimSurface {
    state: Mutex<SimState>,
}

struct SimState {
    screens: HashMap<String, Vec<SurfaceNode>>,
    flows: Vec<SimFlow>,
    binding: Option<ContextBinding>,
    // Route used when no binding is attached.
    fallback_route: String,
    loaded_route: Option<String>,
    nodes: Vec<SurfaceNode>,
}

impl SimState {
    /// Reload the node instance when the route moved since the last look.
    fn sync(&mut self) {
        let route = self
            .binding
            .as_ref()
            .map(|binding| binding.router.pathname())
            .unwrap_or_else(|| self.fallback_route.clone());
        if self.loaded_route.as_deref() != Some(route.as_str()) {
            self.nodes = self.screens.get(&route).cloned().unwrap_or_default();
            debug!("sim screen loaded for {}", route);
            self.loaded_route = Some(route);
        }
    }

    fn run_flow(&mut self, flow: &SimFlow) {
        let handler = self
            .binding
            .as_ref()
            .and_then(|binding| binding.mocks.handler_for(&flow.endpoint));
        match handler {
            Some(handler) if !handler.is_success() => {
                let message = error_text(&handler);
                debug!("sim flow {} failed: {}", flow.endpoint, message);
                self.nodes.push(SurfaceNode::alert(message));
            }
            // No handler registered counts as success.
            _ => {
                debug!("sim flow {} succeeded", flow.endpoint);
                if let Some(route) = flow.on_success.clone() {
                    self.navigate(&route);
                }
            }
        }
    }

    fn navigate(&mut self, route: &str) {
        match &self.binding {
            Some(binding) => binding.router.navigate(route),
            None => self.fallback_route = route.to_string(),
        }
        // Loads the destination screen, dropping transient nodes.
        self.sync();
    }
}

impl SimSurface {
    pub fn builder() -> SimSurfaceBuilder {
        SimSurfaceBuilder {
            screens: HashMap::new(),
            flows: Vec::new(),
        }
    }
}

impl RenderSurface for SimSurface {
    fn attach(&self, binding: ContextBinding) {
        let mut state = self.state.lock();
        state.binding = Some(binding);
        state.loaded_route = None;
    }

    fn query(&self, target: &Locator) -> Option<SurfaceNode> {
        let mut state = self.state.lock();
        state.sync();
        state.nodes.iter().find(|node| node.matches(target)).cloned()
    }

    fn fill(&self, target: &Locator, value: &str) -> bool {
        let mut state = self.state.lock();
        state.sync();
        match state.nodes.iter_mut().find(|node| node.matches(target)) {
            Some(node) => {
                node.value = value.to_string();
                true
            }
            None => false,
        }
    }

    fn click(&self, target: &Locator) -> bool {
        let mut state = self.state.lock();
        state.sync();
        let Some(clicked) = state.nodes.iter().find(|node| node.matches(target)).cloned() else {
            return false;
        };
        let triggered: Vec<SimFlow> = state
            .flows
            .iter()
            .filter(|flow| clicked.matches(&flow.trigger))
            .cloned()
            .collect();
        for flow in &triggered {
            state.run_flow(flow);
        }
        true
    }
}

/// Builder for a [`SimSurface`].
pub struct SimSurfaceBuilder {
    screens: HashMap<String, Vec<SurfaceNode>>,
    flows: Vec<SimFlow>,
}

impl SimSurfaceBuilder {
    /// Nodes shown while the router is at `route`.
    pub fn screen(mut self, route: impl Into<String>, nodes: Vec<SurfaceNode>) -> SimSurfaceBuilder {
        self.screens.insert(route.into(), nodes);
        self
    }

    pub fn flow(mut self, flow: SimFlow) -> SimSurfaceBuilder {
        self.flows.push(flow);
        self
    }

    pub fn build(self) -> Arc<SimSurface> {
        Arc::new(SimSurface {
            state: Mutex::new(SimState {
                screens: self.screens,
                flows: self.flows,
                binding: None,
                fallback_route: "/".to_string(),
                loaded_route: None,
                nodes: Vec::new(),
            }),
        })
    }
}

fn error_text(handler: &MockHandler) -> String {
    handler
        .body
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {}", handler.status))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use understudy_core::locator::TextMatch;
    use understudy_core::mocks::MockApi;
    use understudy_core::router::Router;

    use super::*;

    fn login_surface() -> Arc<SimSurface> {
        SimSurface::builder()
            .screen(
                "/login",
                vec![
                    SurfaceNode::input("Email"),
                    SurfaceNode::input("Password"),
                    SurfaceNode::button("Sign in"),
                ],
            )
            .screen("/dashboard", vec![SurfaceNode::heading("Dashboard")])
            .flow(
                SimFlow::new(
                    Locator::role_named("button", TextMatch::contains("sign in")),
                    "/auth/login",
                )
                .then_navigate("/dashboard"),
            )
            .build()
    }

    fn bound(surface: &Arc<SimSurface>) -> ContextBinding {
        let binding = ContextBinding {
            router: Router::new(),
            mocks: MockApi::new(),
        };
        surface.attach(binding.clone());
        binding
    }

    #[test]
    fn screens_follow_the_bound_router() {
        let surface = login_surface();
        let binding = bound(&surface);

        assert!(surface.query(&Locator::role("button")).is_none());

        binding.router.navigate("/login");
        assert!(surface.query(&Locator::role("button")).is_some());
    }

    #[test]
    fn fill_records_the_value() {
        let surface = login_surface();
        let binding = bound(&surface);
        binding.router.navigate("/login");

        let target = Locator::label(TextMatch::contains("email"));
        assert!(surface.fill(&target, "test@example.com"));
        let node = surface.query(&target).map(|n| n.value);
        assert_eq!(node.as_deref(), Some("test@example.com"));
    }

    #[test]
    fn fill_misses_when_no_control_matches() {
        let surface = login_surface();
        let binding = bound(&surface);
        binding.router.navigate("/login");
        assert!(!surface.fill(&Locator::label(TextMatch::contains("username")), "x"));
    }

    #[test]
    fn successful_flow_navigates_and_swaps_the_screen() {
        let surface = login_surface();
        let binding = bound(&surface);
        binding.router.navigate("/login");

        assert!(surface.click(&Locator::role("button")));
        assert_eq!(binding.router.pathname(), "/dashboard");
        assert!(surface
            .query(&Locator::role_named("heading", TextMatch::contains("dashboard")))
            .is_some());
    }

    #[test]
    fn unregistered_endpoint_counts_as_success() {
        let surface = login_surface();
        let binding = bound(&surface);
        binding.router.navigate("/login");

        surface.click(&Locator::role("button"));
        assert_eq!(binding.router.pathname(), "/dashboard");
        assert!(surface.query(&Locator::role("alert")).is_none());
    }

    #[test]
    fn rejecting_handler_raises_an_alert_and_stays_put() {
        let surface = login_surface();
        let binding = bound(&surface);
        binding.mocks.register(
            "/auth/login",
            MockHandler::new(401, json!({ "error": "Invalid credentials" })),
        );
        binding.router.navigate("/login");

        surface.click(&Locator::role("button"));
        assert_eq!(binding.router.pathname(), "/login");
        let alert = surface.query(&Locator::role("alert")).map(|n| n.text);
        assert_eq!(alert.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn alert_is_transient_across_navigation() {
        let surface = login_surface();
        let binding = bound(&surface);
        binding.mocks.register(
            "/auth/login",
            MockHandler::new(401, json!({ "error": "Invalid credentials" })),
        );
        binding.router.navigate("/login");
        surface.click(&Locator::role("button"));
        assert!(surface.query(&Locator::role("alert")).is_some());

        binding.router.navigate("/dashboard");
        assert!(surface.query(&Locator::role("alert")).is_none());
    }

    #[test]
    fn error_body_without_error_field_reports_the_status() {
        let handler = MockHandler::new(503, json!({ "detail": "down" }));
        assert_eq!(error_text(&handler), "Request failed with status 503");
    }

    #[test]
    fn click_misses_on_the_wrong_screen() {
        let surface = login_surface();
        let _binding = bound(&surface);
        assert!(!surface.click(&Locator::role("button")));
    }
}
