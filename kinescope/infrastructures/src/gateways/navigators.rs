use ::async_trait::async_trait;
use ::domain::Route;
use ::use_cases::gateways::Navigator;

use crate::utils::aliases::Fallible;

/// Route cell plus a visit log; the app shell owns real routing.
pub struct InMemoryNavigator {
    state: ::std::sync::Mutex<NavigatorState>,
}

struct NavigatorState {
    current: Route,
    visited: Vec<Route>,
}

impl InMemoryNavigator {
    pub fn starting_at(route: Route) -> Self {
        Self { state: ::std::sync::Mutex::new(NavigatorState { current: route, visited: Vec::new() }) }
    }

    pub fn visited(&self) -> Vec<Route> {
        self.state.lock().unwrap().visited.clone()
    }
}

#[async_trait]
impl Navigator for InMemoryNavigator {
    async fn current_route(&self) -> Route {
        self.state.lock().unwrap().current.clone()
    }

    async fn navigate(&self, route: Route) -> Fallible<()> {
        let mut state = self.state.lock().unwrap();
        state.current = route.clone();
        state.visited.push(route);
        Ok(())
    }
}
