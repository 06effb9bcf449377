//! Active-route holder for the shell.

use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::domain::Route;
use crate::domain::ports::Navigator;

/// Tracks which view is active. Domain code moves it through [`Navigator`].
#[derive(Debug, Default)]
pub struct Router {
    current: Mutex<Route>,
}

impl Router {
    /// Start on `route`.
    pub fn new(route: Route) -> Self {
        Self {
            current: Mutex::new(route),
        }
    }

    /// Active route.
    pub fn current(&self) -> Route {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for Router {
    fn navigate(&self, route: Route) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != route {
            debug!(from = %*current, to = %route, "route changed");
        }
        *current = route;
    }
}
