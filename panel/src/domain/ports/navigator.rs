//! Driven port for switching the active view.

use crate::domain::Route;

/// Requests a route change in whatever drives the views.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Make `route` the active route.
    fn navigate(&self, route: Route);
}
