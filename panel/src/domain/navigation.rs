//! Routes the shell can show.

use std::fmt;
use std::str::FromStr;

/// Raised when a path names no known route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown route '{path}'; expected '/' or '/users'")]
pub struct UnknownRoute {
    /// Path that failed to match.
    pub path: String,
}

/// The two views reachable by path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    /// `/`: places a token and expiry in the local store.
    #[default]
    Login,
    /// `/users`: the users view.
    Users,
}

impl Route {
    /// URL path of the route.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Users => "/users",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        match path.trim() {
            "/" | "" => Ok(Self::Login),
            "/users" | "/users/" => Ok(Self::Users),
            other => Err(UnknownRoute {
                path: other.to_owned(),
            }),
        }
    }
}
