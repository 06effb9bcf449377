//! Issued directory calls and the results they resolve to.

use std::fmt;
use std::future::IntoFuture;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use pagination::PageNumber;

use crate::domain::ports::{UserDirectoryError, UserPage};
use crate::domain::{UserEdit, UserId};

/// Result of one directory call, ready to be applied to the view-model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A page fetch finished.
    Fetched {
        /// Page that was requested.
        page: PageNumber,
        /// Directory response.
        result: Result<UserPage, UserDirectoryError>,
    },
    /// A delete finished.
    Deleted {
        /// Record that was deleted.
        id: UserId,
        /// Directory response.
        result: Result<(), UserDirectoryError>,
    },
    /// An update finished.
    Updated {
        /// Record that was updated.
        id: UserId,
        /// Fields that were sent.
        edit: UserEdit,
        /// Directory response.
        result: Result<(), UserDirectoryError>,
    },
}

/// What an in-flight call is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    /// `GET users?page=n`.
    Fetch(PageNumber),
    /// `DELETE users/{id}`.
    Delete(UserId),
    /// `PUT users/{id}`.
    Update(UserId),
}

impl fmt::Display for PendingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(page) => write!(f, "fetch page {page}"),
            Self::Delete(id) => write!(f, "delete user {id}"),
            Self::Update(id) => write!(f, "update user {id}"),
        }
    }
}

/// A directory call that has been issued but not yet awaited.
///
/// The future owns its port handles, so the view-model stays free to accept
/// further commands while the call is in flight. Await it and pass the
/// [`Outcome`] to [`super::UsersViewModel::apply`].
#[must_use = "an issued call does nothing until it is awaited"]
pub struct Pending {
    kind: PendingKind,
    future: BoxFuture<'static, Outcome>,
}

impl Pending {
    pub(super) fn new<F>(kind: PendingKind, future: F) -> Self
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        Self {
            kind,
            future: future.boxed(),
        }
    }

    /// Which call this is.
    pub const fn kind(&self) -> PendingKind {
        self.kind
    }
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending").field("kind", &self.kind).finish_non_exhaustive()
    }
}

impl IntoFuture for Pending {
    type Output = Outcome;
    type IntoFuture = BoxFuture<'static, Outcome>;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}
