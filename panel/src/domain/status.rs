//! Transient outcome banner shown after each network attempt.

use std::fmt;

/// Shown after a page fetch fails.
pub const FETCH_FAILED: &str = "Failed to fetch users!";
/// Shown after a delete succeeds.
pub const DELETE_SUCCEEDED: &str = "User deleted successfully!";
/// Shown after a delete fails.
pub const DELETE_FAILED: &str = "Failed to delete user!";
/// Shown after an update succeeds.
pub const UPDATE_SUCCEEDED: &str = "User updated successfully!";
/// Shown after an update fails.
pub const UPDATE_FAILED: &str = "Error updating user!";

/// Whether the last operation succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// The operation completed.
    Success,
    /// The operation failed; no detail is carried.
    Error,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Latest outcome message. Each new message replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    kind: StatusKind,
    text: &'static str,
}

impl StatusMessage {
    /// A success banner.
    pub const fn success(text: &'static str) -> Self {
        Self {
            kind: StatusKind::Success,
            text,
        }
    }

    /// An error banner.
    pub const fn error(text: &'static str) -> Self {
        Self {
            kind: StatusKind::Error,
            text,
        }
    }

    /// Outcome category.
    pub const fn kind(&self) -> StatusKind {
        self.kind
    }

    /// Human-readable text.
    pub const fn text(&self) -> &'static str {
        self.text
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.text)
    }
}
