//! User directory records.

use std::fmt;
use std::str::FromStr;

/// Validation errors returned by [`UserId`] constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    /// Identifiers are server-assigned positive integers.
    #[error("user id must be a positive integer")]
    Zero,
    /// The input was not an integer at all.
    #[error("user id must be a positive integer, got '{raw}'")]
    NotANumber {
        /// Raw input that failed to parse.
        raw: String,
    },
}

/// Server-assigned numeric user identifier.
///
/// ## Invariants
/// - The wrapped value is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(u64);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub const fn new(raw: u64) -> Result<Self, UserIdError> {
        if raw == 0 {
            return Err(UserIdError::Zero);
        }
        Ok(Self(raw))
    }

    /// Raw numeric identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = UserIdError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim().parse::<u64>().map_err(|_| UserIdError::NotANumber {
            raw: raw.to_owned(),
        })?;
        Self::new(value)
    }
}

/// The three fields an administrator may change on a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserEdit {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address.
    pub email: String,
}

impl UserEdit {
    /// Build an edit from its three fields.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }
}

/// One user's directory entry as returned by the remote API.
///
/// Records are owned by the users view and live only as long as the page they
/// were fetched with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Server-assigned identifier, unique within the directory.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address.
    pub email: String,
    /// Avatar image location.
    pub avatar_url: String,
}

impl UserRecord {
    /// Snapshot of the editable fields, as used to begin an edit.
    pub fn editable_fields(&self) -> UserEdit {
        UserEdit::new(&self.first_name, &self.last_name, &self.email)
    }

    /// Overwrite the editable fields with `edit`, keeping id and avatar.
    pub fn merge(&mut self, edit: &UserEdit) {
        self.first_name.clone_from(&edit.first_name);
        self.last_name.clone_from(&edit.last_name);
        self.email.clone_from(&edit.email);
    }

    /// Full display name, `first last`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
