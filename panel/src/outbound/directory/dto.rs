//! Wire shapes of the directory API.
//!
//! Responses decode into these DTOs first and are then mapped into domain
//! records in one pass.

use serde::{Deserialize, Serialize};

use crate::domain::{UserEdit, UserId, UserRecord};

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: u64,
    pub(super) first_name: String,
    pub(super) last_name: String,
    pub(super) email: String,
    #[serde(default)]
    pub(super) avatar: String,
}

impl UserDto {
    pub(super) fn into_domain(self) -> Result<UserRecord, String> {
        let id = UserId::new(self.id)
            .map_err(|error| format!("record '{}' has invalid id: {error}", self.email))?;
        Ok(UserRecord {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            avatar_url: self.avatar,
        })
    }
}

/// `PUT users/{id}` body.
#[derive(Debug, Serialize)]
pub(super) struct UserUpdateDto<'a> {
    pub(super) first_name: &'a str,
    pub(super) last_name: &'a str,
    pub(super) email: &'a str,
}

impl<'a> From<&'a UserEdit> for UserUpdateDto<'a> {
    fn from(edit: &'a UserEdit) -> Self {
        Self {
            first_name: &edit.first_name,
            last_name: &edit.last_name,
            email: &edit.email,
        }
    }
}
