//! Single-slot staging area for an in-progress edit.

use crate::domain::{UserEdit, UserId};

/// Edit state: `Idle -> Editing(target) -> Idle`.
///
/// Only one record can be edited at a time. Beginning a new edit replaces
/// whatever was staged without asking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditBuffer {
    /// Nothing is being edited.
    #[default]
    Idle,
    /// `fields` are staged for the record `target`.
    Editing {
        /// Record being edited.
        target: UserId,
        /// Staged values.
        fields: UserEdit,
    },
}

impl EditBuffer {
    /// Stage `fields` for `target`, returning the target of any edit that
    /// was discarded to make room.
    pub fn begin(&mut self, target: UserId, fields: UserEdit) -> Option<UserId> {
        let discarded = self.target();
        *self = Self::Editing { target, fields };
        discarded
    }

    /// Return to idle.
    pub fn clear(&mut self) {
        *self = Self::Idle;
    }

    /// Whether an edit is staged.
    pub const fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    /// Record being edited.
    pub const fn target(&self) -> Option<UserId> {
        match self {
            Self::Idle => None,
            Self::Editing { target, .. } => Some(*target),
        }
    }

    /// Staged values.
    pub const fn fields(&self) -> Option<&UserEdit> {
        match self {
            Self::Idle => None,
            Self::Editing { fields, .. } => Some(fields),
        }
    }

    /// Staged values, for in-place changes before saving.
    pub fn fields_mut(&mut self) -> Option<&mut UserEdit> {
        match self {
            Self::Idle => None,
            Self::Editing { fields, .. } => Some(fields),
        }
    }
}
