//! Line commands accepted by the shell.
//!
//! Each input line is parsed as a clap multicall invocation, so the first
//! word selects the subcommand and `help` works without extra wiring.

use clap::{Parser, Subcommand, ValueEnum};
use pagination::PageNumber;

use crate::domain::{Route, UserEdit, UserId};

/// One parsed input line.
#[derive(Debug, Parser)]
#[command(multicall = true)]
pub struct ShellLine {
    /// Command to run.
    #[command(subcommand)]
    pub command: ShellCommand,
}

impl ShellLine {
    /// Parse `line` split on whitespace.
    ///
    /// # Errors
    ///
    /// Returns the clap error for unknown commands and bad arguments,
    /// including `help` output.
    pub fn parse_line(line: &str) -> Result<Self, clap::Error> {
        Self::try_parse_from(line.split_whitespace())
    }
}

/// Commands understood by the shell.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ShellCommand {
    /// Print the current page, filter, and edit in progress.
    Show,
    /// Load the next page.
    Next,
    /// Load the previous page.
    Prev,
    /// Load page `number`.
    Page {
        /// One-based page number.
        number: PageNumber,
    },
    /// Filter the loaded page; no term clears the filter.
    Search {
        /// Words to search for, joined by single spaces.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        term: Vec<String>,
    },
    /// Start editing a user from the loaded page.
    Edit {
        /// User id.
        id: UserId,
    },
    /// Change one field of the edit in progress.
    Set {
        /// Field to change.
        field: EditField,
        /// New value, joined by single spaces.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Send the edit in progress.
    Save,
    /// Delete a user.
    Delete {
        /// User id.
        id: UserId,
    },
    /// Clear the session and return to login.
    Logout,
    /// Store a pre-issued session token.
    Login {
        /// Opaque token.
        token: String,
        /// Session lifetime in seconds.
        #[arg(long, value_name = "secs")]
        ttl: Option<u64>,
    },
    /// Leave the shell.
    Quit,
}

impl ShellCommand {
    /// Whether the command makes sense while `route` is active.
    pub const fn available_on(&self, route: Route) -> bool {
        match self {
            Self::Quit => true,
            Self::Login { .. } => matches!(route, Route::Login),
            _ => matches!(route, Route::Users),
        }
    }
}

/// Editable field named by `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EditField {
    /// First name.
    First,
    /// Last name.
    Last,
    /// Email address.
    Email,
}

impl EditField {
    /// Overwrite this field of `edit`.
    pub fn assign(self, edit: &mut UserEdit, value: String) {
        match self {
            Self::First => edit.first_name = value,
            Self::Last => edit.last_name = value,
            Self::Email => edit.email = value,
        }
    }
}
