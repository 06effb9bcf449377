//! Inbound adapters that translate user input into view-model calls while
//! keeping terminal details at the edge.
//!
//! The line shell lives under [`shell`].

pub mod shell;
