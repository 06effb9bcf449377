//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **directory**: reqwest-backed client for the remote users API
//! - **session_store**: JSON-file store for the session token and expiry
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod directory;
pub mod session_store;
