//! Users admin panel: domain, ports, and adapters.
//!
//! The panel lists, searches, edits, and deletes records held by a remote
//! paginated user directory, behind a client-side session check.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use config::PanelSettings;
