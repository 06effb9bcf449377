//! Domain primitives, ports, and the users view-model.
//!
//! Purpose: hold every rule of the panel that does not depend on how the
//! directory is reached or how the session is persisted. Adapters live in
//! `outbound`, the terminal shell in `inbound`.
//!
//! Public surface:
//! - `UserRecord`, `UserId`, `UserEdit`: directory entries and their editable
//!   fields.
//! - `Session`, `EpochMillis`, `SessionError`: stored session and its expiry.
//! - `SessionGuard`: redirect-to-login and logout rules.
//! - `UsersViewModel`: list, paginate, search, edit, delete.

pub mod edit;
pub mod filter;
pub mod navigation;
pub mod ports;
pub mod session;
pub mod session_guard;
pub mod status;
pub mod user;
pub mod users_view;

pub use self::edit::EditBuffer;
pub use self::filter::filter_records;
pub use self::navigation::{Route, UnknownRoute};
pub use self::session::{EpochMillis, Session, SessionError, TOKEN_EXPIRY_KEY, TOKEN_KEY};
pub use self::session_guard::SessionGuard;
pub use self::status::{StatusKind, StatusMessage};
pub use self::user::{UserEdit, UserId, UserIdError, UserRecord};
pub use self::users_view::{Outcome, Pending, PendingKind, UsersViewModel};
