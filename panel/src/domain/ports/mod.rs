//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod navigator;
mod session_store;
mod user_directory;

#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::Navigator;
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{InMemorySessionStore, SessionStore, SessionStoreError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{
    DirectoryCall, DirectoryOperation, FixtureUserDirectory, UserDirectory, UserDirectoryError,
    UserPage,
};
