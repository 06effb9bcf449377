//! Driven port for the remote user directory.
//!
//! The directory pages users by one-based page number and accepts updates and
//! deletes by numeric id. Every call is a single attempt; callers decide how a
//! failure is surfaced.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::{PageNumber, Paginated};

use super::define_port_error;
use crate::domain::{UserEdit, UserId, UserRecord};

/// One page of directory records.
pub type UserPage = Paginated<UserRecord>;

define_port_error! {
    /// Errors surfaced while calling the user directory.
    pub enum UserDirectoryError {
        /// The request never produced a response.
        Transport { message: String } =>
            "user directory transport failed: {message}",
        /// The request exceeded its timeout.
        Timeout { message: String } =>
            "user directory request timed out: {message}",
        /// The directory answered with a non-success status.
        Status { status: u16, message: String } =>
            "user directory returned status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "user directory response decode failed: {message}",
        /// The adapter refused to build the request.
        InvalidRequest { message: String } =>
            "user directory request invalid: {message}",
    }
}

/// Port for reading and mutating directory records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch one page of records together with the total page count.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use pagination::PageNumber;
    /// use panel::domain::ports::{FixtureUserDirectory, UserDirectory};
    ///
    /// let directory = FixtureUserDirectory::default();
    /// let page = directory.fetch_page(PageNumber::FIRST).await?;
    /// assert!(page.data.is_empty());
    /// # Ok::<(), panel::domain::ports::UserDirectoryError>(())
    /// ```
    async fn fetch_page(&self, page: PageNumber) -> Result<UserPage, UserDirectoryError>;

    /// Replace the editable fields of record `id`.
    async fn update_user(&self, id: UserId, edit: &UserEdit) -> Result<(), UserDirectoryError>;

    /// Remove record `id`.
    async fn delete_user(&self, id: UserId) -> Result<(), UserDirectoryError>;
}

/// Which directory call an entry in [`FixtureUserDirectory::calls`] was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DirectoryOperation {
    /// `fetch_page`.
    Fetch,
    /// `update_user`.
    Update,
    /// `delete_user`.
    Delete,
}

/// A call received by [`FixtureUserDirectory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryCall {
    /// `fetch_page(page)`.
    Fetch(PageNumber),
    /// `update_user(id, edit)`.
    Update(UserId, UserEdit),
    /// `delete_user(id)`.
    Delete(UserId),
}

#[derive(Debug, Default)]
struct FixtureState {
    records: Vec<UserRecord>,
    failing: BTreeSet<DirectoryOperation>,
    calls: Vec<DirectoryCall>,
}

/// In-memory directory used by behaviour tests and local demos.
///
/// Pages are cut from the seeded records in order. Like the public demo API it
/// stands in for, updates and deletes of unknown ids still succeed. Individual
/// operations can be switched to fail with a 500 status.
#[derive(Debug)]
pub struct FixtureUserDirectory {
    per_page: usize,
    state: Mutex<FixtureState>,
}

impl Default for FixtureUserDirectory {
    fn default() -> Self {
        Self::new(Vec::new(), 6)
    }
}

impl FixtureUserDirectory {
    /// Seed the directory with `records`, served `per_page` at a time.
    pub fn new(records: Vec<UserRecord>, per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
            state: Mutex::new(FixtureState {
                records,
                ..FixtureState::default()
            }),
        }
    }

    /// Make every later call of `operation` fail.
    pub fn fail(&self, operation: DirectoryOperation) {
        self.lock().failing.insert(operation);
    }

    /// Undo [`Self::fail`] for `operation`.
    pub fn recover(&self, operation: DirectoryOperation) {
        self.lock().failing.remove(&operation);
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<DirectoryCall> {
        self.lock().calls.clone()
    }

    /// Current server-side records.
    pub fn records(&self) -> Vec<UserRecord> {
        self.lock().records.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FixtureState> {
        // The state holds plain data, so a panic elsewhere cannot leave it
        // half-updated.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record_call(
        state: &mut FixtureState,
        operation: DirectoryOperation,
        call: DirectoryCall,
    ) -> Result<(), UserDirectoryError> {
        state.calls.push(call);
        if state.failing.contains(&operation) {
            return Err(UserDirectoryError::status(500_u16, "fixture failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn fetch_page(&self, page: PageNumber) -> Result<UserPage, UserDirectoryError> {
        let mut state = self.lock();
        Self::record_call(
            &mut state,
            DirectoryOperation::Fetch,
            DirectoryCall::Fetch(page),
        )?;

        let total_pages = state.records.len().div_ceil(self.per_page).max(1);
        let skip = (page.get() as usize - 1).saturating_mul(self.per_page);
        let data = state
            .records
            .iter()
            .skip(skip)
            .take(self.per_page)
            .cloned()
            .collect();

        let mut envelope = Paginated::new(data, u32::try_from(total_pages).unwrap_or(u32::MAX));
        envelope.page = Some(page.get());
        envelope.per_page = u32::try_from(self.per_page).ok();
        envelope.total = u64::try_from(state.records.len()).ok();
        Ok(envelope)
    }

    async fn update_user(&self, id: UserId, edit: &UserEdit) -> Result<(), UserDirectoryError> {
        let mut state = self.lock();
        Self::record_call(
            &mut state,
            DirectoryOperation::Update,
            DirectoryCall::Update(id, edit.clone()),
        )?;
        if let Some(record) = state.records.iter_mut().find(|record| record.id == id) {
            record.merge(edit);
        }
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), UserDirectoryError> {
        let mut state = self.lock();
        Self::record_call(
            &mut state,
            DirectoryOperation::Delete,
            DirectoryCall::Delete(id),
        )?;
        state.records.retain(|record| record.id != id);
        Ok(())
    }
}
