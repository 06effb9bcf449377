//! View-model behind the `/users` route.
//!
//! [`UsersViewModel`] owns the loaded page of records, the search term, the
//! page cursor, the edit buffer, and the latest status message. Operations
//! that talk to the directory are split in two: the issuing method updates
//! local state and hands back a [`Pending`] call, and [`UsersViewModel::apply`]
//! reconciles whatever [`Outcome`] that call resolves to. Outcomes are applied
//! in arrival order; the last one applied wins.

mod outcome;

pub use outcome::{Outcome, Pending, PendingKind};

use std::sync::Arc;

use pagination::PageNumber;
use tracing::{debug, warn};

use crate::domain::ports::{Navigator, SessionStore, UserDirectory};
use crate::domain::status::{
    DELETE_FAILED, DELETE_SUCCEEDED, FETCH_FAILED, UPDATE_FAILED, UPDATE_SUCCEEDED,
};
use crate::domain::{
    EditBuffer, SessionGuard, StatusMessage, UserEdit, UserId, UserRecord, filter_records,
};

/// State and operations of the users view.
pub struct UsersViewModel<D: ?Sized, S: ?Sized, N: ?Sized> {
    directory: Arc<D>,
    guard: SessionGuard<S, N>,
    records: Vec<UserRecord>,
    search_term: String,
    page: PageNumber,
    total_pages: u32,
    loading: bool,
    status: Option<StatusMessage>,
    edit: EditBuffer,
}

impl<D, S, N> UsersViewModel<D, S, N>
where
    D: UserDirectory + ?Sized + 'static,
    S: SessionStore + ?Sized,
    N: Navigator + ?Sized,
{
    /// Create a view-model positioned on the first page.
    pub fn new(directory: Arc<D>, guard: SessionGuard<S, N>) -> Self {
        Self::starting_at(directory, guard, PageNumber::FIRST)
    }

    /// Create a view-model positioned on `page`. Nothing is fetched until
    /// [`Self::enter`] is called.
    pub fn starting_at(directory: Arc<D>, guard: SessionGuard<S, N>, page: PageNumber) -> Self {
        Self {
            directory,
            guard,
            records: Vec::new(),
            search_term: String::new(),
            page,
            total_pages: 0,
            loading: false,
            status: None,
            edit: EditBuffer::Idle,
        }
    }

    /// Check the session and, if it is live, fetch the current page.
    ///
    /// Returns `None` when the session guard redirected to login instead.
    pub fn enter(&mut self) -> Option<Pending> {
        self.guard.enforce().ok()?;
        Some(self.issue_fetch())
    }

    /// Move the cursor to `page`.
    ///
    /// A move re-runs the session check and, if that passes, fetches the new
    /// page. Setting the page the cursor already holds does nothing.
    pub fn set_page(&mut self, page: PageNumber) -> Option<Pending> {
        if page == self.page {
            return None;
        }
        self.page = page;
        self.enter()
    }

    /// Advance one page. The server-reported total is not used as a bound.
    pub fn next_page(&mut self) -> Option<Pending> {
        self.set_page(self.page.next())
    }

    /// Go back one page; does nothing on page 1.
    pub fn previous_page(&mut self) -> Option<Pending> {
        self.set_page(self.page.previous()?)
    }

    /// Replace the search term. Never touches the network.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Active search term.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Every record of the loaded page.
    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    /// Loaded record with `id`, if any.
    pub fn record(&self, id: UserId) -> Option<&UserRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Loaded records that match the search term.
    pub fn projection(&self) -> Vec<&UserRecord> {
        filter_records(&self.records, &self.search_term)
    }

    /// Current page cursor.
    pub const fn page(&self) -> PageNumber {
        self.page
    }

    /// Page count reported by the last successful fetch; zero before then.
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Whether a fetch has been issued and not yet applied.
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Latest status message.
    pub const fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Current edit state.
    pub const fn edit_buffer(&self) -> &EditBuffer {
        &self.edit
    }

    /// Staged edit fields, when an edit is in progress.
    pub fn edit_fields_mut(&mut self) -> Option<&mut UserEdit> {
        self.edit.fields_mut()
    }

    /// Stage `fields` for record `id`.
    ///
    /// The caller's snapshot is trusted as-is and any edit already in progress
    /// is dropped.
    pub fn begin_edit(&mut self, id: UserId, fields: UserEdit) {
        if let Some(discarded) = self.edit.begin(id, fields) {
            debug!(user_id = %discarded, replacement = %id, "discarding staged edit");
        }
    }

    /// Send the staged edit to the directory.
    ///
    /// Returns `None` when nothing is staged. The buffer is cleared when the
    /// outcome is applied, whatever the result.
    pub fn save_edit(&mut self) -> Option<Pending> {
        let EditBuffer::Editing { target, fields } = &self.edit else {
            return None;
        };
        let (id, edit) = (*target, fields.clone());
        debug!(user_id = %id, "issuing user update");
        let directory = Arc::clone(&self.directory);
        Some(Pending::new(PendingKind::Update(id), async move {
            let result = directory.update_user(id, &edit).await;
            Outcome::Updated { id, edit, result }
        }))
    }

    /// Ask the directory to delete record `id`. There is no confirmation step.
    pub fn delete_user(&mut self, id: UserId) -> Pending {
        debug!(user_id = %id, "issuing user delete");
        let directory = Arc::clone(&self.directory);
        Pending::new(PendingKind::Delete(id), async move {
            let result = directory.delete_user(id).await;
            Outcome::Deleted { id, result }
        })
    }

    /// Reconcile local state with a finished call.
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Fetched { page, result } => {
                self.loading = false;
                match result {
                    Ok(envelope) => {
                        debug!(%page, count = envelope.data.len(), "users page loaded");
                        self.records = envelope.data;
                        self.total_pages = envelope.total_pages;
                    }
                    Err(error) => {
                        warn!(%page, %error, "users page fetch failed");
                        self.status = Some(StatusMessage::error(FETCH_FAILED));
                    }
                }
            }
            Outcome::Deleted { id, result } => match result {
                Ok(()) => {
                    self.records.retain(|record| record.id != id);
                    self.status = Some(StatusMessage::success(DELETE_SUCCEEDED));
                }
                Err(error) => {
                    warn!(user_id = %id, %error, "user delete failed");
                    self.status = Some(StatusMessage::error(DELETE_FAILED));
                }
            },
            Outcome::Updated { id, edit, result } => {
                self.edit.clear();
                match result {
                    Ok(()) => {
                        if let Some(record) = self.records.iter_mut().find(|r| r.id == id) {
                            record.merge(&edit);
                        }
                        self.status = Some(StatusMessage::success(UPDATE_SUCCEEDED));
                    }
                    Err(error) => {
                        warn!(user_id = %id, %error, "user update failed");
                        self.status = Some(StatusMessage::error(UPDATE_FAILED));
                    }
                }
            }
        }
    }

    /// Clear the session and return to login.
    pub fn logout(&self) {
        self.guard.logout();
    }

    fn issue_fetch(&mut self) -> Pending {
        let page = self.page;
        debug!(%page, "issuing users page fetch");
        self.loading = true;
        let directory = Arc::clone(&self.directory);
        Pending::new(PendingKind::Fetch(page), async move {
            let result = directory.fetch_page(page).await;
            Outcome::Fetched { page, result }
        })
    }
}
