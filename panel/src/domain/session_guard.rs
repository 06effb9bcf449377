//! Session guard: decides whether the users view may load, and owns logout.
//!
//! The guard reads the token and expiry from the [`SessionStore`] each time it
//! is asked, compares the expiry against an injected [`Clock`], and sends the
//! user back to the login route through the [`Navigator`] when the session is
//! missing or stale.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{Navigator, SessionStore, SessionStoreError};
use crate::domain::{
    EpochMillis, Route, Session, SessionError, TOKEN_EXPIRY_KEY, TOKEN_KEY,
};

/// Gatekeeper for views that need a live session.
pub struct SessionGuard<S: ?Sized, N: ?Sized> {
    store: Arc<S>,
    navigator: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<S: ?Sized, N: ?Sized> Clone for SessionGuard<S, N> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            navigator: Arc::clone(&self.navigator),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, N> SessionGuard<S, N>
where
    S: SessionStore + ?Sized,
    N: Navigator + ?Sized,
{
    /// Create a guard over `store`, redirecting through `navigator`.
    pub fn new(store: Arc<S>, navigator: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            navigator,
            clock,
        }
    }

    /// Current time according to the injected clock.
    pub fn now(&self) -> EpochMillis {
        EpochMillis::from_datetime(self.clock.utc())
    }

    /// Read the stored session and validate it against the clock.
    ///
    /// A store that cannot be read counts as holding no session.
    ///
    /// # Errors
    ///
    /// [`SessionError::Missing`] when no token is stored and
    /// [`SessionError::Expired`] when the stored expiry has passed.
    pub fn check(&self) -> Result<Session, SessionError> {
        let token = self.read(TOKEN_KEY);
        let expiry = self.read(TOKEN_EXPIRY_KEY);
        Session::from_stored(token, expiry)?.validate_at(self.now())
    }

    /// Like [`Self::check`], but logs out when the session is not usable.
    ///
    /// # Errors
    ///
    /// Returns the reason the session was rejected after logging out.
    pub fn enforce(&self) -> Result<Session, SessionError> {
        self.check().inspect_err(|error| {
            debug!(%error, "session rejected; returning to login");
            self.logout();
        })
    }

    /// Remove both session keys and navigate to the login route.
    ///
    /// Removal failures are logged; navigation happens regardless. Calling
    /// this repeatedly leaves the same state as calling it once.
    pub fn logout(&self) {
        for key in [TOKEN_KEY, TOKEN_EXPIRY_KEY] {
            if let Err(error) = self.store.remove(key) {
                warn!(%error, key, "failed to clear session key");
            }
        }
        info!("session cleared");
        self.navigator.navigate(Route::Login);
    }

    /// Persist `session` and navigate to the users route.
    ///
    /// A session without an expiry clears any expiry left from an earlier
    /// login.
    ///
    /// # Errors
    ///
    /// Propagates store write failures; nothing is navigated in that case.
    pub fn sign_in(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.store.set(TOKEN_KEY, session.token())?;
        match session.expires_at() {
            Some(expires_at) => self
                .store
                .set(TOKEN_EXPIRY_KEY, &expires_at.to_string())?,
            None => self.store.remove(TOKEN_EXPIRY_KEY)?,
        }
        info!(expires_at = ?session.expires_at().map(EpochMillis::get), "session stored");
        self.navigator.navigate(Route::Users);
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        self.store.get(key).unwrap_or_else(|error| {
            warn!(%error, key, "session store read failed");
            None
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the guard's redirect and logout rules.
    use super::*;
    use crate::domain::ports::{
        InMemorySessionStore, MockNavigator, MockSessionStore, SessionStoreError,
    };
    use chrono::{TimeZone, Utc};
    use mockable::MockClock;
    use rstest::{fixture, rstest};

    const NOW_MS: i64 = 1_700_000_000_000;

    #[fixture]
    fn clock() -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        let now = Utc
            .timestamp_millis_opt(NOW_MS)
            .single()
            .expect("valid fixture timestamp");
        clock.expect_utc().return_const(now);
        Arc::new(clock)
    }

    fn navigator_expecting(route: Route, times: usize) -> Arc<MockNavigator> {
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .withf(move |target| *target == route)
            .times(times)
            .return_const(());
        Arc::new(navigator)
    }

    #[rstest]
    #[case::future_expiry(Some("1700000000001"))]
    #[case::no_expiry(None)]
    #[case::unparseable_expiry(Some("tomorrow"))]
    fn live_sessions_pass_without_navigation(
        clock: Arc<dyn Clock>,
        #[case] expiry: Option<&str>,
    ) {
        let mut entries = vec![(TOKEN_KEY, "abc")];
        entries.extend(expiry.map(|raw| (TOKEN_EXPIRY_KEY, raw)));
        let store = Arc::new(InMemorySessionStore::with_entries(entries));
        let guard = SessionGuard::new(store, navigator_expecting(Route::Login, 0), clock);

        let session = guard.enforce().expect("session is live");
        assert_eq!(session.token(), "abc");
    }

    #[rstest]
    fn expired_sessions_are_cleared(clock: Arc<dyn Clock>) {
        let store = Arc::new(InMemorySessionStore::with_entries([
            (TOKEN_KEY, "abc"),
            (TOKEN_EXPIRY_KEY, "1699999999999"),
        ]));
        let guard = SessionGuard::new(
            Arc::clone(&store),
            navigator_expecting(Route::Login, 1),
            clock,
        );

        let error = guard.enforce().expect_err("expired");

        assert!(matches!(error, SessionError::Expired { .. }));
        assert!(store.snapshot().is_empty());
    }

    #[rstest]
    fn unreadable_store_counts_as_missing(clock: Arc<dyn Clock>) {
        let mut store = MockSessionStore::new();
        store
            .expect_get()
            .returning(|_| Err(SessionStoreError::read("disk gone")));
        let guard = SessionGuard::new(Arc::new(store), navigator_expecting(Route::Login, 0), clock);

        assert_eq!(guard.check().expect_err("missing"), SessionError::Missing);
    }

    #[rstest]
    fn logout_navigates_even_when_removal_fails(clock: Arc<dyn Clock>) {
        let mut store = MockSessionStore::new();
        store
            .expect_remove()
            .times(4)
            .returning(|_| Err(SessionStoreError::write("read-only")));
        let guard = SessionGuard::new(Arc::new(store), navigator_expecting(Route::Login, 2), clock);

        guard.logout();
        guard.logout();
    }

    #[rstest]
    fn sign_in_writes_both_keys(clock: Arc<dyn Clock>) {
        let store = Arc::new(InMemorySessionStore::with_entries([(TOKEN_EXPIRY_KEY, "1")]));
        let guard = SessionGuard::new(
            Arc::clone(&store),
            navigator_expecting(Route::Users, 2),
            clock,
        );

        let expires_at = guard.now().saturating_add_secs(60);
        guard
            .sign_in(&Session::new("tok", Some(expires_at)).expect("session"))
            .expect("sign in");
        assert_eq!(
            store.snapshot().get(TOKEN_EXPIRY_KEY).map(String::as_str),
            Some("1700000060000")
        );

        guard
            .sign_in(&Session::new("tok", None).expect("session"))
            .expect("sign in");
        assert!(!store.snapshot().contains_key(TOKEN_EXPIRY_KEY));
        assert_eq!(guard.check().expect("live").token(), "tok");
    }
}
