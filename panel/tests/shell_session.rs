//! End-to-end tests for the line shell over in-memory adapters.

use std::sync::Arc;

use pagination::PageNumber;
use panel::domain::ports::{DirectoryCall, FixtureUserDirectory, InMemorySessionStore};
use panel::domain::{Route, TOKEN_EXPIRY_KEY, TOKEN_KEY, UserId};
use panel::inbound::shell::{LOGIN_PROMPT, Shell, ShellOptions};
use rstest::rstest;

mod support;

use support::{MutableClock, START_MS, seeded_records};

struct Harness {
    directory: Arc<FixtureUserDirectory>,
    store: Arc<InMemorySessionStore>,
}

impl Harness {
    fn new(store: InMemorySessionStore) -> Self {
        Self {
            directory: Arc::new(FixtureUserDirectory::new(seeded_records(), 6)),
            store: Arc::new(store),
        }
    }

    async fn run(&self, start_route: Route, script: &str) -> String {
        let shell = Shell::new(
            Arc::clone(&self.directory),
            Arc::clone(&self.store),
            Arc::new(MutableClock::default()),
            ShellOptions {
                start_route,
                start_page: PageNumber::FIRST,
                session_ttl_secs: 3_600,
            },
        );
        let mut out = Vec::new();
        shell
            .run(script.as_bytes(), &mut out)
            .await
            .expect("shell should run");
        String::from_utf8(out).expect("transcript is UTF-8")
    }
}

#[rstest]
#[tokio::test]
async fn login_then_delete_reaches_the_directory() {
    let harness = Harness::new(InMemorySessionStore::default());

    let transcript = harness
        .run(Route::Users, "login QpwL5tke4Pnpja7X4 --ttl 60\ndelete 4\n")
        .await;

    assert!(transcript.starts_with(LOGIN_PROMPT), "{transcript}");
    assert!(transcript.contains("Loading page 1..."), "{transcript}");
    assert!(
        transcript.contains("[success] User deleted successfully!"),
        "{transcript}"
    );

    let calls = harness.directory.calls();
    assert!(calls.contains(&DirectoryCall::Fetch(PageNumber::FIRST)));
    assert!(calls.contains(&DirectoryCall::Delete(UserId::new(4).expect("id"))));

    let stored = harness.store.snapshot();
    assert_eq!(stored.get(TOKEN_KEY).map(String::as_str), Some("QpwL5tke4Pnpja7X4"));
    let expected_expiry = (START_MS + 60_000).to_string();
    assert_eq!(
        stored.get(TOKEN_EXPIRY_KEY).map(String::as_str),
        Some(expected_expiry.as_str())
    );
}

#[rstest]
#[tokio::test]
async fn expired_sessions_land_on_login_without_fetching() {
    let harness = Harness::new(InMemorySessionStore::with_entries([
        (TOKEN_KEY, "abc"),
        (TOKEN_EXPIRY_KEY, "1"),
    ]));

    let transcript = harness.run(Route::Users, "").await;

    assert_eq!(transcript.trim_end(), LOGIN_PROMPT);
    assert!(harness.directory.calls().is_empty());
    assert!(harness.store.snapshot().is_empty());
}

#[rstest]
#[tokio::test]
async fn commands_are_checked_against_the_active_route() {
    let harness = Harness::new(InMemorySessionStore::default());

    let transcript = harness
        .run(Route::Login, "next\nfrobnicate\n\nquit\nlogin abc\n")
        .await;

    assert!(transcript.contains("`next` is not available on /"), "{transcript}");
    assert!(transcript.contains("frobnicate"), "{transcript}");
    assert!(
        harness.store.snapshot().is_empty(),
        "lines after quit are not read"
    );
    assert!(harness.directory.calls().is_empty());
}

#[rstest]
#[tokio::test]
async fn logout_returns_to_login() {
    let harness = Harness::new(InMemorySessionStore::with_entries([(TOKEN_KEY, "abc")]));

    let transcript = harness.run(Route::Users, "logout\n").await;

    assert!(transcript.contains(LOGIN_PROMPT), "{transcript}");
    assert!(harness.store.snapshot().is_empty());
}
