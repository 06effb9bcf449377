//! Unit tests for the layering rules.

use rstest::rstest;

use super::*;

fn lint_one(file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
    lint_sources(&[LintSource::new(file, contents)])
}

fn messages(result: Result<(), ArchitectureLintError>) -> Vec<String> {
    match result {
        Ok(()) => Vec::new(),
        Err(ArchitectureLintError::Violations(found)) => {
            found.into_iter().map(|violation| violation.message).collect()
        }
        Err(other) => panic!("expected violations, got {other:?}"),
    }
}

#[rstest]
#[case::shell_uses_ports(
    "inbound/shell/mod.rs",
    "use crate::domain::ports::UserDirectory; fn run<D: UserDirectory>() {}",
    true
)]
#[case::shell_uses_http_adapter(
    "inbound/shell/mod.rs",
    "use crate::outbound::directory::HttpUserDirectory; fn run() { let _ = HttpUserDirectory::new; }",
    false
)]
#[case::shell_uses_adapter_by_crate_name(
    "inbound/shell/mod.rs",
    "use panel::outbound::session_store::FileSessionStore; fn run() {}",
    false
)]
#[case::shell_reads_settings(
    "inbound/shell/command.rs",
    "fn ttl() -> u64 { crate::config::PanelSettings::default().session_ttl_secs() }",
    false
)]
#[case::shell_uses_reqwest(
    "inbound/shell/mod.rs",
    "fn run() { let _ = reqwest::Client::new(); }",
    false
)]
#[case::shell_uses_clap_and_tokio(
    "inbound/shell/command.rs",
    "use clap::Parser; async fn run() { tokio::task::yield_now().await; }",
    true
)]
#[case::view_uses_reqwest(
    "domain/users_view/mod.rs",
    "use reqwest::Client; struct View { client: Client }",
    false
)]
#[case::view_uses_router(
    "domain/users_view/mod.rs",
    "use super::super::inbound::shell::Router; fn enter() {}",
    false
)]
#[case::domain_tests_use_tokio_attribute(
    "domain/users_view/tests.rs",
    "use super::*; #[tokio::test] async fn loads() {}",
    true
)]
#[case::store_uses_shell(
    "outbound/session_store/file_store.rs",
    "use crate::inbound::shell::LOGIN_PROMPT; fn open() {}",
    false
)]
#[case::store_uses_cap_std(
    "outbound/session_store/file_store.rs",
    "use cap_std::fs::Dir; fn open(_dir: Dir) {}",
    true
)]
#[case::directory_uses_clap(
    "outbound/directory/http_directory.rs",
    "fn args() { let _ = clap::Command::new(\"panel\"); }",
    false
)]
fn enforces_layer_boundaries(#[case] file: &str, #[case] contents: &str, #[case] ok: bool) {
    let result = lint_one(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
fn reports_each_rule_once_per_file() {
    let result = lint_one(
        "domain/session_guard.rs",
        "use reqwest::Client; use reqwest::Url; fn a(_: Client, _: Url) { let _ = reqwest::get; }",
    );
    assert_eq!(
        messages(result),
        vec!["domain code must not use external crate `reqwest`".to_owned()]
    );
}

#[rstest]
fn rejects_files_outside_the_layers() {
    let result = lint_one("main.rs", "fn main() {}");
    assert!(matches!(result, Err(ArchitectureLintError::Path { .. })));
}

#[rstest]
fn reports_unparseable_sources() {
    let result = lint_one("domain/user.rs", "pub struct {");
    assert!(matches!(result, Err(ArchitectureLintError::Parse { .. })));
}

#[rstest]
fn reads_layer_directories_from_disk() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 temp path");
    let dir = Dir::open_ambient_dir(&root, ambient_authority()).expect("open temp dir");
    dir.create_dir_all("src/inbound/shell")
        .expect("create shell dir");
    dir.write("src/main.rs", "use panel::outbound::x;")
        .expect("write main");
    dir.write(
        "src/inbound/shell/mod.rs",
        "use crate::outbound::directory::HttpUserDirectory;",
    )
    .expect("write shell");
    dir.write("src/inbound/shell/notes.txt", "use crate::outbound;")
        .expect("write notes");

    let found = match lint_panel_sources(&root) {
        Err(ArchitectureLintError::Violations(found)) => found,
        other => panic!("expected violations, got {other:?}"),
    };
    assert_eq!(found.len(), 1, "{found:?}");
    assert_eq!(found[0].file, Utf8PathBuf::from("inbound/shell/mod.rs"));
}
