//! Runs the layering lint over `panel/` in the enclosing workspace.

use std::fmt;
use std::io::{self, Write};
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;

fn main() -> ExitCode {
    let Some(root) = workspace_root() else {
        report(&"no Cargo.toml declaring [workspace] above the current directory");
        return ExitCode::FAILURE;
    };
    match architecture_lint::lint_panel_sources(&root.join("panel")) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err.to_string().trim_end());
            ExitCode::FAILURE
        }
    }
}

fn report(message: &dyn fmt::Display) {
    drop(writeln!(io::stderr().lock(), "{message}"));
}

fn workspace_root() -> Option<Utf8PathBuf> {
    let candidates = [
        std::env::var("CARGO_WORKSPACE_DIR").ok().map(Utf8PathBuf::from),
        std::env::current_dir()
            .ok()
            .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok()),
        Some(Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    ];
    candidates
        .iter()
        .flatten()
        .find_map(|start| declaring_ancestor(start))
}

fn declaring_ancestor(start: &Utf8Path) -> Option<Utf8PathBuf> {
    start
        .ancestors()
        .find(|dir| declares_workspace(dir))
        .map(Utf8Path::to_path_buf)
}

fn declares_workspace(dir: &Utf8Path) -> bool {
    Dir::open_ambient_dir(dir, ambient_authority())
        .and_then(|dir| dir.read_to_string("Cargo.toml"))
        .is_ok_and(|manifest| manifest.contains("[workspace]"))
}
