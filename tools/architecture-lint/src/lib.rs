//! Workspace-local lint that keeps the panel's layers apart.
//!
//! The panel crate is split into `domain` (state, rules, and the ports it
//! talks through), `inbound` (the line shell that drives it) and `outbound`
//! (the HTTP directory and the on-disk session store). The lint parses every
//! source file under those three directories and rejects:
//!
//! - `domain` code naming an adapter module, the settings module, or a crate
//!   that only an adapter or the binary should touch
//! - `inbound` code naming `outbound` modules or their transport crates
//! - `outbound` code naming `inbound` modules or terminal-facing crates
//!
//! Run it with `cargo run -p architecture-lint` from anywhere in the
//! workspace.

use std::collections::BTreeSet;
use std::fmt;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use syn::visit::Visit;

const CRATE_NAME: &str = "panel";

/// One rule broken by one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path relative to `panel/src`.
    pub file: Utf8PathBuf,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Why a lint run did not pass.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// The source tree could not be walked or read.
    Io(io::Error),
    /// A path was not valid UTF-8 or did not sit under a layer directory.
    Path { file: String, message: String },
    /// A file did not parse as Rust.
    Parse { file: Utf8PathBuf, message: String },
    /// At least one file broke a layering rule.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "could not read panel sources: {err}"),
            Self::Path { file, message } => write!(f, "unusable source path {file}: {message}"),
            Self::Parse { file, message } => write!(f, "could not parse {file}: {message}"),
            Self::Violations(violations) => {
                writeln!(f, "{} layering violation(s) in panel/src:", violations.len())?;
                violations
                    .iter()
                    .try_for_each(|violation| writeln!(f, "  {violation}"))
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// A Rust file handed to [`lint_sources`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `panel/src`; its first component names the layer.
    pub file: Utf8PathBuf,
    pub contents: String,
}

impl LintSource {
    pub fn new(file: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            contents: contents.into(),
        }
    }
}

/// Lint the panel crate found at `panel_dir` (the directory holding its
/// `Cargo.toml`).
///
/// # Errors
///
/// Returns [`ArchitectureLintError::Violations`] when any rule is broken, or
/// another variant when the tree cannot be read or parsed.
pub fn lint_panel_sources(panel_dir: &Utf8Path) -> Result<(), ArchitectureLintError> {
    let src = Dir::open_ambient_dir(panel_dir.join("src"), ambient_authority())?;
    let mut sources = Vec::new();
    for layer in Layer::ALL {
        let Ok(dir) = src.open_dir(layer.dir_name()) else {
            continue;
        };
        collect(&dir, Utf8PathBuf::from(layer.dir_name()), &mut sources)?;
    }
    lint_sources(&sources)
}

/// Lint in-memory sources.
///
/// # Errors
///
/// See [`lint_panel_sources`].
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer =
            Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::Path {
                file: source.file.to_string(),
                message: "not under domain/, inbound/ or outbound/".to_owned(),
            })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(check(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    const ALL: [Self; 3] = [Self::Domain, Self::Inbound, Self::Outbound];

    fn of(relative: &Utf8Path) -> Option<Self> {
        let first = relative.components().next()?.as_str();
        Self::ALL.into_iter().find(|layer| layer.dir_name() == first)
    }

    const fn dir_name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    /// Sibling modules of `crate::` this layer may not name.
    const fn forbidden_modules(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["config", "inbound", "outbound"],
            Self::Inbound => &["config", "outbound"],
            Self::Outbound => &["inbound"],
        }
    }

    /// External crates this layer may not name.
    const fn forbidden_crates(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &[
                "cap_std",
                "clap",
                "color_eyre",
                "ortho_config",
                "reqwest",
                "serde_json",
                "tracing_subscriber",
                "wiremock",
            ],
            Self::Inbound => &["cap_std", "ortho_config", "reqwest", "wiremock"],
            Self::Outbound => &["clap", "color_eyre", "tracing_subscriber"],
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

fn check(file: &Utf8Path, layer: Layer, parsed: &syn::File) -> Vec<Violation> {
    let mut paths = PathCollector::default();
    paths.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &paths.seen {
        if let Some(module) = internal_root(segments)
            .filter(|root| layer.forbidden_modules().contains(root))
        {
            messages.insert(format!("{layer} code must not use crate::{module}"));
        }
        if let Some(name) = external_root(segments)
            .filter(|root| layer.forbidden_crates().contains(root))
        {
            messages.insert(format!("{layer} code must not use external crate `{name}`"));
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_owned(),
            message,
        })
        .collect()
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// First module below the crate root named by `segments`, if the path is
/// crate-relative.
fn internal_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    let root = if first == CRATE_NAME {
        segments.get(1)
    } else if is_relative(first) {
        segments.iter().find(|segment| !is_relative(segment))
    } else if Layer::ALL.iter().any(|layer| layer.dir_name() == first) {
        return Some(first);
    } else {
        None
    };
    root.map(String::as_str)
}

fn external_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    (!is_relative(first) && first != CRATE_NAME).then_some(first)
}

#[derive(Default)]
struct PathCollector {
    seen: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn push_use(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.push_use(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.seen.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.seen.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.seen.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.push_use(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.seen.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.push_use(&node.tree, Vec::new());
    }
}

fn collect(
    dir: &Dir,
    relative: Utf8PathBuf,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in dir.entries()? {
        let entry = entry?;
        let name = entry
            .file_name()
            .into_string()
            .map_err(|raw| ArchitectureLintError::Path {
                file: format!("{relative}/{}", raw.to_string_lossy()),
                message: "file name is not valid UTF-8".to_owned(),
            })?;
        let path = relative.join(&name);

        if entry.file_type()?.is_dir() {
            collect(&entry.open_dir()?, path, sources)?;
        } else if path.extension() == Some("rs") {
            let contents = dir.read_to_string(&name)?;
            sources.push(LintSource::new(path, contents));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
