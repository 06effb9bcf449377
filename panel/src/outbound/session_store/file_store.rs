//! JSON-file session store.
//!
//! The whole store is one JSON object of string keys to string values kept in
//! a single file. Every write replaces the file atomically through a hidden
//! temporary sibling and a rename, so a crash never leaves half a map behind.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};

use crate::domain::ports::{SessionStore, SessionStoreError};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

type Entries = BTreeMap<String, String>;

/// Session store persisted to a JSON file.
#[derive(Debug)]
pub struct FileSessionStore {
    dir: Dir,
    file_name: String,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// The file itself is created on first write; a missing file reads as an
    /// empty store.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Read`] when `path` has no file name or the
    /// parent directory cannot be created or opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionStoreError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                SessionStoreError::read(format!(
                    "store path '{}' must name a UTF-8 file",
                    path.display()
                ))
            })?
            .to_owned();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        Dir::create_ambient_dir_all(parent, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(parent, ambient_authority()))
            .map(|dir| Self {
                dir,
                file_name,
                path: path.to_path_buf(),
                write_lock: Mutex::new(()),
            })
            .map_err(|error| {
                SessionStoreError::read(format!("{}: {error}", parent.display()))
            })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Entries, SessionStoreError> {
        let raw = match self.dir.read_to_string(&self.file_name) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(error) => {
                return Err(SessionStoreError::read(format!(
                    "{}: {error}",
                    self.path.display()
                )));
            }
        };
        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&raw).map_err(|error| {
            SessionStoreError::corrupt(format!("{}: {error}", self.path.display()))
        })
    }

    fn update(&self, change: impl FnOnce(&mut Entries)) -> Result<(), SessionStoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        change(&mut entries);
        let contents = serde_json::to_string_pretty(&entries)
            .map_err(|error| SessionStoreError::write(error.to_string()))?;
        self.write_atomic(&contents)
    }

    fn write_atomic(&self, contents: &str) -> Result<(), SessionStoreError> {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_name = format!(".{}.tmp.{}.{counter}", self.file_name, std::process::id());
        let to_error = |error: io::Error| {
            SessionStoreError::write(format!("{}: {error}", self.path.display()))
        };

        if let Err(error) = self.write_temp(&tmp_name, contents) {
            drop(self.dir.remove_file(&tmp_name));
            return Err(to_error(error));
        }
        if let Err(error) = replace(&self.dir, &tmp_name, &self.file_name) {
            drop(self.dir.remove_file(&tmp_name));
            return Err(to_error(error));
        }
        Ok(())
    }

    fn write_temp(&self, tmp_name: &str, contents: &str) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        let mut file = self.dir.open_with(tmp_name, &options)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    }
}

#[cfg(windows)]
fn replace(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}
