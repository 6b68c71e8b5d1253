//! Plaintext directory-backed store.
//!
//! Each entry lives at `<root>/<name>.secret`; the extension keeps a file
//! named like an entry from colliding with a directory holding entries
//! beneath the same prefix. Writes go through a temporary file in the
//! target directory and an atomic rename, so a crashed helper never leaves
//! a half-written secret behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::secret::Secret;

use super::{Store, StoreError, validate_name};

/// Filename extension marking stored entries.
const ENTRY_EXTENSION: &str = "secret";

/// Store persisting secrets as plain files under a root directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Opens (and creates if necessary) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError::Io`] when the root directory cannot be
    /// created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| io_error(&root, source))?;
        Ok(Self { root })
    }

    /// Root directory holding the stored entries.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        // Entry names routinely contain dots (hostnames), so the extension
        // is appended rather than set via `Path::set_extension`.
        Ok(self.root.join(format!("{name}.{ENTRY_EXTENSION}")))
    }

    fn collect_entries(
        &self,
        dir: &Path,
        prefix: &mut Vec<String>,
        names: &mut Vec<String>,
    ) -> Result<(), StoreError> {
        let reader = fs::read_dir(dir).map_err(|source| io_error(dir, source))?;
        for entry in reader {
            let entry = entry.map_err(|source| io_error(dir, source))?;
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if path.is_dir() {
                prefix.push(file_name.to_owned());
                self.collect_entries(&path, prefix, names)?;
                prefix.pop();
            } else if let Some(stem) = file_name.strip_suffix(&format!(".{ENTRY_EXTENSION}")) {
                let mut name = prefix.join("/");
                if !name.is_empty() {
                    name.push('/');
                }
                name.push_str(stem);
                names.push(name);
            }
        }
        Ok(())
    }
}

impl Store for FsStore {
    fn exists(&self, name: &str) -> bool {
        self.entry_path(name).is_ok_and(|path| path.is_file())
    }

    fn get(&self, name: &str) -> Result<Secret, StoreError> {
        let path = self.entry_path(name)?;
        if !path.is_file() {
            return Err(StoreError::NotFound);
        }
        let text = fs::read_to_string(&path).map_err(|source| io_error(&path, source))?;
        Ok(Secret::from_text(&text))
    }

    fn set(&mut self, name: &str, secret: Secret) -> Result<(), StoreError> {
        let path = self.entry_path(name)?;
        let parent = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;

        let mut staged =
            NamedTempFile::new_in(parent).map_err(|source| io_error(parent, source))?;
        staged
            .write_all(secret.to_text().as_bytes())
            .map_err(|source| io_error(&path, source))?;
        staged
            .persist(&path)
            .map_err(|error| io_error(&path, error.error))?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        let root = self.root.clone();
        self.collect_entries(&root, &mut Vec::new(), &mut names)?;
        names.sort();
        Ok(names)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}
