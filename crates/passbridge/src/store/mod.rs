//! Secret-store collaborator interface.
//!
//! The protocol engine holds no secret state of its own; every request
//! reads or writes through the injected [`Store`]. Two implementations
//! ship with the crate: [`MemoryStore`] for tests and embedding, and
//! [`FsStore`], a plaintext directory-backed store that makes the helper
//! usable stand-alone. Encrypted backends remain external.

mod fs;
mod memory;

use thiserror::Error;

use crate::secret::Secret;

pub use self::fs::FsStore;
pub use self::memory::MemoryStore;

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced entry does not exist.
    ///
    /// The display text is part of the protocol contract; clients match on
    /// `failed to get secret: Entry is not in the password store`.
    #[error("Entry is not in the password store")]
    NotFound,

    /// The entry name is empty or attempts to escape the store root.
    #[error("invalid entry name '{name}'")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// Underlying filesystem failure.
    #[error("store IO failure at '{path}': {source}")]
    Io {
        /// The path involved in the failure.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Mapping from slash-delimited entry names to secrets.
pub trait Store {
    /// Returns whether an entry with this name exists.
    fn exists(&self, name: &str) -> bool;

    /// Fetches the secret stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the entry is absent.
    fn get(&self, name: &str) -> Result<Secret, StoreError>;

    /// Stores `secret` under `name`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the name is invalid or persistence
    /// fails.
    fn set(&mut self, name: &str, secret: Secret) -> Result<(), StoreError>;

    /// Lists all entry names in lexicographic order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when enumeration fails.
    fn list(&self) -> Result<Vec<String>, StoreError>;
}

/// Validates an entry name: non-empty slash-delimited components, no
/// current/parent-directory references.
pub(crate) fn validate_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && !name.starts_with('/')
        && !name.ends_with('/')
        && name
            .split('/')
            .all(|component| !component.is_empty() && component != "." && component != "..");
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidName {
            name: name.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::single("entry")]
    #[case::nested("awesomePrefix/fixed/secret")]
    #[case::hostlike("somename/github.com")]
    fn accepts_well_formed_names(#[case] name: &str) {
        assert!(validate_name(name).is_ok());
    }

    #[rstest]
    #[case::empty("")]
    #[case::absolute("/etc/shadow")]
    #[case::trailing("entry/")]
    #[case::parent_reference("../outside")]
    #[case::inner_parent("a/../b")]
    #[case::current_reference("a/./b")]
    #[case::empty_component("a//b")]
    fn rejects_malformed_names(#[case] name: &str) {
        assert!(matches!(
            validate_name(name),
            Err(StoreError::InvalidName { .. })
        ));
    }

    #[test]
    fn not_found_text_matches_protocol_contract() {
        assert_eq!(
            StoreError::NotFound.to_string(),
            "Entry is not in the password store"
        );
    }
}
